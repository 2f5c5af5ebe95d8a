//! Utility functions for string manipulation, domain normalization, and
//! file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation and slugification for logging and Markdown anchors
//! - Domain normalization so upstream spellings of the same outlet collapse
//! - JSON error detection for handling truncated API responses
//! - File system validation for output directories

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// When an API response is cut off mid-body, the resulting JSON fails to
/// parse with an EOF error. Callers use this to log the failure as a
/// truncation rather than a shape mismatch.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Convert a title to a URL-friendly slug.
///
/// Used to generate anchor links in the Markdown output. Lowercases the
/// text, removes special characters, and replaces spaces with hyphens.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Capitalize the first character of a string.
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Normalize an outlet domain to its short form.
///
/// Upstream payloads spell the same outlet several ways (`telex.hu`,
/// `www.telex.hu`, `Telex.hu`). Collapsing them keeps aggregation buckets
/// and source filters consistent. Steps: strip scheme and `www.`, strip the
/// TLD, lowercase, fold Hungarian accents. `24.hu` keeps its dot since the
/// bare name would be just a number.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_domain("www.telex.hu"), "telex");
/// assert_eq!(normalize_domain("24.hu"), "24.hu");
/// ```
pub fn normalize_domain(domain: &str) -> String {
    if domain.is_empty() {
        return String::new();
    }
    if domain.starts_with("24.") {
        return "24.hu".to_string();
    }

    let d = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    let d = d.strip_prefix("www.").unwrap_or(d);
    let d = match d.rfind('.') {
        Some(i) if !d[i + 1..].is_empty() && d[i + 1..].chars().all(char::is_alphanumeric) => {
            &d[..i]
        }
        _ => d,
    };

    d.to_lowercase().chars().map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' | 'ö' | 'ő' => 'o',
        'ú' | 'ü' | 'ű' => 'u',
        _ => c,
    }
}

/// Human-readable outlet name for a normalized domain.
///
/// Unknown domains are shown as-is.
pub fn source_display_name(domain: &str) -> &str {
    match domain {
        "telex" => "Telex",
        "444" => "444.hu",
        "hvg" => "HVG",
        "origo" => "Origo",
        "mandiner" => "Mandiner",
        "24.hu" => "24.hu",
        other => other,
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // 'é' is two bytes; a cut inside it must back off to a char boundary
        let s = "é".repeat(10);
        let result = truncate_for_log(&s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("bytes)"));
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello World"), "hello-world");
        assert_eq!(slugify_title("Gazdaság és piac"), "gazdaság-és-piac");
        assert_eq!(slugify_title("Special@#$Characters"), "specialcharacters");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("hello"), "Hello");
        assert_eq!(upcase(""), "");
        assert_eq!(upcase("a"), "A");
    }

    #[test]
    fn test_normalize_domain_strips_tld_and_www() {
        assert_eq!(normalize_domain("telex.hu"), "telex");
        assert_eq!(normalize_domain("www.telex.hu"), "telex");
        assert_eq!(normalize_domain("https://www.origo.hu"), "origo");
        assert_eq!(normalize_domain("444.hu"), "444");
    }

    #[test]
    fn test_normalize_domain_keeps_24hu() {
        assert_eq!(normalize_domain("24.hu"), "24.hu");
    }

    #[test]
    fn test_normalize_domain_folds_accents_and_case() {
        assert_eq!(normalize_domain("Telex.hu"), "telex");
        assert_eq!(normalize_domain("hírportál.hu"), "hirportal");
    }

    #[test]
    fn test_normalize_domain_empty() {
        assert_eq!(normalize_domain(""), "");
    }

    #[test]
    fn test_source_display_name() {
        assert_eq!(source_display_name("telex"), "Telex");
        assert_eq!(source_display_name("444"), "444.hu");
        assert_eq!(source_display_name("somethingelse"), "somethingelse");
    }

    #[test]
    fn test_looks_truncated() {
        let json_eof = r#"{"field": "value"#; // Missing closing brace
        let result: Result<serde_json::Value, _> = serde_json::from_str(json_eof);
        if let Err(e) = result {
            assert!(looks_truncated(&e));
        }
    }
}
