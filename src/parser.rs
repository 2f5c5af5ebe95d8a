//! Lexical parser for marker-delimited summary text.
//!
//! The upstream generator wraps each logical section of a summary in
//! `[START_KEY]...[END_KEY]` marker pairs, with two wrapper keys carrying
//! structure rather than content:
//!
//! ```text
//! [START_SHORT_SUMMARY]one-paragraph preview[END_SHORT_SUMMARY]
//! [START_MAIN_SUMMARY]
//! [START_BEVEZETO]...[END_BEVEZETO]
//! [START_GAZDASAG]...[END_GAZDASAG]
//! [END_MAIN_SUMMARY]
//! ```
//!
//! The format is an ad hoc protocol from a language model, so every input
//! is treated as possibly malformed: log preamble before the first marker,
//! dangling start markers, missing wrappers, or no markers at all. Every
//! function here is total — it degrades to a documented fallback instead of
//! returning an error — and scans left-to-right without backtracking, so a
//! pair is never matched twice.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::locale::SectionTitles;
use crate::models::ParsedSection;

const SHORT_START: &str = "[START_SHORT_SUMMARY]";
const SHORT_END: &str = "[END_SHORT_SUMMARY]";
const MAIN_START: &str = "[START_MAIN_SUMMARY]";
const MAIN_END: &str = "[END_MAIN_SUMMARY]";

/// Keys that delimit structure instead of content; never emitted as sections.
const WRAPPER_KEYS: [&str; 2] = ["MAIN_SUMMARY", "SHORT_SUMMARY"];

/// Maximum character count of a preview built from unstructured text.
const PREVIEW_CHAR_LIMIT: usize = 150;

static START_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[START_([A-Z_]+)\]").expect("static regex"));

/// Discard noise preceding the first summary marker.
///
/// Model output is sometimes prefixed with log lines or chatter. If either
/// the short-summary or main-summary start marker is present, the returned
/// slice begins at the earliest of the two; otherwise the input is returned
/// unchanged and treated as unstructured downstream. Never fails; empty
/// input yields empty output.
pub fn clean_preamble(raw: &str) -> &str {
    let start = match (raw.find(SHORT_START), raw.find(MAIN_START)) {
        (Some(s), Some(m)) => s.min(m),
        (Some(s), None) => s,
        (None, Some(m)) => m,
        (None, None) => return raw,
    };
    if start > 0 {
        debug!(discarded_bytes = start, "Discarded preamble before first marker");
    }
    &raw[start..]
}

/// Extract the ordered sections of a summary.
///
/// After [`clean_preamble`], scanning is restricted to the inside of the
/// `MAIN_SUMMARY` wrapper when one exists. Marker pairs must carry the same
/// key on both ends; a start marker with no matching end is skipped and
/// produces nothing. Section keys resolve to display titles through
/// `titles`, unknown keys are humanized, and a leading bold echo of the
/// title inside the body is stripped.
///
/// Text sitting before the first marker of the scanned region becomes a
/// synthetic introduction section (unless one was already parsed). If
/// nothing at all matched but there was non-blank content, the whole region
/// is emitted as a single generic fallback section. Empty or whitespace-only
/// input yields an empty list.
pub fn parse_sections(raw: &str, titles: &SectionTitles) -> Vec<ParsedSection> {
    let cleaned = clean_preamble(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }

    let scan_region = marker_pair(cleaned, MAIN_START, MAIN_END).unwrap_or(cleaned);

    let mut sections = Vec::new();
    let mut first_marker_at = None;
    let mut cursor = 0;

    while let Some(caps) = START_MARKER_RE.captures(&scan_region[cursor..]) {
        let marker = caps.get(0).expect("whole match");
        let key = caps.get(1).expect("key group").as_str();
        let marker_start = cursor + marker.start();
        let body_start = cursor + marker.end();
        if first_marker_at.is_none() {
            first_marker_at = Some(marker_start);
        }

        let end_tag = format!("[END_{key}]");
        match scan_region[body_start..].find(&end_tag) {
            Some(rel) => {
                if !WRAPPER_KEYS.contains(&key) {
                    let title = titles.resolve(key);
                    let body = scan_region[body_start..body_start + rel].trim();
                    let content = strip_title_echo(body, &title).trim();
                    if content.is_empty() {
                        debug!(key, "Skipping section with empty body");
                    } else {
                        sections.push(ParsedSection {
                            title,
                            content: content.to_string(),
                        });
                    }
                }
                // Resume after the closed pair so matches never overlap.
                cursor = body_start + rel + end_tag.len();
            }
            None => {
                warn!(key, "Dangling start marker without matching end; skipping");
                cursor = body_start;
            }
        }
    }

    if let Some(first) = first_marker_at {
        let preamble = scan_region[..first].trim();
        if !preamble.is_empty() && sections.iter().all(|s| s.title != titles.introduction()) {
            sections.insert(
                0,
                ParsedSection {
                    title: titles.introduction().to_string(),
                    content: preamble.to_string(),
                },
            );
        }
    }

    if sections.is_empty() {
        let whole = scan_region.trim();
        if !whole.is_empty() {
            sections.push(ParsedSection {
                title: titles.fallback().to_string(),
                content: whole.to_string(),
            });
        }
    }

    sections
}

/// Extract a short, display-ready preview of a summary.
///
/// Preference order:
/// 1. the trimmed inside of a `SHORT_SUMMARY` pair,
/// 2. the introduction section produced by [`parse_sections`],
/// 3. the text before the first marker of any kind (or the whole cleaned
///    string when there is none), truncated to [`PREVIEW_CHAR_LIMIT`]
///    characters with `...` appended when truncation occurred.
///
/// Empty or whitespace-only input yields the localized placeholder. The
/// result is never longer than the limit plus the three-dot ellipsis.
pub fn extract_preview(raw: &str, titles: &SectionTitles) -> String {
    let cleaned = clean_preamble(raw);
    if cleaned.trim().is_empty() {
        return titles.unavailable().to_string();
    }

    if let Some(short) = marker_pair(cleaned, SHORT_START, SHORT_END) {
        let short = short.trim();
        if !short.is_empty() {
            return short.to_string();
        }
    }

    let sections = parse_sections(cleaned, titles);
    if let Some(intro) = sections.iter().find(|s| s.title == titles.introduction()) {
        return intro.content.clone();
    }

    let cut = match (cleaned.find("[START_"), cleaned.find("[END_")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => cleaned.len(),
    };
    let head = cleaned[..cut].trim();
    let head = if head.is_empty() { cleaned.trim() } else { head };
    truncate_chars(head, PREVIEW_CHAR_LIMIT)
}

/// Slice between a start/end marker pair, or `None` if either is missing.
fn marker_pair<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let s = text.find(start)?;
    let body_start = s + start.len();
    let rel = text[body_start..].find(end)?;
    Some(&text[body_start..body_start + rel])
}

/// Drop a leading `**Title**` echo line the model sometimes repeats inside
/// a section body.
fn strip_title_echo<'a>(body: &'a str, title: &str) -> &'a str {
    body.strip_prefix("**")
        .and_then(|rest| rest.strip_prefix(title))
        .and_then(|rest| rest.strip_prefix("**"))
        .map(str::trim_start)
        .unwrap_or(body)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...", &s[..idx]),
    }
}
