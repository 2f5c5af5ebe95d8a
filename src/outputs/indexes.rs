//! Digest index management.
//!
//! Maintains `digests.md`, a master index of all generated reports, so a
//! directory of Markdown digests stays navigable without a file listing.
//!
//! # Append vs Replace
//!
//! The updater uses append semantics to support multiple runs per day
//! (one per language, plus re-runs after upstream corrections).

use crate::models::DigestPage;
use crate::utils::{slugify_title, source_display_name};
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

/// Append the current report to the master digest index.
///
/// Creates the file with a header if it doesn't exist. Each entry links to
/// the report file and, indented beneath it, to each source's section
/// anchor within the report.
///
/// # Output
///
/// Appends to `{markdown_output_dir}/digests.md`:
///
/// ```text
/// - [2025-05-06 (hu)](./2025-05-06_hu.md)
///     - [Telex](./2025-05-06_hu.md#telex)
///     - [444.hu](./2025-05-06_hu.md#444hu)
/// ```
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, date = %page.date, file = %markdown_filename))]
pub async fn update_digest_index(
    markdown_output_dir: &str,
    page: &DigestPage,
    markdown_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let index_path = format!("{}/digests.md", markdown_output_dir);
    let mut index_md = String::new();

    if !Path::new(&index_path).exists() {
        writeln!(index_md, "# Digest index\n").unwrap();
    }

    writeln!(
        index_md,
        "- [{} ({})](./{})",
        page.date,
        page.language.code(),
        markdown_filename
    )
    .unwrap();

    for source in &page.sources {
        let name = source_display_name(&source.domain);
        writeln!(
            index_md,
            "\t- [{}](./{}#{})",
            name,
            markdown_filename,
            slugify_title(name)
        )
        .unwrap();
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&index_path)
        .await?;
    file.write_all(index_md.as_bytes()).await?;
    info!(path = %index_path, "Updated digest index");
    Ok(())
}
