//! JSON output generation.
//!
//! Serializes a rendered digest to a date-based directory so multiple
//! languages for the same date sit next to each other:
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── hu.json
//!     └── en.json
//! ```

use crate::models::DigestPage;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`DigestPage`] to a JSON file with date-based directory structure.
///
/// Creates the necessary directory structure and writes the serialized
/// digest. The file path is determined by the date and language of the
/// page data.
///
/// # Output Path
///
/// The file is written to: `{json_output_dir}/{date}/{language}.json`
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(
    page: &DigestPage,
    json_output_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(page)?;

    let full_json_dir = format!("{}/{}", json_output_dir, page.date);
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/{}.json", full_json_dir, page.language.code());
    info!(path = %output_json_filename, "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote JSON digest file");

    Ok(())
}
