//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Network-facing options can also come from environment variables or the
//! optional config file; see [`crate::config`] for precedence.

use clap::Parser;

use crate::locale::Language;

/// Command-line arguments for the digest run.
///
/// # Examples
///
/// ```sh
/// # Basic usage with required arguments
/// hirtukor -j ./json -m ./markdown
///
/// # English digest for a specific date
/// hirtukor -j ./json -m ./markdown -l en -d 2025-05-06
///
/// # Dashboard restricted to two outlets
/// hirtukor -j ./json -m ./markdown -s telex,444
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON digest file
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown digest file
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Base URL of the summary API
    #[arg(short, long, env = "HIRTUKOR_API_URL")]
    pub api_url: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Digest language (defaults to Hungarian)
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Date to fetch (YYYY-MM-DD); the API falls back to its most recent data
    #[arg(short, long)]
    pub date: Option<String>,

    /// Restrict the dashboard and topic list to these source domains
    #[arg(short, long, value_delimiter = ',')]
    pub sources: Vec<String>,
}
