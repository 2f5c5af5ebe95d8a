//! # Hírtükör
//!
//! A digest client for AI-generated Hungarian news summaries. It fetches
//! pre-generated per-source summaries and cross-source topic analyses from
//! a remote API, extracts structured sections from the marker-delimited
//! summary text, derives sentiment-dashboard metrics from the analysis
//! records, and writes bilingual digest reports as JSON and Markdown.
//!
//! ## Usage
//!
//! ```sh
//! hirtukor -j ./json -m ./markdown
//! hirtukor -j ./json -m ./markdown -l en -d 2025-05-06 -s telex,444
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Retrieve the summary list and the cross-source analysis
//!    concurrently, with retry and backoff
//! 2. **Parsing**: Extract sections and previews from each raw summary
//! 3. **Aggregation**: Derive per-source and overall dashboard metrics
//! 4. **Output**: Write the JSON digest, the Markdown report, and the index
//!
//! The summarization pipeline, the crawler, and the datastore behind the
//! API are external; this binary only consumes their HTTP responses.

use chrono::{Local, NaiveDate};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod analysis;
mod api;
mod cli;
mod config;
mod locale;
mod models;
mod outputs;
mod parser;
mod utils;

use cli::Cli;
use config::{ClientConfig, DEFAULT_API_URL};
use locale::{label, SectionTitles};
use models::{DigestPage, SourceDigest};
use outputs::{indexes, json, markdown};
use utils::{ensure_writable_dir, normalize_domain};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("digest run starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.language, ?args.date, "Parsed CLI arguments");

    // --- Resolve configuration (CLI > config file > defaults) ---
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ClientConfig::default(),
    };
    let api_url = args
        .api_url
        .clone()
        .or(file_config.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let base = Url::parse(&api_url)?;
    let language = args.language.or(file_config.language).unwrap_or_default();
    info!(api_url = %base, language = language.code(), "Resolved configuration");

    if let Some(date) = &args.date {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            error!(%date, "Invalid --date, expected YYYY-MM-DD");
            return Err(format!("invalid date {date:?}, expected YYYY-MM-DD").into());
        }
    }

    // Early check: ensure output dirs are writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Fetch both payloads concurrently ----
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let date = args.date.as_deref();

    let (summaries_res, analysis_res) = futures::join!(
        api::fetch_summaries(&client, &base, language, date),
        api::fetch_cross_source_analysis(&client, &base, language, date),
    );

    let summary_list = summaries_res?;
    if !summary_list.success {
        warn!("Summary endpoint reported failure; proceeding with whatever it returned");
    }

    // ---- Parse each raw summary into sections and a preview ----
    let titles = SectionTitles::for_language(language);
    let mut sources = Vec::new();
    for summary in &summary_list.summaries {
        let domain = normalize_domain(&summary.domain);
        let sections = parser::parse_sections(&summary.content, titles);
        let preview = parser::extract_preview(&summary.content, titles);
        debug!(
            %domain,
            language = %summary.language,
            date = %summary.date,
            section_count = sections.len(),
            "Parsed summary"
        );
        sources.push(SourceDigest {
            domain,
            preview,
            sections,
        });
    }
    info!(count = sources.len(), "Parsed source summaries");

    // ---- Aggregate the analysis into dashboard metrics ----
    let selected: Vec<String> = args
        .sources
        .iter()
        .map(|s| normalize_domain(s))
        .collect();
    let selected_opt = if selected.is_empty() {
        None
    } else {
        Some(selected.as_slice())
    };

    let (topics, analysis_note, analysis_date) = match analysis_res {
        Ok(resp) => match resp.analysis {
            Some(analysis) if resp.success => (analysis.unified_topics, None, Some(analysis.date)),
            _ => {
                let note = resp
                    .message
                    .unwrap_or_else(|| label(language, "analysis.noAnalysis").to_string());
                warn!(%note, "No usable analysis for this date");
                (Vec::new(), Some(note), None)
            }
        },
        Err(e) => {
            error!(error = %e, "Analysis fetch failed; digest will carry summaries only");
            (Vec::new(), Some(e.to_string()), None)
        }
    };

    let dashboard = if topics.is_empty() {
        None
    } else {
        let metrics = analysis::dashboard_metrics(&topics, selected_opt);
        info!(
            topic_count = metrics.topic_count,
            domain_count = metrics.domains.len(),
            sentiment_total = metrics.overall_sentiment.total,
            "Computed dashboard metrics"
        );
        Some(metrics)
    };
    let topics = analysis::filter_topics_by_sources(&topics, &selected)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    // ---- Build digest page ----
    let page_date = date
        .map(str::to_string)
        .or(analysis_date)
        .or_else(|| summary_list.summaries.first().map(|s| s.date.clone()))
        .unwrap_or_else(|| Local::now().date_naive().to_string());
    let page = DigestPage {
        date: page_date,
        language,
        generated_at: Local::now().naive_local().to_string(),
        sources,
        topics,
        dashboard,
        analysis_note,
    };
    info!(date = %page.date, language = %page.language.code(), "DigestPage assembled");

    // ---- Write outputs ----
    if let Err(e) = json::write_digest(&page, &args.json_output_dir).await {
        error!(error = %e, "Failed to write JSON digest");
    }

    let md = markdown::digest_to_markdown(&page);
    let markdown_filename = format!("{}_{}.md", page.date, page.language.code());
    let output_markdown_path = format!("{}/{}", args.markdown_output_dir, markdown_filename);

    info!(path = %output_markdown_path, "Writing Markdown");
    if let Err(e) = tokio::fs::write(&output_markdown_path, md).await {
        error!(path = %output_markdown_path, error = %e, "Failed writing Markdown");
    } else {
        info!(path = %output_markdown_path, "Wrote digest Markdown");
    }

    if let Err(e) =
        indexes::update_digest_index(&args.markdown_output_dir, &page, &markdown_filename).await
    {
        error!(error = %e, "Failed to update digest index");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        sources = page.sources.len(),
        topics = page.topics.len(),
        "Execution complete"
    );

    Ok(())
}
