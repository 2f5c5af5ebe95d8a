//! HTTP retrieval of summary and analysis payloads with exponential backoff.
//!
//! The upstream API is a small free-tier deployment that cold-starts and
//! rate-limits, so every request goes through a retry decorator.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`FetchAsync`]: core trait defining an async GET returning a body
//! - [`HttpGet`]: implementation backed by a shared `reqwest::Client`
//! - [`RetryFetch`]: decorator that adds retry logic to any `FetchAsync`
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//!
//! Transport failures, non-2xx statuses, and response-shape mismatches all
//! surface as errors to the caller; they are never swallowed.

use rand::{rng, Rng};
use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::locale::Language;
use crate::models::{CrossSourceAnalysisResponse, SummaryListResponse};
use crate::utils::{looks_truncated, truncate_for_log};

/// Trait for async retrieval of a URL body.
///
/// The abstraction exists so the retry decorator can wrap any transport,
/// and so tests can substitute a failing or canned implementation.
pub trait FetchAsync {
    /// The type of response body returned.
    type Response;

    /// Retrieve the body behind `url`.
    async fn fetch(&self, url: &Url) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchAsync`]
/// implementation.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    /// Create a new retry wrapper around an existing [`FetchAsync`]
    /// implementation.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn fetch(&self, url: &Url) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch(url).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// [`FetchAsync`] implementation backed by a shared `reqwest::Client`.
///
/// A non-2xx status is an error: the status and a truncated body preview
/// are logged, and the attempt counts as failed for retry purposes.
#[derive(Debug)]
pub struct HttpGet<'a> {
    pub client: &'a Client,
}

impl FetchAsync for HttpGet<'_> {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                %status,
                elapsed_ms = dt.as_millis() as u128,
                body_preview = %truncate_for_log(&body, 300),
                "GET returned non-success status"
            );
            return Err(format!("GET {url} failed with status {status}").into());
        }

        Ok(body)
    }
}

/// Retrieve a URL body with exponential backoff retry logic.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn get_with_backoff(client: &Client, url: &Url) -> Result<String, Box<dyn Error>> {
    let t0 = Instant::now();
    let transport = HttpGet { client };
    let api = RetryFetch::new(transport, 5, StdDuration::from_secs(1));
    let res = api.fetch(url).await;
    let dt = t0.elapsed();

    match &res {
        Ok(body) => info!(
            elapsed_ms_total = dt.as_millis() as u128,
            bytes = body.len(),
            "get_with_backoff succeeded"
        ),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "get_with_backoff failed")
        }
    }
    res
}

/// Build an endpoint URL from the API base, a path segment, and query
/// parameters.
fn endpoint_url(
    base: &Url,
    segment: &str,
    params: &[(&str, &str)],
) -> Result<Url, Box<dyn Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("API base URL {base} cannot be a base"))?
        .pop_if_empty()
        .push(segment);
    for (key, value) in params {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url)
}

/// Fetch the summary list for a language and optional date.
///
/// Hits `GET {base}/summaries?language=..[&date=..]`.
#[instrument(level = "info", skip_all, fields(language = language.code(), date))]
pub async fn fetch_summaries(
    client: &Client,
    base: &Url,
    language: Language,
    date: Option<&str>,
) -> Result<SummaryListResponse, Box<dyn Error>> {
    let mut params = vec![("language", language.code())];
    if let Some(date) = date {
        params.push(("date", date));
    }
    let url = endpoint_url(base, "summaries", &params)?;
    let body = get_with_backoff(client, &url).await?;

    match serde_json::from_str::<SummaryListResponse>(&body) {
        Ok(parsed) => {
            info!(count = parsed.summaries.len(), success = parsed.success, "Fetched summaries");
            Ok(parsed)
        }
        Err(e) => {
            if looks_truncated(&e) {
                warn!("Summary response body appears truncated");
            }
            error!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Summary response did not match the expected shape"
            );
            Err(Box::new(e))
        }
    }
}

/// Fetch the cross-source analysis for a language and optional date.
///
/// Hits `GET {base}/cross-source-analysis?language=..[&date=..]`. A
/// `success: false` payload parses fine and is returned as-is; deciding
/// what to do with a missing analysis is the caller's business.
#[instrument(level = "info", skip_all, fields(language = language.code(), date))]
pub async fn fetch_cross_source_analysis(
    client: &Client,
    base: &Url,
    language: Language,
    date: Option<&str>,
) -> Result<CrossSourceAnalysisResponse, Box<dyn Error>> {
    let mut params = vec![("language", language.code())];
    if let Some(date) = date {
        params.push(("date", date));
    }
    let url = endpoint_url(base, "cross-source-analysis", &params)?;
    let body = get_with_backoff(client, &url).await?;

    match serde_json::from_str::<CrossSourceAnalysisResponse>(&body) {
        Ok(parsed) => {
            let topic_count = parsed
                .analysis
                .as_ref()
                .map(|a| a.unified_topics.len())
                .unwrap_or(0);
            info!(
                success = parsed.success,
                topic_count,
                created_at = ?parsed.created_at,
                requested_date = ?parsed.requested_date,
                "Fetched cross-source analysis"
            );
            Ok(parsed)
        }
        Err(e) => {
            if looks_truncated(&e) {
                warn!("Analysis response body appears truncated");
            }
            error!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Analysis response did not match the expected shape"
            );
            Err(Box::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_and_encodes() {
        let base = Url::parse("https://api.example.com").unwrap();
        let url = endpoint_url(&base, "summaries", &[("language", "hu"), ("date", "2025-05-06")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/summaries?language=hu&date=2025-05-06"
        );
    }

    #[test]
    fn test_endpoint_url_preserves_base_path() {
        let base = Url::parse("https://example.com/api/v1/").unwrap();
        let url = endpoint_url(&base, "summaries", &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1/summaries");
    }

    #[test]
    fn test_endpoint_url_without_trailing_slash() {
        let base = Url::parse("https://example.com/api").unwrap();
        let url = endpoint_url(&base, "cross-source-analysis", &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/cross-source-analysis");
    }

    #[derive(Debug)]
    struct AlwaysFails;

    impl FetchAsync for AlwaysFails {
        type Response = String;

        async fn fetch(&self, _url: &Url) -> Result<String, Box<dyn Error>> {
            Err("boom".into())
        }
    }

    #[derive(Debug)]
    struct Canned(&'static str);

    impl FetchAsync for Canned {
        type Response = String;

        async fn fetch(&self, _url: &Url) -> Result<String, Box<dyn Error>> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_retry_fetch_gives_up_after_max_retries() {
        let api = RetryFetch::new(AlwaysFails, 1, StdDuration::from_millis(1));
        let url = Url::parse("https://example.com/summaries").unwrap();
        let res = api.fetch(&url).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_retry_fetch_passes_through_success() {
        let api = RetryFetch::new(Canned("body"), 3, StdDuration::from_millis(1));
        let url = Url::parse("https://example.com/summaries").unwrap();
        let res = api.fetch(&url).await.unwrap();
        assert_eq!(res, "body");
    }
}
