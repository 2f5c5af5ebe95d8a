//! Aggregation of cross-source analysis records into dashboard metrics.
//!
//! Every operation here is a pure, total function over a slice of
//! [`UnifiedTopic`] records: no hidden state, no I/O, deterministic output
//! for any input shape including empty topic lists. Callers may optionally
//! restrict aggregation to a set of source domains; entries outside the
//! selection are skipped entirely (neither counted nor initialized).
//!
//! Sentiment and political-leaning values arrive as free-form strings from
//! the upstream model. Known literals — Hungarian, English, and the common
//! misspellings the generator produces — are normalized first. The
//! documented fallback rule, applied uniformly: an unrecognized sentiment
//! counts as neutral and an unrecognized leaning as center, each logged at
//! warn level. Unknown values are never fatal.

use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{SourceCoverage, UnifiedTopic};

/// Normalized sentiment of one coverage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Normalized political leaning of one coverage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaning {
    Left,
    CenterLeft,
    Center,
    CenterRight,
    Right,
}

/// Sentiment bucket counts for one source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentCounts {
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }
}

/// Political-leaning bucket counts for one source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaningCounts {
    pub left: u32,
    pub center_left: u32,
    pub center: u32,
    pub center_right: u32,
    pub right: u32,
}

impl LeaningCounts {
    pub fn total(&self) -> u32 {
        self.left + self.center_left + self.center + self.center_right + self.right
    }
}

/// Overall sentiment distribution across all sources.
///
/// Percentages are rounded to one decimal place. A zero total yields all
/// zeros rather than a division error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentRatio {
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    pub total: u32,
}

/// Everything the dashboard rendering needs for one digest run.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    /// Distinct domains in first-seen order, for filter chips and headers.
    pub domains: Vec<String>,
    /// Number of unified topics the metrics were derived from.
    pub topic_count: usize,
    pub sentiment_by_source: BTreeMap<String, SentimentCounts>,
    pub leaning_by_source: BTreeMap<String, LeaningCounts>,
    pub coverage_by_source: BTreeMap<String, u32>,
    pub overall_sentiment: SentimentRatio,
}

/// Normalize a raw sentiment literal.
///
/// Empty strings count as neutral without a warning (absent data, not bad
/// data); anything unrecognized is bucketed as neutral with a warning.
pub fn classify_sentiment(value: &str) -> Sentiment {
    match value.trim().to_lowercase().as_str() {
        "pozitív" | "pozitiv" | "positív" | "positive" => Sentiment::Positive,
        "semleges" | "neutral" | "neutrális" | "" => Sentiment::Neutral,
        "negatív" | "negativ" | "negative" => Sentiment::Negative,
        _ => {
            warn!(%value, "Unrecognized sentiment value; bucketing as neutral");
            Sentiment::Neutral
        }
    }
}

/// Normalize a raw political-leaning literal.
///
/// Empty strings count as center without a warning; anything unrecognized
/// is bucketed as center with a warning.
pub fn classify_leaning(value: &str) -> Leaning {
    match value.trim().to_lowercase().as_str() {
        "bal" | "baloldal" | "baloldali" | "bal oldal" | "left" => Leaning::Left,
        "közép-bal" | "bal-közép" | "balközép" | "center-left" => Leaning::CenterLeft,
        "közép" | "centrum" | "középutas" | "független" | "center" | "independent" | "" => {
            Leaning::Center
        }
        "közép-jobb" | "jobb-közép" | "jobbközép" | "center-right" => Leaning::CenterRight,
        "jobb" | "jobboldal" | "jobboldali" | "right" => Leaning::Right,
        _ => {
            warn!(%value, "Unrecognized political leaning value; bucketing as center");
            Leaning::Center
        }
    }
}

fn is_selected(domain: &str, selected_domains: Option<&[String]>) -> bool {
    match selected_domains {
        Some(selected) if !selected.is_empty() => selected.iter().any(|d| d == domain),
        _ => true,
    }
}

fn coverage_entries<'a>(
    topics: &'a [UnifiedTopic],
    selected_domains: Option<&'a [String]>,
) -> impl Iterator<Item = &'a SourceCoverage> {
    topics
        .iter()
        .flat_map(|topic| topic.source_coverage.iter())
        .filter(move |coverage| is_selected(&coverage.domain, selected_domains))
}

/// Sentiment bucket counts per source domain.
///
/// Domains outside a non-empty `selected_domains` never appear in the
/// result, even as zero-count entries.
pub fn per_source_sentiment(
    topics: &[UnifiedTopic],
    selected_domains: Option<&[String]>,
) -> BTreeMap<String, SentimentCounts> {
    let mut by_source: BTreeMap<String, SentimentCounts> = BTreeMap::new();
    for coverage in coverage_entries(topics, selected_domains) {
        let counts = by_source.entry(coverage.domain.clone()).or_default();
        match classify_sentiment(&coverage.sentiment) {
            Sentiment::Positive => counts.positive += 1,
            Sentiment::Neutral => counts.neutral += 1,
            Sentiment::Negative => counts.negative += 1,
        }
    }
    by_source
}

/// Political-leaning bucket counts per source domain.
pub fn per_source_political_leaning(
    topics: &[UnifiedTopic],
    selected_domains: Option<&[String]>,
) -> BTreeMap<String, LeaningCounts> {
    let mut by_source: BTreeMap<String, LeaningCounts> = BTreeMap::new();
    for coverage in coverage_entries(topics, selected_domains) {
        let counts = by_source.entry(coverage.domain.clone()).or_default();
        match classify_leaning(&coverage.political_leaning) {
            Leaning::Left => counts.left += 1,
            Leaning::CenterLeft => counts.center_left += 1,
            Leaning::Center => counts.center += 1,
            Leaning::CenterRight => counts.center_right += 1,
            Leaning::Right => counts.right += 1,
        }
    }
    by_source
}

/// How many coverage entries each source domain contributes.
pub fn per_source_coverage_counts(
    topics: &[UnifiedTopic],
    selected_domains: Option<&[String]>,
) -> BTreeMap<String, u32> {
    let mut by_source: BTreeMap<String, u32> = BTreeMap::new();
    for coverage in coverage_entries(topics, selected_domains) {
        *by_source.entry(coverage.domain.clone()).or_default() += 1;
    }
    by_source
}

/// Sum per-source sentiment buckets into an overall distribution.
pub fn overall_sentiment_ratio(
    per_source: &BTreeMap<String, SentimentCounts>,
) -> SentimentRatio {
    let mut positive = 0u32;
    let mut neutral = 0u32;
    let mut negative = 0u32;
    for counts in per_source.values() {
        positive += counts.positive;
        neutral += counts.neutral;
        negative += counts.negative;
    }

    let total = positive + neutral + negative;
    if total == 0 {
        return SentimentRatio::default();
    }

    let pct = |n: u32| (f64::from(n) / f64::from(total) * 1000.0).round() / 10.0;
    SentimentRatio {
        positive_pct: pct(positive),
        neutral_pct: pct(neutral),
        negative_pct: pct(negative),
        total,
    }
}

/// Distinct source domains across all coverage entries, first-seen order.
pub fn unique_domains(topics: &[UnifiedTopic]) -> Vec<String> {
    topics
        .iter()
        .flat_map(|topic| topic.source_coverage.iter())
        .map(|coverage| coverage.domain.clone())
        .unique()
        .collect()
}

/// Number of distinct source domains across all coverage entries.
pub fn count_unique_domains(topics: &[UnifiedTopic]) -> usize {
    unique_domains(topics).len()
}

/// Topics with at least one coverage entry from a selected domain.
///
/// An empty selection retains everything.
pub fn filter_topics_by_sources<'a>(
    topics: &'a [UnifiedTopic],
    selected_domains: &[String],
) -> Vec<&'a UnifiedTopic> {
    if selected_domains.is_empty() {
        return topics.iter().collect();
    }
    topics
        .iter()
        .filter(|topic| {
            topic
                .source_coverage
                .iter()
                .any(|coverage| selected_domains.iter().any(|d| d == &coverage.domain))
        })
        .collect()
}

/// Derive the full dashboard block in one call.
pub fn dashboard_metrics(
    topics: &[UnifiedTopic],
    selected_domains: Option<&[String]>,
) -> DashboardMetrics {
    let sentiment_by_source = per_source_sentiment(topics, selected_domains);
    let leaning_by_source = per_source_political_leaning(topics, selected_domains);
    let coverage_by_source = per_source_coverage_counts(topics, selected_domains);
    let overall_sentiment = overall_sentiment_ratio(&sentiment_by_source);
    let domains = unique_domains(topics)
        .into_iter()
        .filter(|d| is_selected(d, selected_domains))
        .collect();

    DashboardMetrics {
        domains,
        topic_count: topics.len(),
        sentiment_by_source,
        leaning_by_source,
        coverage_by_source,
        overall_sentiment,
    }
}
