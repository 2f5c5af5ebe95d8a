//! Data models for upstream API payloads and rendered digest output.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Summary`] / [`SummaryListResponse`]: per-source raw summary text as
//!   served by the `/summaries` endpoint
//! - [`UnifiedTopic`] / [`SourceCoverage`] / [`CrossSourceAnalysisResponse`]:
//!   nested cross-source analysis records from `/cross-source-analysis`
//! - [`ParsedSection`]: one titled section extracted from raw summary text
//! - [`DigestPage`] / [`SourceDigest`]: the rendered product of one run,
//!   serialized to JSON and Markdown
//!
//! All of these are immutable value objects; nothing here carries identity
//! beyond structural equality, and nothing is mutated after construction.
//! Field names mirror the snake_case JSON keys the API serves, so no serde
//! renames are needed.

use serde::{Deserialize, Serialize};

use crate::analysis::DashboardMetrics;
use crate::locale::Language;

/// One pre-generated summary as served by the `/summaries` endpoint.
///
/// `content` is an opaque text blob produced by the upstream language
/// model. It is expected to contain `[START_KEY]...[END_KEY]` marker pairs
/// but must be treated as untrusted and possibly malformed; the parser in
/// [`crate::parser`] never fails on it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Summary {
    /// Outlet domain the summary was generated for (e.g. `telex.hu`).
    pub domain: String,
    /// Language code of the summary text (`hu` or `en`).
    pub language: String,
    /// Date the summary covers, `YYYY-MM-DD`.
    pub date: String,
    /// Raw marker-delimited summary text.
    pub content: String,
}

/// Response envelope of the `/summaries` endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryListResponse {
    pub success: bool,
    #[serde(default)]
    pub summaries: Vec<Summary>,
}

/// One outlet's treatment of a unified topic.
///
/// `sentiment` and `political_leaning` are free-form strings from the
/// upstream model. The aggregator normalizes known literals and buckets
/// unrecognized values by a documented fallback rule instead of failing;
/// see [`crate::analysis`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceCoverage {
    pub domain: String,
    #[serde(default)]
    pub original_topic_name: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub political_leaning: String,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub framing: String,
    /// Links to the articles behind this coverage; not always present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_urls: Option<Vec<String>>,
}

/// A single news topic merged across multiple outlets.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnifiedTopic {
    pub name: String,
    #[serde(default)]
    pub comparative_analysis: String,
    #[serde(default)]
    pub source_coverage: Vec<SourceCoverage>,
}

/// The analysis document stored per date.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrossSourceAnalysis {
    pub date: String,
    #[serde(default)]
    pub unified_topics: Vec<UnifiedTopic>,
}

/// Response envelope of the `/cross-source-analysis` endpoint.
///
/// `analysis` is `null` when no document exists for the requested date; in
/// that case `message` explains why. A `success: false` response is not a
/// transport error and must not abort the digest run.
#[derive(Debug, Deserialize)]
pub struct CrossSourceAnalysisResponse {
    pub success: bool,
    pub date: String,
    pub analysis: Option<CrossSourceAnalysis>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub requested_date: Option<String>,
}

/// One titled section extracted from raw summary text.
///
/// Constructed fresh on every parse call, never mutated, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSection {
    /// Localized display title.
    pub title: String,
    /// Trimmed section body.
    pub content: String,
}

/// Parsed digest of a single outlet's summary.
#[derive(Debug, Clone, Serialize)]
pub struct SourceDigest {
    /// Normalized outlet domain (see [`crate::utils::normalize_domain`]).
    pub domain: String,
    /// Short preview string, always display-ready.
    pub preview: String,
    /// Ordered sections of the full summary.
    pub sections: Vec<ParsedSection>,
}

/// The rendered product of one digest run.
///
/// Serialized as-is to `{json_output_dir}/{date}/{language}.json` and
/// rendered to Markdown by [`crate::outputs::markdown`].
#[derive(Debug, Serialize)]
pub struct DigestPage {
    /// Date of the digest in `YYYY-MM-DD` format.
    pub date: String,
    /// Language of the rendered text, serialized as its two-letter code.
    pub language: Language,
    /// Local timestamp of generation.
    pub generated_at: String,
    /// One digest per outlet, in upstream order.
    pub sources: Vec<SourceDigest>,
    /// Unified topics retained after source filtering; empty when the
    /// analysis endpoint had nothing for this date.
    pub topics: Vec<UnifiedTopic>,
    /// Dashboard metrics derived from the topics, absent without analysis.
    pub dashboard: Option<DashboardMetrics>,
    /// Upstream explanation when the analysis block is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_list_deserialization() {
        let json = r#"{
            "success": true,
            "summaries": [
                {"domain": "telex.hu", "language": "hu", "date": "2025-05-06",
                 "content": "[START_SHORT_SUMMARY]Rövid.[END_SHORT_SUMMARY]"}
            ]
        }"#;

        let parsed: SummaryListResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.summaries.len(), 1);
        assert_eq!(parsed.summaries[0].domain, "telex.hu");
    }

    #[test]
    fn test_summary_list_missing_summaries_defaults_empty() {
        let parsed: SummaryListResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.summaries.is_empty());
    }

    #[test]
    fn test_analysis_response_deserialization() {
        let json = r#"{
            "success": true,
            "date": "2025-05-06",
            "analysis": {
                "date": "2025-05-06",
                "unified_topics": [
                    {
                        "name": "Költségvetés",
                        "comparative_analysis": "Eltérő keretezés.",
                        "source_coverage": [
                            {
                                "domain": "telex",
                                "original_topic_name": "Új költségvetés",
                                "sentiment": "negatív",
                                "political_leaning": "közép-bal",
                                "key_phrases": ["megszorítás"],
                                "framing": "Kritikus"
                            }
                        ]
                    }
                ]
            },
            "created_at": "2025-05-06T08:00:00"
        }"#;

        let parsed: CrossSourceAnalysisResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        let analysis = parsed.analysis.unwrap();
        assert_eq!(analysis.unified_topics.len(), 1);
        let coverage = &analysis.unified_topics[0].source_coverage[0];
        assert_eq!(coverage.sentiment, "negatív");
        assert!(coverage.article_urls.is_none());
    }

    #[test]
    fn test_analysis_response_null_analysis() {
        let json = r#"{
            "success": false,
            "date": "2025-05-06",
            "analysis": null,
            "message": "No cross-source analysis found in the database"
        }"#;

        let parsed: CrossSourceAnalysisResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert!(parsed.analysis.is_none());
        assert_eq!(
            parsed.message.as_deref(),
            Some("No cross-source analysis found in the database")
        );
    }

    #[test]
    fn test_parsed_section_equality_is_structural() {
        let a = ParsedSection {
            title: "Gazdaság".to_string(),
            content: "Szöveg".to_string(),
        };
        let b = ParsedSection {
            title: "Gazdaság".to_string(),
            content: "Szöveg".to_string(),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_page_serialization_skips_absent_note() {
        let page = DigestPage {
            date: "2025-05-06".to_string(),
            language: Language::Hu,
            generated_at: "2025-05-06T08:00:00".to_string(),
            sources: vec![],
            topics: vec![],
            dashboard: None,
            analysis_note: None,
        };

        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("2025-05-06"));
        assert!(!json.contains("analysis_note"));
    }
}
