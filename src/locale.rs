//! Bilingual (Hungarian/English) lookup tables.
//!
//! Two kinds of lookups live here:
//! - [`SectionTitles`]: maps section keys found in raw summary text
//!   (`BEVEZETO`, `GAZDASAG`, ...) to display titles. The parser takes this
//!   as an argument rather than reading global state, so it stays a pure
//!   function of its inputs and can be tested across languages.
//! - [`label`]: report strings (dashboard headings, sentiment names,
//!   notices) keyed by dotted identifiers. Unmapped keys fall back to the
//!   key itself so a missing entry degrades visibly instead of panicking.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::upcase;

/// Display language for parsed sections and rendered reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Hungarian (default).
    #[default]
    Hu,
    /// English.
    En,
}

impl Language {
    /// Two-letter code used in API query strings and output filenames.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hu => "hu",
            Language::En => "en",
        }
    }
}

/// Localized display titles for the section keys emitted by the upstream
/// generator, plus the synthetic titles the parser needs (introduction,
/// generic fallback, empty-input placeholder).
#[derive(Debug)]
pub struct SectionTitles {
    titles: HashMap<&'static str, &'static str>,
    introduction: &'static str,
    fallback: &'static str,
    unavailable: &'static str,
}

static HU_TITLES: Lazy<SectionTitles> = Lazy::new(|| SectionTitles {
    titles: HashMap::from([
        ("BEVEZETO", "Bevezető"),
        ("BELFOLD", "Belpolitika"),
        ("GAZDASAG", "Gazdaság"),
        ("KULFOLD", "Külföld"),
        ("TARSADALOM", "Társadalom, Kultúra, Tudomány"),
        ("ZARAS", "Zárás"),
    ]),
    introduction: "Bevezető",
    fallback: "Összefoglaló",
    unavailable: "Az összefoglaló nem érhető el.",
});

static EN_TITLES: Lazy<SectionTitles> = Lazy::new(|| SectionTitles {
    titles: HashMap::from([
        ("BEVEZETO", "Introduction"),
        ("BELFOLD", "Domestic Politics"),
        ("GAZDASAG", "Economy"),
        ("KULFOLD", "Foreign Affairs"),
        ("TARSADALOM", "Society, Culture & Science"),
        ("ZARAS", "Conclusion"),
    ]),
    introduction: "Introduction",
    fallback: "Summary",
    unavailable: "Summary unavailable.",
});

impl SectionTitles {
    /// Static title table for a language.
    pub fn for_language(language: Language) -> &'static SectionTitles {
        match language {
            Language::Hu => &HU_TITLES,
            Language::En => &EN_TITLES,
        }
    }

    /// Resolve a section key to its display title.
    ///
    /// Unknown keys are humanized: underscores become spaces and each word
    /// is title-cased, so `SOME_NEW_KEY` renders as `Some New Key`.
    pub fn resolve(&self, key: &str) -> String {
        match self.titles.get(key) {
            Some(title) => (*title).to_string(),
            None => humanize_key(key),
        }
    }

    /// Title of the synthetic introduction section.
    pub fn introduction(&self) -> &'static str {
        self.introduction
    }

    /// Title of the generic fallback section used when no markers matched.
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    /// Placeholder returned by the preview extractor for empty input.
    pub fn unavailable(&self) -> &'static str {
        self.unavailable
    }
}

fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| upcase(&w.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

static HU_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("report.title", "Magyar Hírek Összefoglaló"),
        (
            "report.noSummaries",
            "Jelenleg nincsenek elérhető összefoglalók erre a napra.",
        ),
        ("analysis.title", "Hírforrások Összehasonlító Elemzése"),
        ("analysis.topicsComparison", "téma összehasonlítása"),
        ("analysis.differentSources", "különböző hírforrásból"),
        (
            "analysis.noAnalysis",
            "Erre a napra nem találtunk elemzést a témákról.",
        ),
        ("sentiment.positive", "Pozitív"),
        ("sentiment.neutral", "Semleges"),
        ("sentiment.negative", "Negatív"),
        ("dashboard.title", "Hírhangulati Elemzés"),
        ("dashboard.overallSentiment", "Összes média hangvétele"),
        ("dashboard.bySource", "Médiaforrásonként"),
        ("dashboard.politicalLeaning", "Politikai beállítottság"),
        ("dashboard.topics", "téma"),
        ("dashboard.left", "Bal"),
        ("dashboard.centerLeft", "Közép-bal"),
        ("dashboard.center", "Közép"),
        ("dashboard.centerRight", "Közép-jobb"),
        ("dashboard.right", "Jobb"),
        ("topic.originalTopic", "Eredeti téma"),
        ("topic.framing", "Keretezés"),
        ("topic.keyPhrases", "Kulcsmondatok"),
        ("topic.originalArticles", "Eredeti cikkek"),
    ])
});

static EN_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("report.title", "Hungarian News Summary"),
        ("report.noSummaries", "No summaries available for this date."),
        ("analysis.title", "News Sources Comparative Analysis"),
        ("analysis.topicsComparison", "topics compared from"),
        ("analysis.differentSources", "different news sources"),
        ("analysis.noAnalysis", "No analysis found for topics on this date."),
        ("sentiment.positive", "Positive"),
        ("sentiment.neutral", "Neutral"),
        ("sentiment.negative", "Negative"),
        ("dashboard.title", "News Sentiment Analysis"),
        ("dashboard.overallSentiment", "Overall Media Sentiment"),
        ("dashboard.bySource", "By News Source"),
        ("dashboard.politicalLeaning", "Political Leaning"),
        ("dashboard.topics", "topics"),
        ("dashboard.left", "Left"),
        ("dashboard.centerLeft", "Center-Left"),
        ("dashboard.center", "Center"),
        ("dashboard.centerRight", "Center-Right"),
        ("dashboard.right", "Right"),
        ("topic.originalTopic", "Original Topic"),
        ("topic.framing", "Framing"),
        ("topic.keyPhrases", "Key Phrases"),
        ("topic.originalArticles", "Original Articles"),
    ])
});

/// Look up a report label for the given language.
///
/// Falls back to the key itself when no entry exists.
pub fn label<'a>(language: Language, key: &'a str) -> &'a str {
    let table = match language {
        Language::Hu => &HU_LABELS,
        Language::En => &EN_LABELS,
    };
    table.get(key).copied().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Hu.code(), "hu");
        assert_eq!(Language::En.code(), "en");
        assert_eq!(Language::default(), Language::Hu);
    }

    #[test]
    fn test_resolve_known_key() {
        let hu = SectionTitles::for_language(Language::Hu);
        let en = SectionTitles::for_language(Language::En);
        assert_eq!(hu.resolve("GAZDASAG"), "Gazdaság");
        assert_eq!(en.resolve("GAZDASAG"), "Economy");
    }

    #[test]
    fn test_resolve_unknown_key_humanizes() {
        let titles = SectionTitles::for_language(Language::Hu);
        assert_eq!(titles.resolve("SOME_NEW_KEY"), "Some New Key");
        assert_eq!(titles.resolve("SPORT"), "Sport");
    }

    #[test]
    fn test_resolve_collapses_underscore_runs() {
        let titles = SectionTitles::for_language(Language::En);
        assert_eq!(titles.resolve("A__B"), "A B");
    }

    #[test]
    fn test_introduction_matches_bevezeto_mapping() {
        let hu = SectionTitles::for_language(Language::Hu);
        assert_eq!(hu.introduction(), hu.resolve("BEVEZETO"));
        let en = SectionTitles::for_language(Language::En);
        assert_eq!(en.introduction(), en.resolve("BEVEZETO"));
    }

    #[test]
    fn test_label_lookup_and_fallback() {
        assert_eq!(label(Language::En, "dashboard.title"), "News Sentiment Analysis");
        assert_eq!(label(Language::Hu, "dashboard.title"), "Hírhangulati Elemzés");
        assert_eq!(label(Language::Hu, "no.such.key"), "no.such.key");
    }
}
