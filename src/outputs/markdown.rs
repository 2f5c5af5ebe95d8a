//! Markdown rendering of a digest page.
//!
//! Produces one self-contained report per run: a card-like block per news
//! source (preview plus parsed sections), the sentiment dashboard as text
//! proportion bars, and the cross-source topic analysis with per-outlet
//! coverage details. All user-visible strings go through the locale tables
//! so the same renderer serves both languages.

use itertools::Itertools;
use std::fmt::Write;

use crate::analysis::{
    classify_leaning, classify_sentiment, count_unique_domains, DashboardMetrics, Leaning,
    LeaningCounts, Sentiment, SentimentCounts,
};
use crate::locale::{label, Language};
use crate::models::{DigestPage, SourceCoverage, SourceDigest, UnifiedTopic};
use crate::utils::{slugify_title, source_display_name};

/// Character width of the text proportion bars in the dashboard.
const BAR_WIDTH: usize = 20;

/// Render a [`DigestPage`] to a Markdown document.
pub fn digest_to_markdown(page: &DigestPage) -> String {
    let lang = page.language;
    let mut md = String::new();

    writeln!(md, "# {} ({})", label(lang, "report.title"), page.date).unwrap();
    writeln!(md).unwrap();
    writeln!(md, "*{}*", page.generated_at).unwrap();
    writeln!(md).unwrap();

    if page.sources.is_empty() {
        writeln!(md, "{}", label(lang, "report.noSummaries")).unwrap();
        writeln!(md).unwrap();
    } else {
        write_source_toc(&mut md, page);
        for source in &page.sources {
            write_source_digest(&mut md, source);
        }
    }

    if let Some(dashboard) = &page.dashboard {
        write_dashboard(&mut md, dashboard, lang);
    }

    write_topics(&mut md, page, lang);

    md
}

fn write_source_toc(md: &mut String, page: &DigestPage) {
    for source in &page.sources {
        let name = source_display_name(&source.domain);
        writeln!(md, "- [{}](#{})", name, slugify_title(name)).unwrap();
    }
    writeln!(md).unwrap();
}

fn write_source_digest(md: &mut String, source: &SourceDigest) {
    writeln!(md, "## {}", source_display_name(&source.domain)).unwrap();
    writeln!(md).unwrap();
    if !source.preview.is_empty() {
        writeln!(md, "> {}", source.preview).unwrap();
        writeln!(md).unwrap();
    }
    for section in &source.sections {
        writeln!(md, "### {}", section.title).unwrap();
        writeln!(md).unwrap();
        writeln!(md, "{}", section.content).unwrap();
        writeln!(md).unwrap();
    }
}

fn write_dashboard(md: &mut String, dashboard: &DashboardMetrics, lang: Language) {
    writeln!(md, "## {}", label(lang, "dashboard.title")).unwrap();
    writeln!(md).unwrap();

    let overall = &dashboard.overall_sentiment;
    writeln!(md, "**{}**", label(lang, "dashboard.overallSentiment")).unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "{}: {:.1}% | {}: {:.1}% | {}: {:.1}%",
        label(lang, "sentiment.positive"),
        overall.positive_pct,
        label(lang, "sentiment.neutral"),
        overall.neutral_pct,
        label(lang, "sentiment.negative"),
        overall.negative_pct,
    )
    .unwrap();
    writeln!(md).unwrap();

    writeln!(md, "**{}**", label(lang, "dashboard.bySource")).unwrap();
    writeln!(md).unwrap();
    for domain in &dashboard.domains {
        if let Some(counts) = dashboard.sentiment_by_source.get(domain) {
            writeln!(
                md,
                "- {}: `{}` {}/{}/{}",
                source_display_name(domain),
                sentiment_bar(counts),
                counts.positive,
                counts.neutral,
                counts.negative,
            )
            .unwrap();
        }
    }
    writeln!(md).unwrap();

    writeln!(md, "**{}**", label(lang, "dashboard.politicalLeaning")).unwrap();
    writeln!(md).unwrap();
    for domain in &dashboard.domains {
        if let Some(counts) = dashboard.leaning_by_source.get(domain) {
            writeln!(
                md,
                "- {}: {} ({} {})",
                source_display_name(domain),
                leaning_summary(counts, lang),
                counts.total(),
                label(lang, "dashboard.topics"),
            )
            .unwrap();
        }
    }
    writeln!(md).unwrap();
}

fn write_topics(md: &mut String, page: &DigestPage, lang: Language) {
    writeln!(md, "## {}", label(lang, "analysis.title")).unwrap();
    writeln!(md).unwrap();

    if let Some(note) = &page.analysis_note {
        writeln!(md, "{}", note).unwrap();
        writeln!(md).unwrap();
        return;
    }
    if page.topics.is_empty() {
        writeln!(md, "{}", label(lang, "analysis.noAnalysis")).unwrap();
        writeln!(md).unwrap();
        return;
    }

    let domain_count = count_unique_domains(&page.topics);
    writeln!(
        md,
        "{} {} {} {}",
        page.topics.len(),
        label(lang, "analysis.topicsComparison"),
        domain_count,
        label(lang, "analysis.differentSources"),
    )
    .unwrap();
    writeln!(md).unwrap();

    for topic in &page.topics {
        write_topic(md, topic, lang);
    }
}

fn write_topic(md: &mut String, topic: &UnifiedTopic, lang: Language) {
    writeln!(md, "### {}", topic.name).unwrap();
    writeln!(md).unwrap();
    if !topic.comparative_analysis.is_empty() {
        writeln!(md, "{}", topic.comparative_analysis).unwrap();
        writeln!(md).unwrap();
    }
    for coverage in &topic.source_coverage {
        write_coverage(md, coverage, lang);
    }
    writeln!(md).unwrap();
}

fn write_coverage(md: &mut String, coverage: &SourceCoverage, lang: Language) {
    writeln!(
        md,
        "- **{}** ({}, {})",
        source_display_name(&coverage.domain),
        sentiment_name(lang, classify_sentiment(&coverage.sentiment)),
        leaning_name(lang, classify_leaning(&coverage.political_leaning)),
    )
    .unwrap();

    if !coverage.original_topic_name.is_empty() {
        writeln!(
            md,
            "  - {}: {}",
            label(lang, "topic.originalTopic"),
            coverage.original_topic_name
        )
        .unwrap();
    }
    if !coverage.framing.is_empty() {
        writeln!(md, "  - {}: {}", label(lang, "topic.framing"), coverage.framing).unwrap();
    }
    if !coverage.key_phrases.is_empty() {
        // The model repeats itself; show each phrase once
        let phrases = coverage.key_phrases.iter().unique().join(", ");
        writeln!(md, "  - {}: {}", label(lang, "topic.keyPhrases"), phrases).unwrap();
    }
    if let Some(urls) = &coverage.article_urls {
        if !urls.is_empty() {
            let links = urls.iter().unique().map(|u| format!("<{}>", u)).join(" ");
            writeln!(md, "  - {}: {}", label(lang, "topic.originalArticles"), links).unwrap();
        }
    }
}

fn sentiment_name(lang: Language, sentiment: Sentiment) -> &'static str {
    let key = match sentiment {
        Sentiment::Positive => "sentiment.positive",
        Sentiment::Neutral => "sentiment.neutral",
        Sentiment::Negative => "sentiment.negative",
    };
    label(lang, key)
}

fn leaning_name(lang: Language, leaning: Leaning) -> &'static str {
    let key = match leaning {
        Leaning::Left => "dashboard.left",
        Leaning::CenterLeft => "dashboard.centerLeft",
        Leaning::Center => "dashboard.center",
        Leaning::CenterRight => "dashboard.centerRight",
        Leaning::Right => "dashboard.right",
    };
    label(lang, key)
}

/// Proportion bar over the three sentiment buckets, `+` positive, `=`
/// neutral, `-` negative.
fn sentiment_bar(counts: &SentimentCounts) -> String {
    scaled_bar(&[
        (counts.positive, '+'),
        (counts.neutral, '='),
        (counts.negative, '-'),
    ])
}

fn leaning_summary(counts: &LeaningCounts, lang: Language) -> String {
    [
        (counts.left, "dashboard.left"),
        (counts.center_left, "dashboard.centerLeft"),
        (counts.center, "dashboard.center"),
        (counts.center_right, "dashboard.centerRight"),
        (counts.right, "dashboard.right"),
    ]
    .iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, key)| format!("{} {}", label(lang, key), n))
    .join(", ")
}

fn scaled_bar(parts: &[(u32, char)]) -> String {
    let total: u32 = parts.iter().map(|(n, _)| n).sum();
    if total == 0 {
        return String::new();
    }
    let mut bar = String::new();
    for (n, c) in parts {
        let width = (*n as usize * BAR_WIDTH) / total as usize;
        for _ in 0..width {
            bar.push(*c);
        }
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dashboard_metrics;
    use crate::models::{ParsedSection, SourceDigest};

    fn sample_page() -> DigestPage {
        let topics = vec![UnifiedTopic {
            name: "Költségvetés".to_string(),
            comparative_analysis: "Eltérő hangsúlyok.".to_string(),
            source_coverage: vec![
                SourceCoverage {
                    domain: "telex".to_string(),
                    original_topic_name: "Új költségvetés".to_string(),
                    sentiment: "negatív".to_string(),
                    political_leaning: "közép-bal".to_string(),
                    key_phrases: vec!["megszorítás".to_string(), "megszorítás".to_string()],
                    framing: "Kritikus".to_string(),
                    article_urls: Some(vec!["https://telex.hu/cikk".to_string()]),
                },
                SourceCoverage {
                    domain: "origo".to_string(),
                    original_topic_name: String::new(),
                    sentiment: "pozitív".to_string(),
                    political_leaning: "jobb".to_string(),
                    key_phrases: vec![],
                    framing: String::new(),
                    article_urls: None,
                },
            ],
        }];
        let dashboard = dashboard_metrics(&topics, None);

        DigestPage {
            date: "2025-05-06".to_string(),
            language: Language::Hu,
            generated_at: "2025-05-06T08:00:00".to_string(),
            sources: vec![SourceDigest {
                domain: "telex".to_string(),
                preview: "Rövid előzetes.".to_string(),
                sections: vec![ParsedSection {
                    title: "Gazdaság".to_string(),
                    content: "A forint erősödött.".to_string(),
                }],
            }],
            topics,
            dashboard: Some(dashboard),
            analysis_note: None,
        }
    }

    #[test]
    fn test_digest_renders_sources_and_sections() {
        let md = digest_to_markdown(&sample_page());
        assert!(md.contains("# Magyar Hírek Összefoglaló (2025-05-06)"));
        assert!(md.contains("## Telex"));
        assert!(md.contains("> Rövid előzetes."));
        assert!(md.contains("### Gazdaság"));
        assert!(md.contains("A forint erősödött."));
    }

    #[test]
    fn test_digest_renders_dashboard() {
        let md = digest_to_markdown(&sample_page());
        assert!(md.contains("## Hírhangulati Elemzés"));
        assert!(md.contains("Pozitív: 50.0%"));
        assert!(md.contains("Negatív: 50.0%"));
        assert!(md.contains("Politikai beállítottság"));
    }

    #[test]
    fn test_digest_renders_topic_coverage() {
        let md = digest_to_markdown(&sample_page());
        assert!(md.contains("### Költségvetés"));
        assert!(md.contains("Eltérő hangsúlyok."));
        assert!(md.contains("**Telex** (Negatív, Közép-bal)"));
        assert!(md.contains("Keretezés: Kritikus"));
        // duplicated key phrase collapses to one
        assert!(md.contains("Kulcsmondatok: megszorítás\n"));
        assert!(md.contains("<https://telex.hu/cikk>"));
    }

    #[test]
    fn test_empty_page_shows_notices() {
        let page = DigestPage {
            date: "2025-05-06".to_string(),
            language: Language::En,
            generated_at: "2025-05-06T08:00:00".to_string(),
            sources: vec![],
            topics: vec![],
            dashboard: None,
            analysis_note: None,
        };
        let md = digest_to_markdown(&page);
        assert!(md.contains("No summaries available for this date."));
        assert!(md.contains("No analysis found for topics on this date."));
    }

    #[test]
    fn test_analysis_note_replaces_topic_block() {
        let mut page = sample_page();
        page.topics.clear();
        page.dashboard = None;
        page.analysis_note = Some("No cross-source analysis found".to_string());
        let md = digest_to_markdown(&page);
        assert!(md.contains("No cross-source analysis found"));
    }

    #[test]
    fn test_scaled_bar_width() {
        let bar = sentiment_bar(&SentimentCounts {
            positive: 1,
            neutral: 1,
            negative: 2,
        });
        assert_eq!(bar, "+++++=====----------");
        assert_eq!(bar.chars().count(), 20);
    }

    #[test]
    fn test_scaled_bar_zero_total() {
        assert_eq!(sentiment_bar(&SentimentCounts::default()), "");
    }
}
