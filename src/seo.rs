//! Keyword placement and meta-field analysis.
//!
//! Keyword checks are case-insensitive substring tests; density counts
//! non-overlapping matches in the plain text against the whole-text word
//! count. With no focus keyword every keyword field stays `false`/`0` while
//! the meta lengths are still measured, so the author gets length feedback
//! before choosing a keyword.

use crate::text;
use crate::types::{AnalysisInput, ExtractedMetrics, SeoAnalysis};

/// Compute SEO metrics. `seo_score` and `improvements` are left empty for the
/// [`score`](crate::score) stage.
pub fn analyze_seo(metrics: &ExtractedMetrics, input: &AnalysisInput) -> SeoAnalysis {
    let keyword = input.focus_keyword.trim();
    let mut analysis = SeoAnalysis {
        focus_keyword: keyword.to_string(),
        title_length: input.meta_title.chars().count(),
        description_length: input.meta_description.chars().count(),
        ..SeoAnalysis::default()
    };

    if keyword.is_empty() {
        return analysis;
    }

    analysis.keyword_density = keyword_density(&metrics.plain_text, metrics.word_count, keyword);
    analysis.keyword_in_title = text::contains_ignore_case(&input.meta_title, keyword);
    analysis.keyword_in_first_paragraph =
        text::contains_ignore_case(&metrics.first_paragraph_text, keyword);
    analysis.keyword_in_headings = metrics
        .heading_texts
        .iter()
        .any(|heading| text::contains_ignore_case(heading, keyword));
    analysis.keyword_in_url = text::contains_ignore_case(&input.url_slug, keyword);
    analysis
}

/// Keyword matches per hundred words; zero when there are no words.
pub fn keyword_density(plain_text: &str, word_count: usize, keyword: &str) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let matches = text::count_occurrences_ignore_case(plain_text, keyword);
    matches as f64 / word_count as f64 * 100.0
}
