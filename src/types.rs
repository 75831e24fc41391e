//! Shared data model for the analysis pipeline.
//!
//! Every type here is a snapshot: inputs are read-only for the duration of a
//! pass and outputs are recomputed from scratch on every run. Nothing carries
//! identity between runs, so all of them derive `PartialEq` and serialize to
//! JSON for the CLI's `--json` mode.

use serde::{Deserialize, Serialize};

/// Everything one analysis pass reads.
///
/// `raw_content` is the serialized rich text (HTML) of the post body. The meta
/// fields are owned by the settings panel of the editor and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub raw_content: String,
    #[serde(default)]
    pub focus_keyword: String,
    #[serde(default)]
    pub meta_title: String,
    /// Source text for the meta description (the post excerpt).
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub url_slug: String,
}

impl AnalysisInput {
    pub fn new(raw_content: impl Into<String>) -> Self {
        Self {
            raw_content: raw_content.into(),
            ..Self::default()
        }
    }

    pub fn with_focus_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.focus_keyword = keyword.into();
        self
    }

    pub fn with_meta_title(mut self, title: impl Into<String>) -> Self {
        self.meta_title = title.into();
        self
    }

    pub fn with_meta_description(mut self, description: impl Into<String>) -> Self {
        self.meta_description = description.into();
        self
    }

    pub fn with_url_slug(mut self, slug: impl Into<String>) -> Self {
        self.url_slug = slug.into();
        self
    }
}

/// Text and counts pulled out of the serialized content.
///
/// All counts are zero and all strings empty for blank content; callers check
/// [`ExtractedMetrics::is_empty`] before dividing by anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetrics {
    pub plain_text: String,
    pub first_paragraph_text: String,
    pub heading_texts: Vec<String>,
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub syllable_count: usize,
}

impl ExtractedMetrics {
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

/// Keyword placement and meta-field measurements.
///
/// `seo_score` and `improvements` stay at their defaults until the
/// [`score`](crate::score) stage fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoAnalysis {
    /// The keyword the analysis ran against, kept so suggestions can quote it.
    pub focus_keyword: String,
    /// Keyword matches per hundred words.
    pub keyword_density: f64,
    pub keyword_in_title: bool,
    pub keyword_in_first_paragraph: bool,
    pub keyword_in_headings: bool,
    pub keyword_in_url: bool,
    /// Length of the meta title in characters.
    pub title_length: usize,
    /// Length of the meta description in characters.
    pub description_length: usize,
    pub seo_score: u32,
    pub improvements: Vec<String>,
}

/// Sentence, paragraph and lexical readability measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityAnalysis {
    /// Flesch reading ease, clamped to `[0, 100]`.
    pub reading_ease: f64,
    /// Passive constructions per hundred sentences, capped at 100.
    pub passive_voice_pct: f64,
    /// Words per sentence.
    pub avg_sentence_length: f64,
    /// Sentences per paragraph, with sentences counted per paragraph.
    pub avg_paragraph_length: f64,
    /// Transition phrases per hundred sentences. Not capped.
    pub transition_word_pct: f64,
    /// Words the analysis saw; zero means there was nothing to read.
    pub analyzed_words: usize,
    pub readability_score: u32,
}

/// Coarse label for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Ok,
    Poor,
}

impl Rating {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Rating::Good
        } else if score >= 50 {
            Rating::Ok
        } else {
            Rating::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Ok => "ok",
            Rating::Poor => "poor",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete result of one analysis pass, as read by the editor UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentReport {
    pub metrics: ExtractedMetrics,
    pub seo: SeoAnalysis,
    pub readability: ReadabilityAnalysis,
    /// Estimated minutes to read the post.
    pub reading_time_minutes: usize,
}

impl ContentReport {
    pub fn seo_score(&self) -> u32 {
        self.seo.seo_score
    }

    pub fn readability_score(&self) -> u32 {
        self.readability.readability_score
    }

    pub fn seo_rating(&self) -> Rating {
        Rating::from_score(self.seo.seo_score)
    }

    pub fn readability_rating(&self) -> Rating {
        Rating::from_score(self.readability.readability_score)
    }

    pub fn improvements(&self) -> &[String] {
        &self.seo.improvements
    }
}

/// A heading as seen by the outline view: its identifier, level and current text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingItem {
    pub id: String,
    pub level: u8,
    pub text: String,
}

impl HeadingItem {
    pub fn new(id: impl Into<String>, level: u8, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_thresholds() {
        assert_eq!(Rating::from_score(100), Rating::Good);
        assert_eq!(Rating::from_score(80), Rating::Good);
        assert_eq!(Rating::from_score(79), Rating::Ok);
        assert_eq!(Rating::from_score(50), Rating::Ok);
        assert_eq!(Rating::from_score(49), Rating::Poor);
        assert_eq!(Rating::from_score(0), Rating::Poor);
    }

    #[test]
    fn rating_serializes_lowercase() {
        let json = serde_json::to_string(&Rating::Good).unwrap();
        assert_eq!(json, "\"good\"");
        assert_eq!(Rating::Poor.to_string(), "poor");
    }

    #[test]
    fn input_builder_sets_fields() {
        let input = AnalysisInput::new("<p>x</p>")
            .with_focus_keyword("rust")
            .with_meta_title("Title")
            .with_meta_description("Desc")
            .with_url_slug("slug");
        assert_eq!(input.raw_content, "<p>x</p>");
        assert_eq!(input.focus_keyword, "rust");
        assert_eq!(input.meta_title, "Title");
        assert_eq!(input.meta_description, "Desc");
        assert_eq!(input.url_slug, "slug");
    }

    #[test]
    fn empty_metrics_report_empty() {
        assert!(ExtractedMetrics::default().is_empty());
    }
}
