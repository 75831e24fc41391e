//! The analysis engine owned by the editor shell.
//!
//! [`analyze`] is the whole pipeline as a pure function:
//!
//! ```text
//! AnalysisInput ──► extract ──► analyze_readability ──┐
//!                          └──► analyze_seo ──────────┴──► score ──► ContentReport
//! ```
//!
//! [`ContentAnalyzer`] wraps it in the state the editor reads from. The shell
//! constructs one per editing session and feeds it two kinds of events: the
//! settings panel's meta fields and content-changed notifications. Results
//! are memoized on the full input tuple (content, keyword, title,
//! description, slug); changing any part of it invalidates the memo, and
//! re-reading without a change returns the stored report untouched.

use crate::config::ReadingConfig;
use crate::extract::extract;
use crate::readability::analyze_readability;
use crate::score;
use crate::seo::analyze_seo;
use crate::text;
use crate::types::{AnalysisInput, ContentReport, Rating};
use sha2::{Digest, Sha256};

/// Run the full analysis pipeline on one input snapshot.
pub fn analyze(input: &AnalysisInput, reading: &ReadingConfig) -> ContentReport {
    let metrics = extract(&input.raw_content);
    let mut seo = analyze_seo(&metrics, input);
    let mut readability = analyze_readability(&metrics);
    score::apply(&mut seo, &mut readability);
    let reading_time_minutes =
        text::estimate_reading_time(metrics.word_count, reading.words_per_minute);

    ContentReport {
        metrics,
        seo,
        readability,
        reading_time_minutes,
    }
}

/// SHA-256 over every field of the input, each length-prefixed so that
/// moving text between fields always changes the key.
pub fn memo_key(input: &AnalysisInput) -> String {
    let mut hasher = Sha256::new();
    for field in [
        &input.raw_content,
        &input.focus_keyword,
        &input.meta_title,
        &input.meta_description,
        &input.url_slug,
    ] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Memo hit/miss counters, mostly useful in tests and debug logs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u32,
    pub misses: u32,
}

/// Explicitly owned analysis state for one editing session.
#[derive(Debug)]
pub struct ContentAnalyzer {
    reading: ReadingConfig,
    input: AnalysisInput,
    memo: Option<(String, ContentReport)>,
    stats: MemoStats,
}

impl ContentAnalyzer {
    pub fn new(reading: ReadingConfig) -> Self {
        Self {
            reading,
            input: AnalysisInput::default(),
            memo: None,
            stats: MemoStats::default(),
        }
    }

    /// The input the next read will be computed from.
    pub fn input(&self) -> &AnalysisInput {
        &self.input
    }

    pub fn set_focus_keyword(&mut self, keyword: impl Into<String>) {
        self.input.focus_keyword = keyword.into();
    }

    pub fn set_meta_title(&mut self, title: impl Into<String>) {
        self.input.meta_title = title.into();
    }

    pub fn set_meta_description(&mut self, description: impl Into<String>) {
        self.input.meta_description = description.into();
    }

    pub fn set_url_slug(&mut self, slug: impl Into<String>) {
        self.input.url_slug = slug.into();
    }

    /// Content-changed notification from the editor. Takes the serialized
    /// content; the plain text is re-derived here so both always agree.
    pub fn content_changed(&mut self, serialized_content: impl Into<String>) -> &ContentReport {
        self.input.raw_content = serialized_content.into();
        self.report()
    }

    /// Analyze `serialized_content` with the current meta fields and store
    /// the result for the score getters.
    pub fn analyze_seo(&mut self, serialized_content: &str) {
        self.content_changed(serialized_content);
    }

    /// The report for the current input, recomputed only if the input changed
    /// since the last read.
    pub fn report(&mut self) -> &ContentReport {
        let key = memo_key(&self.input);
        if self.memo.as_ref().is_some_and(|(cached, _)| *cached == key) {
            self.stats.hits += 1;
            tracing::trace!(key = %&key[..12], "analysis memo hit");
        } else {
            self.stats.misses += 1;
            self.memo = None;
        }

        let (input, reading) = (&self.input, &self.reading);
        let (_, report) = self.memo.get_or_insert_with(|| {
            let report = analyze(input, reading);
            tracing::debug!(
                key = %&key[..12],
                words = report.metrics.word_count,
                seo = report.seo.seo_score,
                readability = report.readability.readability_score,
                "content analyzed"
            );
            (key, report)
        });
        report
    }

    /// The last computed report without triggering analysis.
    pub fn last_report(&self) -> Option<&ContentReport> {
        self.memo.as_ref().map(|(_, report)| report)
    }

    pub fn seo_score(&mut self) -> u32 {
        self.report().seo.seo_score
    }

    pub fn readability_score(&mut self) -> u32 {
        self.report().readability.readability_score
    }

    pub fn seo_status(&mut self) -> Rating {
        Rating::from_score(self.seo_score())
    }

    pub fn readability_status(&mut self) -> Rating {
        Rating::from_score(self.readability_score())
    }

    pub fn improvements(&mut self) -> Vec<String> {
        self.report().seo.improvements.clone()
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new(ReadingConfig::default())
    }
}
