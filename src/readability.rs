//! Readability analysis.
//!
//! A pure function of [`ExtractedMetrics`]: the counts drive reading ease and
//! the plain text drives the per-sentence, per-paragraph and lexical
//! measurements.
//!
//! ## Paragraph length is measured per paragraph
//!
//! `avg_paragraph_length` re-splits sentences inside each paragraph instead of
//! dividing the whole-text sentence count by the paragraph count. A sentence
//! that runs across a blank line (a heading with no terminator followed by a
//! paragraph, say) counts once for the whole text but once in each paragraph
//! it touches. The two numbers are expected to disagree.
//!
//! ## Reading ease
//!
//! Flesch reading ease:
//!
//! ```text
//! 206.835 − 1.015 × (words / sentences) − 84.6 × (syllables / words)
//! ```
//!
//! clamped to `[0, 100]`. Zero when there are no words or no sentences.

use crate::lexicon;
use crate::text;
use crate::types::{ExtractedMetrics, ReadabilityAnalysis};

/// Compute readability metrics. `readability_score` is left at zero for the
/// [`score`](crate::score) stage.
pub fn analyze_readability(metrics: &ExtractedMetrics) -> ReadabilityAnalysis {
    if metrics.is_empty() {
        return ReadabilityAnalysis::default();
    }
    let text = metrics.plain_text.as_str();

    let sentences = text::sentences(text);
    let sentence_words: usize = sentences.iter().map(|s| text::count_words(s)).sum();
    let avg_sentence_length = ratio(sentence_words, sentences.len());

    let paragraphs = text::paragraphs(text);
    let paragraph_sentences: usize = paragraphs
        .iter()
        .map(|p| text::sentences(p).len())
        .sum();
    let avg_paragraph_length = ratio(paragraph_sentences, paragraphs.len());

    let reading_ease = if metrics.word_count > 0 && metrics.sentence_count > 0 {
        206.835
            - 1.015 * (metrics.word_count as f64 / metrics.sentence_count as f64)
            - 84.6 * (metrics.syllable_count as f64 / metrics.word_count as f64)
    } else {
        0.0
    };

    let passive = lexicon::count_passive_constructions(text);
    let transitions = lexicon::count_transition_phrases(text);

    ReadabilityAnalysis {
        reading_ease: reading_ease.clamp(0.0, 100.0),
        passive_voice_pct: (ratio(passive, sentences.len()) * 100.0).min(100.0),
        avg_sentence_length,
        avg_paragraph_length,
        transition_word_pct: ratio(transitions, sentences.len()) * 100.0,
        analyzed_words: metrics.word_count,
        readability_score: 0,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
