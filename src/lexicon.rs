//! Fixed word tables for passive-voice and transition-word detection.
//!
//! Both detectors are lexical, not grammatical: they look for known word
//! sequences at ASCII word boundaries, case-insensitively. The tables are
//! part of the scoring contract, so changing them changes scores.

use crate::text::is_word_char;

/// Forms of "to be" that can open a passive construction.
pub const PASSIVE_AUXILIARIES: &[&str] =
    &["am", "is", "are", "was", "were", "be", "been", "being"];

/// Irregular past participles recognised after an auxiliary. Regular
/// participles are caught by the `-ed` rule in [`is_participle`].
pub const IRREGULAR_PARTICIPLES: &[&str] = &[
    "built",
    "bought",
    "caught",
    "done",
    "felt",
    "found",
    "given",
    "gone",
    "had",
    "heard",
    "kept",
    "known",
    "left",
    "lost",
    "made",
    "met",
    "paid",
    "put",
    "read",
    "said",
    "seen",
    "sent",
    "set",
    "shown",
    "sung",
    "sat",
    "spoken",
    "spent",
    "stood",
    "taken",
    "told",
    "thought",
    "understood",
    "worn",
    "won",
];

/// Connective phrases scored as a readability positive. Earlier entries win
/// when two could start at the same position.
pub const TRANSITION_PHRASES: &[&str] = &[
    "also",
    "besides",
    "furthermore",
    "moreover",
    "in addition",
    "therefore",
    "thus",
    "consequently",
    "as a result",
    "however",
    "nevertheless",
    "on the other hand",
    "in contrast",
    "first",
    "second",
    "third",
    "finally",
    "next",
    "then",
    "for example",
    "for instance",
    "in particular",
    "specifically",
    "in conclusion",
    "to summarize",
    "in summary",
];

/// A maximal run of word characters and its byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WordSpan<'a> {
    word: &'a str,
    start: usize,
    end: usize,
}

fn word_spans(text: &str) -> Vec<WordSpan<'_>> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push(WordSpan {
                    word: &text[s..i],
                    start: s,
                    end: i,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(WordSpan {
            word: &text[s..],
            start: s,
            end: text.len(),
        });
    }
    spans
}

fn is_auxiliary(word: &str) -> bool {
    PASSIVE_AUXILIARIES
        .iter()
        .any(|aux| aux.eq_ignore_ascii_case(word))
}

/// A regular `-ed` form (at least one letter before the suffix) or a listed
/// irregular participle.
fn is_participle(word: &str) -> bool {
    let regular = word.len() > 2
        && word
            .get(word.len() - 2..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case("ed"));
    regular
        || IRREGULAR_PARTICIPLES
            .iter()
            .any(|p| p.eq_ignore_ascii_case(word))
}

/// Count passive constructions: an auxiliary followed, after whitespace only,
/// by a participle. Matches do not overlap.
pub fn count_passive_constructions(text: &str) -> usize {
    let spans = word_spans(text);
    let mut count = 0;
    let mut i = 0;
    while i + 1 < spans.len() {
        let (aux, next) = (spans[i], spans[i + 1]);
        let gap = &text[aux.end..next.start];
        let separated_by_space = !gap.is_empty() && gap.chars().all(char::is_whitespace);
        if separated_by_space && is_auxiliary(aux.word) && is_participle(next.word) {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

/// Count transition phrases starting at word boundaries. Matches do not
/// overlap, and a phrase must end at a word boundary too.
pub fn count_transition_phrases(text: &str) -> usize {
    let spans = word_spans(text);
    let mut count = 0;
    let mut resume_at = 0;
    for span in &spans {
        if span.start < resume_at {
            continue;
        }
        if let Some(len) = match_phrase_at(text, span.start) {
            count += 1;
            resume_at = span.start + len;
        }
    }
    count
}

fn match_phrase_at(text: &str, start: usize) -> Option<usize> {
    let rest = &text[start..];
    TRANSITION_PHRASES.iter().find_map(|phrase| {
        let candidate = rest.get(..phrase.len())?;
        if !candidate.eq_ignore_ascii_case(phrase) {
            return None;
        }
        let at_boundary = rest[phrase.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        at_boundary.then_some(phrase.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_expected_sizes() {
        assert_eq!(PASSIVE_AUXILIARIES.len(), 8);
        assert_eq!(IRREGULAR_PARTICIPLES.len(), 35);
        assert_eq!(TRANSITION_PHRASES.len(), 26);
    }

    #[test]
    fn passive_regular_participle() {
        assert_eq!(count_passive_constructions("The ball was kicked by Sam."), 1);
    }

    #[test]
    fn passive_irregular_participle() {
        assert_eq!(count_passive_constructions("The house was built. It is known."), 2);
    }

    #[test]
    fn passive_is_case_insensitive() {
        assert_eq!(count_passive_constructions("WAS TAKEN and Were Sent"), 2);
    }

    #[test]
    fn passive_requires_whitespace_gap() {
        assert_eq!(count_passive_constructions("It was, built later"), 0);
        assert_eq!(count_passive_constructions("it wasbuilt"), 0);
    }

    #[test]
    fn passive_ignores_bare_ed() {
        // "ed" alone is not an -ed participle
        assert_eq!(count_passive_constructions("is ed"), 0);
        assert_eq!(count_passive_constructions("is red"), 1);
    }

    #[test]
    fn passive_requires_auxiliary_word_boundary() {
        // "this" ends in "is" but is not the auxiliary
        assert_eq!(count_passive_constructions("this done"), 0);
    }

    #[test]
    fn active_voice_not_counted() {
        assert_eq!(count_passive_constructions("Sam kicked the ball."), 0);
    }

    #[test]
    fn transitions_single_and_multi_word() {
        let text = "However, it rained. For example, the roads flooded. In conclusion, stay home.";
        assert_eq!(count_transition_phrases(text), 3);
    }

    #[test]
    fn transitions_respect_word_boundaries() {
        // "thence" and "nextdoor" contain phrases but not at boundaries
        assert_eq!(count_transition_phrases("thence the nextdoor neighbour"), 0);
        assert_eq!(count_transition_phrases("firstly"), 0);
    }

    #[test]
    fn transitions_case_insensitive() {
        assert_eq!(count_transition_phrases("THEN also Thus"), 3);
    }

    #[test]
    fn transitions_empty_text() {
        assert_eq!(count_transition_phrases(""), 0);
        assert_eq!(count_passive_constructions(""), 0);
    }
}
