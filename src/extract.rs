//! Metrics extraction from serialized rich content.
//!
//! This is the leaf of the analysis pipeline: both analyzers read the
//! [`ExtractedMetrics`] produced here and never look at markup themselves.
//!
//! ```text
//! raw HTML ──► plain text ──► words / sentences / paragraphs / syllables
//!          ├─► first <p> text
//!          └─► <h1>..<h6> texts, in document order
//! ```
//!
//! Extraction never fails. Blank or whitespace-only content produces
//! [`ExtractedMetrics::default`], and callers skip the analyzers' divisions.

use crate::markup::{HEADING_SELECTOR, ParsedHtml};
use crate::text;
use crate::types::ExtractedMetrics;

/// Extract text and counts from serialized rich content.
pub fn extract(raw_content: &str) -> ExtractedMetrics {
    let parsed = ParsedHtml::parse(raw_content);
    let plain_text = parsed.plain_text();
    if plain_text.trim().is_empty() {
        return ExtractedMetrics::default();
    }

    ExtractedMetrics {
        first_paragraph_text: first_paragraph_of(&parsed),
        heading_texts: parsed.texts_of(HEADING_SELECTOR),
        word_count: text::count_words(&plain_text),
        sentence_count: text::sentences(&plain_text).len(),
        paragraph_count: text::paragraphs(&plain_text).len(),
        syllable_count: text::count_syllables(&plain_text),
        plain_text,
    }
}

/// Tag-stripped text of the first `<p>` element, or an empty string.
pub fn first_paragraph(raw_content: &str) -> String {
    first_paragraph_of(&ParsedHtml::parse(raw_content))
}

fn first_paragraph_of(parsed: &ParsedHtml) -> String {
    parsed.texts_of("p").into_iter().next().unwrap_or_default()
}

/// Tag-stripped text of every heading element, in document order.
pub fn headings(raw_content: &str) -> Vec<String> {
    ParsedHtml::parse(raw_content).texts_of(HEADING_SELECTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_zero_metrics() {
        assert_eq!(extract(""), ExtractedMetrics::default());
        assert_eq!(extract("   \n\t "), ExtractedMetrics::default());
    }

    #[test]
    fn markup_without_text_yields_zero_metrics() {
        assert_eq!(extract("<p></p><h2> </h2><br>"), ExtractedMetrics::default());
    }

    #[test]
    fn intro_document_counts() {
        let m = extract("<h1>Intro</h1><p>Hello world. This is a test.</p>");
        assert_eq!(m.plain_text, "Intro\n\n\n\nHello world. This is a test.");
        assert_eq!(m.first_paragraph_text, "Hello world. This is a test.");
        assert_eq!(m.heading_texts, vec!["Intro"]);
        assert_eq!(m.word_count, 7);
        assert_eq!(m.sentence_count, 2);
        assert_eq!(m.paragraph_count, 2);
        // Intro(2) Hello(2) world(1) This(1) is(1) a(1) test(1)
        assert_eq!(m.syllable_count, 9);
    }

    #[test]
    fn first_paragraph_strips_inline_markup() {
        let html = r#"<h2>Head</h2><p class="lead">A <a href="/x">link</a> here</p><p>Second</p>"#;
        assert_eq!(first_paragraph(html), "A link here");
    }

    #[test]
    fn first_paragraph_missing_is_empty() {
        assert_eq!(first_paragraph("<h1>Only a heading</h1>"), "");
    }

    #[test]
    fn quoted_angle_bracket_does_not_leak_into_text() {
        let m = extract(r#"<p title="a>b">Hello rust world.</p>"#);
        assert_eq!(m.plain_text, "Hello rust world.");
        assert_eq!(m.first_paragraph_text, "Hello rust world.");
        assert_eq!(m.word_count, 3);
    }

    #[test]
    fn implicitly_closed_paragraph_is_the_first_paragraph() {
        assert_eq!(first_paragraph("<p>First words<p>Second words"), "First words");
    }

    #[test]
    fn script_content_is_not_counted() {
        let m = extract("<p>Two words</p><script>var a = '<p>not prose</p>';</script>");
        assert_eq!(m.word_count, 2);
        assert_eq!(m.first_paragraph_text, "Two words");
    }

    #[test]
    fn headings_in_document_order_all_levels() {
        let html = "<h3>c</h3><p>x</p><h1>a</h1><h6>f</h6><h7>nope</h7>";
        assert_eq!(headings(html), vec!["c", "a", "f"]);
    }

    #[test]
    fn plain_text_input_still_counts() {
        let m = extract("One two three. Four five.\n\nSix!");
        assert_eq!(m.word_count, 6);
        assert_eq!(m.sentence_count, 3);
        assert_eq!(m.paragraph_count, 2);
        assert!(m.first_paragraph_text.is_empty());
        assert!(m.heading_texts.is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = "<h2>Title</h2><p>Body text, with words.</p>";
        assert_eq!(extract(html), extract(html));
    }
}
