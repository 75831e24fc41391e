//! Parsed view of the serialized rich text produced by the editor.
//!
//! Parsing is done by [scraper](https://docs.rs/scraper) (html5ever under the
//! hood), so half-pasted fragments recover the way a browser would recover
//! them: `<p>a<p>b` is two paragraphs, quoted `>` stays inside its attribute,
//! and entities are decoded. Nothing in here fails.
//!
//! Editor content is a body fragment. A full saved document works too: only
//! its `<body>` is read.
//!
//! Block-level boundaries matter for the analyzers (a heading must not fuse
//! with the paragraph after it), so [`ParsedHtml::plain_text`] turns them
//! into blank lines while inline tags vanish without a trace. Script, style,
//! template and noscript content is never text.

use scraper::node::Node as HtmlNode;
use scraper::{ElementRef, Html, Selector};

/// Matches every heading element, in document order.
pub const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

const OPAQUE_TAGS: &[&str] = &["script", "style", "template", "noscript"];

pub fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

/// Elements whose content is never prose.
pub fn is_opaque_tag(name: &str) -> bool {
    OPAQUE_TAGS.contains(&name)
}

/// Heading level for `h1`..`h6`, `None` for anything else.
pub fn heading_level(name: &str) -> Option<u8> {
    let bytes = name.as_bytes();
    if bytes.len() == 2 && bytes[0] == b'h' && (b'1'..=b'6').contains(&bytes[1]) {
        Some(bytes[1] - b'0')
    } else {
        None
    }
}

/// Serialized content, parsed once and read many ways.
pub struct ParsedHtml {
    document: Html,
}

impl ParsedHtml {
    pub fn parse(raw: &str) -> Self {
        Self {
            document: Html::parse_document(raw),
        }
    }

    /// The `<body>` element. The parser always creates one.
    pub fn body(&self) -> ElementRef<'_> {
        let root = self.document.root_element();
        root.children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .unwrap_or(root)
    }

    /// All prose, with block boundaries as blank lines and `<br>` as a newline.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self.body(), &mut out);
        out.trim().to_string()
    }

    /// Text of every element matching `css`, in document order. Inner markup
    /// is dropped without adding whitespace, so `<h2>Hel<em>lo</em></h2>`
    /// yields `"Hello"`.
    pub fn texts_of(&self, css: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };
        self.body()
            .select(&selector)
            .filter(|el| !inside_opaque(el))
            .map(|el| inline_text(&el))
            .collect()
    }
}

/// Remove all markup, keeping block boundaries as blank lines.
pub fn strip_tags(html: &str) -> String {
    ParsedHtml::parse(html).plain_text()
}

fn push_text(out: &mut String, text: &str) {
    out.extend(text.chars().map(|c| if c == '\u{a0}' { ' ' } else { c }));
}

fn inline_text(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    for piece in element.text() {
        push_text(&mut out, piece);
    }
    out
}

fn inside_opaque(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| is_opaque_tag(a.value().name()))
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            HtmlNode::Text(text) => push_text(out, text),
            HtmlNode::Element(el) => {
                let name = el.name();
                if is_opaque_tag(name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = is_block_tag(name);
                if block {
                    out.push_str("\n\n");
                }
                collect_text(child_el, out);
                if block {
                    out.push_str("\n\n");
                }
            }
            _ => {}
        }
    }
}
