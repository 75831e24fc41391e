//! Writing heading identifiers back into a saved post.
//!
//! The post is streamed through [lol_html](https://docs.rs/lol_html)'s
//! `HtmlRewriter`. The only edit is setting `id` on heading start tags that
//! have none; every other byte (comments, doctype, entities, attribute order,
//! script bodies) passes through untouched.
//!
//! Identifiers are matched to heading elements by position: the n-th heading
//! start tag in the stream takes the n-th entry of the list, which is the
//! document order [`Document::heading_ids`] reports. Headings inside
//! `template` or `noscript` are not part of that tree and are skipped here
//! too. An entry is only written when its level agrees with the tag, so a
//! stray mismatch never moves an anchor onto the wrong heading.
//!
//! [`Document::heading_ids`]: super::document::Document::heading_ids

use crate::markup::{heading_level, is_opaque_tag};
use lol_html::errors::RewritingError;
use lol_html::html_content::EndTag;
use lol_html::{HtmlRewriter, Settings, element};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

type EndTagResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("HTML rewrite error: {0}")]
    Rewrite(#[from] RewritingError),
    #[error("Rewritten post is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// `html` with identifiers set on the headings that lacked one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenHtml {
    pub html: String,
    /// Number of `id` attributes written.
    pub written: usize,
}

/// Set `id` on heading elements of `html` from `ids`, one entry per heading
/// in document order as `(level, id)`. Headings that already have a non-empty
/// `id` keep it.
pub fn write_heading_ids(
    html: &str,
    ids: &[(u8, Option<String>)],
) -> Result<RewrittenHtml, RewriteError> {
    let mut output = Vec::with_capacity(html.len() + ids.len() * 12);
    let mut written = 0;
    let mut next = ids.iter();
    let opaque_depth = Rc::new(Cell::new(0usize));

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("*", |el| {
                let name = el.tag_name().to_ascii_lowercase();
                if is_opaque_tag(&name) {
                    if let Some(handlers) = el.end_tag_handlers() {
                        opaque_depth.set(opaque_depth.get() + 1);
                        let depth = Rc::clone(&opaque_depth);
                        let handler: lol_html::EndTagHandler<'static> =
                            Box::new(move |_: &mut EndTag<'_>| -> EndTagResult {
                                depth.set(depth.get().saturating_sub(1));
                                Ok(())
                            });
                        handlers.push(handler);
                    }
                    return Ok(());
                }
                if opaque_depth.get() > 0 {
                    return Ok(());
                }
                let Some(level) = heading_level(&name) else {
                    return Ok(());
                };
                let Some((expected, id)) = next.next() else {
                    return Ok(());
                };
                let has_id = el.get_attribute("id").is_some_and(|v| !v.is_empty());
                if let Some(id) = id
                    && !has_id
                    && *expected == level
                {
                    el.set_attribute("id", id)?;
                    written += 1;
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );
    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    if written > 0 {
        tracing::debug!(written, "wrote heading ids");
    }
    Ok(RewrittenHtml {
        html: String::from_utf8(output)?,
        written,
    })
}
