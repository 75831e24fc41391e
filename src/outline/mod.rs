//! Heading outline: stable heading identifiers and the table of contents.
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Document tree, transactions and the mutation pipeline |
//! | [`heading_ids`] | Interceptor that gives every new heading a unique identifier |
//! | [`render`] | Outline tree building and HTML rendering |
//! | [`rewrite`] | Writing assigned identifiers back into a saved post |
//!
//! An editor session owns a [`MutationPipeline`] with a [`HeadingIdAssigner`]
//! registered, dispatches every edit through it, and re-renders the outline
//! from [`Document::headings`] after each dispatch. [`load_html`] does the
//! same for a saved post outside an editor session, and [`annotate_html`]
//! also saves the identifiers into the post's own markup.

pub mod document;
pub mod heading_ids;
pub mod render;
pub mod rewrite;

pub use document::{
    Document, DocumentError, Interceptor, MutationPipeline, Node, NodeKind, NodePath, Step,
    Transaction,
};
pub use heading_ids::HeadingIdAssigner;
pub use render::{
    OutlineContainer, OutlineEntry, OutlineNode, OutlineView, build_outline, render_outline,
};
pub use rewrite::{RewriteError, write_heading_ids};

use crate::types::HeadingItem;

/// A post after heading identifiers were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedPost {
    /// The post's own markup with the new identifiers set on its headings.
    pub html: String,
    pub headings: Vec<HeadingItem>,
    /// Number of identifiers assigned by this pass.
    pub assigned: usize,
}

/// Load `html` into a fresh pipeline the way an editor loads a saved post,
/// letting the heading interceptor assign identifiers. Existing identifiers
/// are kept.
pub fn load_html(html: &str, id_prefix: &str) -> Document {
    let parsed = Document::from_html(html);
    let mut pipeline = MutationPipeline::new(Document::default());
    pipeline.register(Box::new(HeadingIdAssigner::new(id_prefix)));
    pipeline.load(parsed.root().children.clone());
    pipeline.into_doc()
}

/// [`load_html`], then write the assigned identifiers into `html` itself.
/// Only heading start tags change.
pub fn annotate_html(html: &str, id_prefix: &str) -> Result<AnnotatedPost, RewriteError> {
    let doc = load_html(html, id_prefix);
    let rewritten = write_heading_ids(html, &doc.heading_ids())?;
    Ok(AnnotatedPost {
        html: rewritten.html,
        headings: doc.headings(),
        assigned: rewritten.written,
    })
}
