//! # Prose Lens
//!
//! The content analysis engine behind a blog editor. It reads the author's
//! in-progress post and answers two questions on every edit: how well the post
//! is set up for search engines and for readers, and what its heading outline
//! looks like.
//!
//! # Architecture: Two Independent Analyzers
//!
//! ```text
//! serialized HTML ──► extract ──► ExtractedMetrics ──┬──► readability ──┐
//!                                                    └──► seo ──────────┴──► score ──► ContentReport
//!
//! document tree ──► MutationPipeline ──► HeadingIdAssigner ──► headings ──► outline view
//! ```
//!
//! The scoring side is a chain of pure functions over serialized content. The
//! outline side lives inside the document's mutation pipeline: it never reads
//! serialized text, only the live tree, and it only ever adds identifiers.
//!
//! Keeping them apart has two benefits:
//!
//! - **Determinism**: the same input always yields the same report, so the
//!   engine can memoize on the input and re-read freely.
//! - **Stability**: heading identifiers are part of the document, not derived
//!   from it, so anchors into a post survive later edits.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`markup`] | HTML parsing (scraper), plain text with block boundaries, element texts |
//! | [`text`] | Words, sentences, paragraphs, syllables, slugs, excerpts, reading time |
//! | [`extract`] | Metrics extraction from serialized content |
//! | [`lexicon`] | Passive-voice and transition-word tables and matchers |
//! | [`readability`] | Flesch reading ease, passive voice, sentence and paragraph lengths, transitions |
//! | [`seo`] | Focus-keyword placement and density, meta field lengths |
//! | [`score`] | Point tables for both scores and the ordered improvement suggestions |
//! | [`engine`] | The pure pipeline plus the memoized, session-owned [`engine::ContentAnalyzer`] |
//! | [`outline`] | Document tree, mutation pipeline, heading identifiers, outline rendering, id write-back |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`scan`] | Post discovery and batch analysis for the command-line host |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared, serializable data model |
//!
//! # Design Decisions
//!
//! ## Explicit Engine State
//!
//! The editor does not reach into a global store. It constructs one
//! [`engine::ContentAnalyzer`] per editing session, feeds it meta fields and
//! content-changed events, and reads scores back. The analyzer memoizes on a
//! SHA-256 of the full input tuple, so reading scores repeatedly is free and
//! changing the keyword alone re-runs the analysis.
//!
//! ## Maud for the Outline View
//!
//! The outline panel is rendered with [Maud](https://maud.lambda.xyz/):
//! heading text is escaped on interpolation, and the markup shape is checked
//! at compile time.
//!
//! ## Counter-Based Heading Identifiers
//!
//! New headings get the lowest free `h-N`, recomputed from the tree on every
//! pass. Short, readable anchors matter more here than global uniqueness:
//! one author edits one document at a time.

pub mod config;
pub mod engine;
pub mod extract;
pub mod lexicon;
pub mod markup;
pub mod outline;
pub mod output;
pub mod readability;
pub mod scan;
pub mod score;
pub mod seo;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
