//! Stable heading identifiers.
//!
//! [`HeadingIdAssigner`] is registered on the [`MutationPipeline`] and runs
//! after every dispatched transaction. When the document content changed it
//! walks the post-mutation tree twice:
//!
//! 1. collect every identifier already present on a heading;
//! 2. give each heading that has text but no identifier the lowest free
//!    `{prefix}{n}`, reserving it before moving on.
//!
//! All assignments go out as one patch. Headings that already carry an
//! identifier are never touched, even when their text changes, so anchors
//! into a post survive later edits. The counter restarts from 1 on every pass
//! and is derived from the tree alone; nothing is carried between passes.
//!
//! [`MutationPipeline`]: super::document::MutationPipeline

use super::document::{Document, Interceptor, Step, Transaction};
use std::collections::HashSet;

/// Identifiers already in use on headings of `doc`.
pub fn collect_existing_ids(doc: &Document) -> HashSet<String> {
    doc.descendants()
        .into_iter()
        .filter(|(_, node)| node.is_heading())
        .filter_map(|(_, node)| node.assigned_id().map(str::to_string))
        .collect()
}

/// Lowest `{prefix}{n}` (n ≥ 1) not in `taken`.
fn next_free_id(prefix: &str, counter: &mut usize, taken: &HashSet<String>) -> String {
    loop {
        let candidate = format!("{prefix}{counter}");
        *counter += 1;
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

/// Pipeline interceptor assigning identifiers to new headings.
#[derive(Debug, Clone)]
pub struct HeadingIdAssigner {
    prefix: String,
}

impl HeadingIdAssigner {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The patch that identifies every unidentified, non-empty heading in
    /// `doc`, or `None` when there is nothing to assign.
    pub fn assign(&self, doc: &Document) -> Option<Transaction> {
        let mut taken = collect_existing_ids(doc);
        let mut counter = 1;
        let mut patch = Transaction::new();

        for (path, node) in doc.descendants() {
            let Some(level) = node.heading_level() else {
                continue;
            };
            if node.assigned_id().is_some() {
                continue;
            }
            if !(1..=6).contains(&level) {
                tracing::debug!(%path, level, "skipping heading with unsupported level");
                continue;
            }
            if node.text_content().trim().is_empty() {
                continue;
            }

            let id = next_free_id(&self.prefix, &mut counter, &taken);
            taken.insert(id.clone());
            patch.push(Step::SetHeadingId { path, id });
        }

        if !patch.doc_changed() {
            return None;
        }
        tracing::debug!(assigned = patch.steps.len(), "assigned heading ids");
        Some(patch)
    }
}

impl Default for HeadingIdAssigner {
    fn default() -> Self {
        Self::new("h-")
    }
}

impl Interceptor for HeadingIdAssigner {
    fn name(&self) -> &str {
        "heading-ids"
    }

    fn append_transaction(
        &self,
        transactions: &[Transaction],
        doc: &Document,
    ) -> Option<Transaction> {
        if !transactions.iter().any(Transaction::doc_changed) {
            return None;
        }
        self.assign(doc)
    }
}
