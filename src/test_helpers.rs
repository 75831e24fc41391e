//! Shared test utilities for the prose-lens test suite.
//!
//! Provides builders for headings and document nodes, a sample post, and a
//! temp-directory fixture with a small tree of posts for scan and batch
//! tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_posts();
//! let files = crate::scan::find_posts(tmp.path()).unwrap();
//! assert_eq!(file_names(&files), vec!["draft.md", "intro.html", "deep.htm"]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::outline::document::Node;
use crate::types::HeadingItem;

/// A short post with a heading hierarchy and a few paragraphs.
pub const SAMPLE_POST: &str = "<h1>Getting started with Rust</h1>\
<p>Rust is a systems language. However, it feels high level.</p>\
<h2>Installing</h2>\
<p>The toolchain is installed with rustup. It was designed for this.</p>\
<h2>First program</h2>\
<p>Write a main function. Then run it.</p>";

pub const SAMPLE_MARKDOWN: &str = "# Draft notes\n\nShort intro paragraph.\n\n## Next steps\n\nMore text here.\n";

pub fn heading(id: &str, level: u8, text: &str) -> HeadingItem {
    HeadingItem::new(id, level, text)
}

/// Heading, paragraph, heading, paragraph; no identifiers.
pub fn sample_nodes() -> Vec<Node> {
    vec![
        Node::heading(1, "Title"),
        Node::paragraph("Opening paragraph."),
        Node::heading(2, "Section"),
        Node::paragraph("Section body."),
    ]
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding a small tree of posts:
///
/// ```text
/// intro.html
/// draft.md
/// notes.txt          (ignored by scans)
/// nested/deep.htm
/// ```
pub fn setup_posts() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "intro.html", SAMPLE_POST);
    write_file(tmp.path(), "draft.md", SAMPLE_MARKDOWN);
    write_file(tmp.path(), "notes.txt", "not a post");
    write_file(tmp.path(), "nested/deep.htm", "<h2>Deep</h2><p>Nested post.</p>");
    tmp
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// File names of `paths`, in the given order.
pub fn file_names(paths: &[PathBuf]) -> Vec<&str> {
    paths
        .iter()
        .map(|p| p.file_name().and_then(|n| n.to_str()).unwrap())
        .collect()
}
