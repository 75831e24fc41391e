//! CLI output formatting for the `analyze` and `outline` commands.
//!
//! # Information-First Display
//!
//! Output is **post-centric, not file-centric**. Each post leads with its
//! positional index and title; the source path, scores and suggestions follow
//! as indented context lines. The outline is shown as an indented tree in the
//! same positional style, with each heading's anchor trailing.
//!
//! # Output Format
//!
//! ## Analyze
//!
//! ```text
//! 001 Getting started with Rust
//!     Source: posts/intro.html
//!     SEO: 62/100 (ok)
//!     Readability: 90/100 (good)
//!     Words: 42, sentences: 6, paragraphs: 6, reading time: 1 min
//!     Keyword "rust": density 4.8%, title yes, first paragraph yes, headings yes, URL yes
//!     Improvements
//!         Meta title is too short. Aim for 50-60 characters
//!     Outline
//!         001 Getting started with Rust #h-1
//!             001 Installing #h-2
//!             002 First program #h-3
//!
//! Analyzed 3 posts (1 failed), average SEO 54, average readability 81
//! ```
//!
//! ## Outline
//!
//! ```text
//! posts/intro.html
//!     001 Getting started with Rust #h-1
//!         001 Installing #h-2
//! Assigned 2 heading ids
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::outline::{AnnotatedPost, OutlineNode, build_outline};
use crate::scan::{PostReport, ScanError};
use crate::types::SeoAnalysis;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn score_line(label: &str, score: u32) -> String {
    format!(
        "{}{}: {}/100 ({})",
        indent(1),
        label,
        score,
        crate::types::Rating::from_score(score)
    )
}

fn keyword_line(seo: &SeoAnalysis) -> Option<String> {
    if seo.focus_keyword.is_empty() {
        return None;
    }
    Some(format!(
        "{}Keyword \"{}\": density {:.1}%, title {}, first paragraph {}, headings {}, URL {}",
        indent(1),
        seo.focus_keyword,
        seo.keyword_density,
        yes_no(seo.keyword_in_title),
        yes_no(seo.keyword_in_first_paragraph),
        yes_no(seo.keyword_in_headings),
        yes_no(seo.keyword_in_url),
    ))
}

// ============================================================================
// Outline tree
// ============================================================================

/// Format an outline tree, positional indices per sibling level.
///
/// Anonymous groups have no line of their own; their entries appear one
/// level deeper than the surrounding list.
///
/// ```text
/// 001 Intro #h-1
///     001 Setup #h-2
/// 002 Details #h-3
/// ```
pub fn format_outline_tree(nodes: &[OutlineNode], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;
    for node in nodes {
        match node {
            OutlineNode::Entry(entry) => {
                position += 1;
                lines.push(format!(
                    "{}{} {} #{}",
                    indent(depth),
                    format_index(position),
                    entry.text,
                    entry.id
                ));
                lines.extend(format_outline_tree(&entry.children, depth + 1));
            }
            OutlineNode::Group { children } => {
                lines.extend(format_outline_tree(children, depth + 1));
            }
        }
    }
    lines
}

// ============================================================================
// Analyze
// ============================================================================

/// Format one analyzed post.
pub fn format_post_report(index: usize, post: &PostReport) -> Vec<String> {
    let report = &post.report;
    let metrics = &report.metrics;
    let mut lines = vec![
        format!("{} {}", format_index(index), post.title),
        format!("{}Source: {}", indent(1), post.path.display()),
        score_line("SEO", report.seo_score()),
        score_line("Readability", report.readability_score()),
        format!(
            "{}Words: {}, sentences: {}, paragraphs: {}, reading time: {} min",
            indent(1),
            metrics.word_count,
            metrics.sentence_count,
            metrics.paragraph_count,
            report.reading_time_minutes
        ),
    ];
    lines.extend(keyword_line(&report.seo));

    if !report.improvements().is_empty() {
        lines.push(format!("{}Improvements", indent(1)));
        for tip in report.improvements() {
            lines.push(format!("{}{}", indent(2), tip));
        }
    }

    let tree = build_outline(&post.headings);
    if !tree.is_empty() {
        lines.push(format!("{}Outline", indent(1)));
        lines.extend(format_outline_tree(&tree, 2));
    }
    lines
}

/// Format a batch: each post, failures inline, then a summary line.
pub fn format_analyze_output(results: &[(PathBuf, Result<PostReport, ScanError>)]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut analyzed: Vec<&PostReport> = Vec::new();

    for (i, (path, result)) in results.iter().enumerate() {
        match result {
            Ok(post) => {
                lines.extend(format_post_report(i + 1, post));
                analyzed.push(post);
            }
            Err(e) => {
                lines.push(format!("{} {}", format_index(i + 1), path.display()));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
        lines.push(String::new());
    }

    let failed = results.len() - analyzed.len();
    let mut summary = format!("Analyzed {} posts", results.len());
    if failed > 0 {
        summary.push_str(&format!(" ({} failed)", failed));
    }
    if !analyzed.is_empty() {
        let n = analyzed.len() as f64;
        let seo: f64 = analyzed.iter().map(|p| p.report.seo_score() as f64).sum();
        let readability: f64 = analyzed
            .iter()
            .map(|p| p.report.readability_score() as f64)
            .sum();
        summary.push_str(&format!(
            ", average SEO {:.0}, average readability {:.0}",
            seo / n,
            readability / n
        ));
    }
    lines.push(summary);
    lines
}

/// Print analyze output to stdout.
pub fn print_analyze_output(results: &[(PathBuf, Result<PostReport, ScanError>)]) {
    for line in format_analyze_output(results) {
        println!("{}", line);
    }
}

// ============================================================================
// Outline
// ============================================================================

/// Format the outline command's result for one post.
pub fn format_outline_output(path: &Path, post: &AnnotatedPost) -> Vec<String> {
    let mut lines = vec![path.display().to_string()];
    let tree = build_outline(&post.headings);
    if tree.is_empty() {
        lines.push(format!("{}(no headings)", indent(1)));
    } else {
        lines.extend(format_outline_tree(&tree, 1));
    }
    lines.push(match post.assigned {
        0 => "No new heading ids".to_string(),
        1 => "Assigned 1 heading id".to_string(),
        n => format!("Assigned {} heading ids", n),
    });
    lines
}

/// Print outline output to stdout.
pub fn print_outline_output(path: &Path, post: &AnnotatedPost) {
    for line in format_outline_output(path, post) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
