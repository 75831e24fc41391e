//! Post discovery, loading, and batch analysis.
//!
//! The command-line host analyzes posts saved on disk. This module finds
//! them, turns each into the same serialized HTML an editor would hand the
//! engine, and runs the analysis over all of them in parallel.
//!
//! ## Post files
//!
//! ```text
//! posts/
//! ├── config.toml          # Analyzer configuration (ignored by the scan)
//! ├── 2024-intro.html      # HTML post
//! ├── draft.md             # Markdown post, rendered to HTML first
//! ├── .hidden.html         # Hidden files and directories are skipped
//! └── archive/
//!     └── old-post.htm     # Directories are walked recursively
//! ```
//!
//! ## Meta fields
//!
//! A saved post carries no settings panel, so missing meta fields are filled
//! the way the editor fills them for a new post:
//!
//! | Field            | Default                                        |
//! |------------------|------------------------------------------------|
//! | meta title       | text of the first `<h1>`, else the file stem   |
//! | meta description | excerpt of the plain text                      |
//! | URL slug         | slug of the meta title                         |
//! | focus keyword    | none                                           |
//!
//! ## Parallel Processing
//!
//! Posts are analyzed in parallel using [rayon](https://docs.rs/rayon); the
//! global pool size comes from `[processing]` in the config.

use crate::config::AnalysisConfig;
use crate::engine;
use crate::markup::{self, ParsedHtml};
use crate::outline;
use crate::text;
use crate::types::{AnalysisInput, ContentReport, HeadingItem};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a post file (expected .html, .htm or .md): {0}")]
    NotAPost(PathBuf),
    #[error("{0} already exists; pass --force to replace it")]
    WouldOverwrite(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostFormat {
    Html,
    Markdown,
}

impl PostFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(PostFormat::Html),
            "md" | "markdown" => Some(PostFormat::Markdown),
            _ => None,
        }
    }
}

/// A post read from disk, with its content as serialized HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub path: PathBuf,
    pub format: PostFormat,
    /// Text of the first `<h1>`, else the file stem with dashes as spaces.
    pub title: String,
    pub html: String,
}

/// Meta fields given on the command line. `None` falls back to the defaults
/// in the module docs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMeta {
    pub focus_keyword: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

/// Result of analyzing one post.
#[derive(Debug, Clone, Serialize)]
pub struct PostReport {
    pub path: PathBuf,
    pub title: String,
    pub url_slug: String,
    pub report: ContentReport,
    pub headings: Vec<HeadingItem>,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name.len() > 1
}

/// All post files beneath `root`, sorted by path. A post file given directly
/// is returned as is.
pub fn find_posts(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if root.is_file() {
        return match PostFormat::from_path(root) {
            Some(_) => Ok(vec![root.to_path_buf()]),
            None => Err(ScanError::NotAPost(root.to_path_buf())),
        };
    }

    let mut posts = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && PostFormat::from_path(entry.path()).is_some() {
            tracing::trace!(path = %entry.path().display(), "found post");
            posts.push(entry.into_path());
        }
    }
    posts.sort();
    Ok(posts)
}

/// [`find_posts`] over several roots, keeping first-seen order and dropping
/// duplicates.
pub fn discover(roots: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
    let mut all: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for root in roots {
        for post in find_posts(root)? {
            if seen.insert(post.clone()) {
                all.push(post);
            }
        }
    }
    tracing::debug!(roots = roots.len(), posts = all.len(), "discovered posts");
    Ok(all)
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Read a post file, rendering Markdown to HTML.
pub fn load_post(path: &Path) -> Result<Post, ScanError> {
    let format =
        PostFormat::from_path(path).ok_or_else(|| ScanError::NotAPost(path.to_path_buf()))?;
    let content = fs::read_to_string(path)?;
    let html = match format {
        PostFormat::Html => content,
        PostFormat::Markdown => markdown_to_html(&content),
    };

    let title = ParsedHtml::parse(&html)
        .texts_of("h1")
        .into_iter()
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| title_from_stem(path));

    Ok(Post {
        path: path.to_path_buf(),
        format,
        title,
        html,
    })
}

/// Where an annotated copy of `post` is saved. HTML posts are rewritten in
/// place; a Markdown post is saved next to its source as `.html`, and an
/// existing file there is only replaced when `force` is set.
pub fn annotated_path(post: &Post, force: bool) -> Result<PathBuf, ScanError> {
    match post.format {
        PostFormat::Html => Ok(post.path.clone()),
        PostFormat::Markdown => {
            let target = post.path.with_extension("html");
            if target.exists() && !force {
                return Err(ScanError::WouldOverwrite(target));
            }
            Ok(target)
        }
    }
}

/// The engine input for `post`, with defaults for meta fields not in `meta`.
pub fn input_for(post: &Post, meta: &PostMeta, config: &AnalysisConfig) -> AnalysisInput {
    let title = meta.title.clone().unwrap_or_else(|| post.title.clone());
    let description = meta.description.clone().unwrap_or_else(|| {
        text::excerpt(&markup::strip_tags(&post.html), config.reading.excerpt_length)
    });
    let slug = meta
        .slug
        .clone()
        .unwrap_or_else(|| text::generate_slug(&title));

    AnalysisInput::new(post.html.clone())
        .with_focus_keyword(meta.focus_keyword.clone().unwrap_or_default())
        .with_meta_title(title)
        .with_meta_description(description)
        .with_url_slug(slug)
}

/// Load and analyze one post.
pub fn analyze_post(
    path: &Path,
    meta: &PostMeta,
    config: &AnalysisConfig,
) -> Result<PostReport, ScanError> {
    let post = load_post(path)?;
    let input = input_for(&post, meta, config);
    let report = engine::analyze(&input, &config.reading);
    let headings = outline::load_html(&post.html, &config.outline.id_prefix).headings();

    tracing::debug!(
        path = %path.display(),
        seo = report.seo.seo_score,
        readability = report.readability.readability_score,
        "analyzed post"
    );
    Ok(PostReport {
        path: post.path,
        title: input.meta_title,
        url_slug: input.url_slug,
        report,
        headings,
    })
}

/// Analyze every path in parallel. Results keep the order of `paths`.
pub fn analyze_posts(
    paths: &[PathBuf],
    meta: &PostMeta,
    config: &AnalysisConfig,
) -> Vec<Result<PostReport, ScanError>> {
    paths
        .par_iter()
        .map(|path| analyze_post(path, meta, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn finds_posts_recursively_and_sorted() {
        let tmp = setup_posts();
        let posts = find_posts(tmp.path()).unwrap();
        assert_eq!(file_names(&posts), vec!["draft.md", "intro.html", "deep.htm"]);
    }

    #[test]
    fn skips_hidden_entries() {
        let tmp = setup_posts();
        write_file(tmp.path(), ".secret.html", "<p>x</p>");
        write_file(tmp.path(), ".git/objects.html", "<p>x</p>");
        let posts = find_posts(tmp.path()).unwrap();
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn single_file_root() {
        let tmp = setup_posts();
        let file = tmp.path().join("intro.html");
        assert_eq!(find_posts(&file).unwrap(), vec![file]);
        assert!(matches!(
            find_posts(&tmp.path().join("notes.txt")),
            Err(ScanError::NotAPost(_))
        ));
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = setup_posts();
        assert!(matches!(
            find_posts(&tmp.path().join("nope")),
            Err(ScanError::NotFound(_))
        ));
    }

    #[test]
    fn discover_deduplicates() {
        let tmp = setup_posts();
        let roots = vec![tmp.path().join("intro.html"), tmp.path().to_path_buf()];
        let posts = discover(&roots).unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0], tmp.path().join("intro.html"));
    }

    #[test]
    fn discover_same_root_twice_keeps_first_order() {
        let tmp = setup_posts();
        let roots = vec![
            tmp.path().join("nested"),
            tmp.path().to_path_buf(),
            tmp.path().join("nested"),
        ];
        let posts = discover(&roots).unwrap();
        assert_eq!(file_names(&posts), vec!["deep.htm", "draft.md", "intro.html"]);
    }

    #[test]
    fn annotated_path_for_html_is_the_post() {
        let tmp = setup_posts();
        let post = load_post(&tmp.path().join("intro.html")).unwrap();
        assert_eq!(annotated_path(&post, false).unwrap(), post.path);
    }

    #[test]
    fn annotated_path_for_markdown_refuses_to_clobber() {
        let tmp = setup_posts();
        let post = load_post(&tmp.path().join("draft.md")).unwrap();
        let target = tmp.path().join("draft.html");
        assert_eq!(annotated_path(&post, false).unwrap(), target);

        write_file(tmp.path(), "draft.html", "<p>hand written</p>");
        assert!(matches!(
            annotated_path(&post, false),
            Err(ScanError::WouldOverwrite(path)) if path == target
        ));
        assert_eq!(annotated_path(&post, true).unwrap(), target);
    }

    #[test]
    fn markdown_posts_are_rendered() {
        let tmp = setup_posts();
        let post = load_post(&tmp.path().join("draft.md")).unwrap();
        assert_eq!(post.format, PostFormat::Markdown);
        assert_eq!(post.title, "Draft notes");
        assert!(post.html.contains("<h2>Next steps</h2>"));
    }

    #[test]
    fn title_falls_back_to_stem() {
        let tmp = setup_posts();
        let path = write_file(tmp.path(), "my-first_post.html", "<p>No heading.</p>");
        assert_eq!(load_post(&path).unwrap().title, "my first post");
    }

    #[test]
    fn input_defaults_from_post() {
        let post = Post {
            path: PathBuf::from("intro.html"),
            format: PostFormat::Html,
            title: "Getting started with Rust".into(),
            html: SAMPLE_POST.into(),
        };
        let input = input_for(&post, &PostMeta::default(), &AnalysisConfig::default());
        assert_eq!(input.meta_title, "Getting started with Rust");
        assert_eq!(input.url_slug, "getting-started-with-rust");
        assert!(input.focus_keyword.is_empty());
        assert!(input.meta_description.starts_with("Getting started with Rust Rust is"));
        assert!(input.meta_description.chars().count() <= 160);
    }

    #[test]
    fn explicit_meta_wins() {
        let tmp = setup_posts();
        let path = write_file(tmp.path(), "x.html", "<h1>Heading</h1><p>Body.</p>");
        let post = load_post(&path).unwrap();
        let meta = PostMeta {
            focus_keyword: Some("body".into()),
            title: Some("Custom".into()),
            description: Some("Desc".into()),
            slug: Some("custom-slug".into()),
        };
        let input = input_for(&post, &meta, &AnalysisConfig::default());
        assert_eq!(input.focus_keyword, "body");
        assert_eq!(input.meta_title, "Custom");
        assert_eq!(input.meta_description, "Desc");
        assert_eq!(input.url_slug, "custom-slug");
    }

    #[test]
    fn batch_keeps_order_and_reports_errors() {
        let tmp = setup_posts();
        let paths = vec![
            tmp.path().join("intro.html"),
            tmp.path().join("missing.html"),
            tmp.path().join("draft.md"),
        ];
        let results = analyze_posts(&paths, &PostMeta::default(), &AnalysisConfig::default());
        assert_eq!(results.len(), 3);
        let intro = results[0].as_ref().unwrap();
        assert_eq!(intro.title, "Getting started with Rust");
        assert_eq!(intro.headings.len(), 3);
        assert_eq!(intro.headings[0].id, "h-1");
        assert!(matches!(results[1], Err(ScanError::Io(_))));
        assert!(results[2].is_ok());
    }
}
