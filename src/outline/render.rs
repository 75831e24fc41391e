//! Outline (table of contents) construction and rendering.
//!
//! [`build_outline`] turns the flat, ordered heading list into a tree by
//! level. The shallowest level present forms the root list. Each step deeper
//! opens one nested list under the previous entry, so a jump from `h2` to
//! `h4` opens two; when there is no previous entry at that depth the list is
//! an anonymous [`OutlineNode::Group`]. Stepping back up closes lists until
//! the matching depth.
//!
//! ```text
//! h2 Intro            ul.toc
//! h3 Setup              li  a Intro
//! h3 Usage                  ul
//! h2 Details                  li  a Setup
//!                             li  a Usage
//!                       li  a Details
//! ```
//!
//! [`OutlineView`] renders that tree to markup with `maud`; every entry is an
//! anchor to `#id`, which is what scrolls the heading into view.
//! [`render_outline`] replaces whatever a container held before, so calling
//! it repeatedly with the same headings leaves the same result.

use crate::config::OutlineConfig;
use crate::types::HeadingItem;
use maud::{Markup, html};
use serde::Serialize;

/// One heading in the outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub id: String,
    pub level: u8,
    pub text: String,
    pub children: Vec<OutlineNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutlineNode {
    Entry(OutlineEntry),
    /// A nested list opened without a parent entry to hang from.
    Group { children: Vec<OutlineNode> },
}

/// Close the innermost open list and hang it from its parent.
fn close_frame(frames: &mut Vec<Vec<OutlineNode>>) {
    let Some(nodes) = frames.pop() else {
        return;
    };
    let Some(parent) = frames.last_mut() else {
        return;
    };
    match parent.last_mut() {
        Some(OutlineNode::Entry(entry)) => entry.children.extend(nodes),
        _ => parent.push(OutlineNode::Group { children: nodes }),
    }
}

/// Build the outline tree from headings in document order. Headings with a
/// level outside 1..=6 are ignored.
pub fn build_outline(headings: &[HeadingItem]) -> Vec<OutlineNode> {
    let valid: Vec<&HeadingItem> = headings
        .iter()
        .filter(|h| (1..=6).contains(&h.level))
        .collect();
    let Some(baseline) = valid.iter().map(|h| h.level).min() else {
        return Vec::new();
    };

    // frames[d] holds the open list at depth d below the baseline
    let mut frames: Vec<Vec<OutlineNode>> = vec![Vec::new()];
    for heading in valid {
        let depth = usize::from(heading.level - baseline);
        while frames.len() > depth + 1 {
            close_frame(&mut frames);
        }
        while frames.len() < depth + 1 {
            frames.push(Vec::new());
        }
        if let Some(list) = frames.last_mut() {
            list.push(OutlineNode::Entry(OutlineEntry {
                id: heading.id.clone(),
                level: heading.level,
                text: heading.text.clone(),
                children: Vec::new(),
            }));
        }
    }
    while frames.len() > 1 {
        close_frame(&mut frames);
    }
    frames.pop().unwrap_or_default()
}

/// Anything that can display a rendered outline.
pub trait OutlineContainer {
    /// Discard previous contents and show `markup` instead.
    fn replace_contents(&mut self, markup: Markup);
}

impl OutlineContainer for String {
    fn replace_contents(&mut self, markup: Markup) {
        *self = markup.into_string();
    }
}

/// Presentation options for the outline panel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineView {
    pub title: String,
    pub css_class: String,
    pub levels: Vec<u8>,
}

impl Default for OutlineView {
    fn default() -> Self {
        Self::from(&OutlineConfig::default())
    }
}

impl From<&OutlineConfig> for OutlineView {
    fn from(config: &OutlineConfig) -> Self {
        Self {
            title: config.title.clone(),
            css_class: config.css_class.clone(),
            levels: config.levels.clone(),
        }
    }
}

impl OutlineView {
    /// Headings at the levels this view shows, in order.
    pub fn visible(&self, headings: &[HeadingItem]) -> Vec<HeadingItem> {
        headings
            .iter()
            .filter(|h| self.levels.contains(&h.level))
            .cloned()
            .collect()
    }

    pub fn render(&self, headings: &[HeadingItem]) -> Markup {
        let tree = build_outline(&self.visible(headings));
        html! {
            @if !self.title.is_empty() {
                div.toc-title { (self.title) }
            }
            ul class=(self.css_class) {
                @for node in &tree {
                    (render_node(node))
                }
            }
        }
    }
}

fn render_node(node: &OutlineNode) -> Markup {
    match node {
        OutlineNode::Entry(entry) => html! {
            li {
                a class={ "toc-item toc-item-h" (entry.level) }
                    href={ "#" (entry.id) }
                    data-heading-id=(entry.id) { (entry.text) }
                @if !entry.children.is_empty() {
                    ul {
                        @for child in &entry.children {
                            (render_node(child))
                        }
                    }
                }
            }
        },
        OutlineNode::Group { children } => html! {
            li.toc-group {
                ul {
                    @for child in children {
                        (render_node(child))
                    }
                }
            }
        },
    }
}

/// Render `headings` into `container`, replacing its previous contents.
pub fn render_outline<C: OutlineContainer + ?Sized>(
    container: &mut C,
    headings: &[HeadingItem],
    view: &OutlineView,
) {
    container.replace_contents(view.render(headings));
}
