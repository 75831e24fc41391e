//! In-memory document tree and its mutation pipeline.
//!
//! The editor owns a tree of block nodes. Every edit arrives as a
//! [`Transaction`]: an ordered list of [`Step`]s addressed by [`NodePath`].
//! The [`MutationPipeline`] applies a transaction and then offers it to each
//! registered [`Interceptor`] in registration order. An interceptor may answer
//! with one extra transaction (a patch), which is applied in the same
//! dispatch and offered to the other interceptors in turn. Dispatch ends when
//! a full round produces no patch.
//!
//! ```text
//! dispatch(tr) ─► apply ─► interceptor 1 ─► interceptor 2 ─► ... ─┐
//!                   ▲                                              │
//!                   └──────────── patch (if any) ◄─────────────────┘
//! ```
//!
//! Each interceptor only sees transactions it has not seen before, and never
//! its own patch, so an idempotent interceptor settles after one extra round.

use crate::markup::{self, ParsedHtml, heading_level};
use scraper::ElementRef;
use scraper::node::Node as HtmlNode;
use crate::types::HeadingItem;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No node at path {0}")]
    InvalidPath(NodePath),
    #[error("Node at path {0} is not a heading")]
    NotAHeading(NodePath),
    #[error("Node at path {0} cannot hold children")]
    NotAContainer(NodePath),
}

/// Position of a node as child indices from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Parent path and index within the parent; `None` for the root.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((NodePath(parent.to_vec()), *last))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(usize::to_string).collect();
        write!(f, "{}", parts.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Doc,
    Heading { level: u8 },
    Paragraph,
    Text(String),
    /// Any other element, by lower-cased tag name.
    Element(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// The node's `id` attribute. Only headings get one assigned.
    pub id: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    fn with_kind(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            id: None,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text(text.into()), Vec::new())
    }

    /// A heading holding a single text run (or nothing, for empty text).
    pub fn heading(level: u8, text: &str) -> Self {
        Self::with_kind(NodeKind::Heading { level }, text_children(text))
    }

    pub fn paragraph(text: &str) -> Self {
        Self::with_kind(NodeKind::Paragraph, text_children(text))
    }

    pub fn element(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_kind(NodeKind::Element(name.into()), children)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// The identifier, treating an empty attribute as absent.
    pub fn assigned_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeKind::Text(text) = &self.kind {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    fn is_container(&self) -> bool {
        !matches!(self.kind, NodeKind::Text(_))
    }
}

fn text_children(text: &str) -> Vec<Node> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(text)]
    }
}

/// The live document: a `Doc` root and its block children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Node,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::with_kind(NodeKind::Doc, children),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        path.0
            .iter()
            .try_fold(&self.root, |node, &i| node.children.get(i))
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        path.0
            .iter()
            .try_fold(&mut self.root, |node, &i| node.children.get_mut(i))
    }

    /// Every node below the root in document (pre-)order, with its path.
    pub fn descendants(&self) -> Vec<(NodePath, &Node)> {
        fn walk<'a>(node: &'a Node, path: &NodePath, out: &mut Vec<(NodePath, &'a Node)>) {
            for (i, child) in node.children.iter().enumerate() {
                let child_path = path.child(i);
                out.push((child_path.clone(), child));
                walk(child, &child_path, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &NodePath::root(), &mut out);
        out
    }

    /// Headings that already carry an identifier and have text, in document
    /// order. This is what the outline view renders.
    pub fn headings(&self) -> Vec<HeadingItem> {
        self.descendants()
            .into_iter()
            .filter_map(|(_, node)| {
                let level = node.heading_level()?;
                let id = node.assigned_id()?;
                let text = node.text_content().trim().to_string();
                (!text.is_empty()).then(|| HeadingItem::new(id, level, text))
            })
            .collect()
    }

    /// Apply one step in place.
    pub fn apply_step(&mut self, step: &Step) -> Result<(), DocumentError> {
        match step {
            Step::SetText { path, text } => {
                let node = self
                    .node_mut(path)
                    .ok_or_else(|| DocumentError::InvalidPath(path.clone()))?;
                if !node.is_container() {
                    if let NodeKind::Text(existing) = &mut node.kind {
                        *existing = text.clone();
                    }
                    return Ok(());
                }
                node.children = text_children(text);
                Ok(())
            }
            Step::InsertNode { parent, index, node } => {
                let target = self
                    .node_mut(parent)
                    .ok_or_else(|| DocumentError::InvalidPath(parent.clone()))?;
                if !target.is_container() {
                    return Err(DocumentError::NotAContainer(parent.clone()));
                }
                if *index > target.children.len() {
                    return Err(DocumentError::InvalidPath(parent.child(*index)));
                }
                target.children.insert(*index, node.clone());
                Ok(())
            }
            Step::RemoveNode { path } => {
                let (parent, index) = path
                    .split_last()
                    .ok_or_else(|| DocumentError::InvalidPath(path.clone()))?;
                let target = self
                    .node_mut(&parent)
                    .filter(|n| index < n.children.len())
                    .ok_or_else(|| DocumentError::InvalidPath(path.clone()))?;
                target.children.remove(index);
                Ok(())
            }
            Step::SetHeadingId { path, id } => {
                let node = self
                    .node_mut(path)
                    .ok_or_else(|| DocumentError::InvalidPath(path.clone()))?;
                if !node.is_heading() {
                    return Err(DocumentError::NotAHeading(path.clone()));
                }
                node.id = Some(id.clone());
                Ok(())
            }
            Step::SetHeadingLevel { path, level } => {
                let node = self
                    .node_mut(path)
                    .ok_or_else(|| DocumentError::InvalidPath(path.clone()))?;
                if !node.is_heading() {
                    return Err(DocumentError::NotAHeading(path.clone()));
                }
                node.kind = NodeKind::Heading { level: *level };
                Ok(())
            }
        }
    }

    /// Apply every step of a transaction, skipping steps whose target cannot
    /// be resolved. Returns the number of steps applied.
    pub fn apply(&mut self, transaction: &Transaction) -> usize {
        let mut applied = 0;
        for step in &transaction.steps {
            match self.apply_step(step) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(error = %e, "skipping unresolvable step"),
            }
        }
        applied
    }

    /// Build a document from serialized HTML. Recovery from broken markup
    /// follows the browser's rules; only the `<body>` of a full document is
    /// read. Each element's `id` attribute is kept, other attributes are not.
    pub fn from_html(html: &str) -> Self {
        let parsed = ParsedHtml::parse(html);
        Self::new(convert_children(parsed.body()))
    }

    /// Identifier of every heading node, in document order, `None` where a
    /// heading has none yet.
    pub fn heading_ids(&self) -> Vec<(u8, Option<String>)> {
        self.descendants()
            .into_iter()
            .filter_map(|(_, node)| {
                let level = node.heading_level()?;
                Some((level, node.assigned_id().map(str::to_string)))
            })
            .collect()
    }
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            HtmlNode::Text(text) => Some(Node::text(&**text)),
            HtmlNode::Element(_) => ElementRef::wrap(child).map(convert_element),
            _ => None,
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>) -> Node {
    let name = element.value().name();
    let kind = match (heading_level(name), name) {
        (Some(level), _) => NodeKind::Heading { level },
        (None, "p") => NodeKind::Paragraph,
        _ => NodeKind::Element(name.to_string()),
    };
    let children = if markup::is_opaque_tag(name) {
        Vec::new()
    } else {
        convert_children(element)
    };
    let mut node = Node::with_kind(kind, children);
    node.id = element.value().attr("id").map(str::to_string);
    node
}

/// One atomic edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Replace a block's content with a single text run (empty text clears it).
    SetText { path: NodePath, text: String },
    InsertNode {
        parent: NodePath,
        index: usize,
        node: Node,
    },
    RemoveNode { path: NodePath },
    SetHeadingId { path: NodePath, id: String },
    SetHeadingLevel { path: NodePath, level: u8 },
}

/// An ordered batch of steps. A transaction with no steps only carries
/// non-document changes (selection moves, focus) and leaves the tree alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub steps: Vec<Step>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Replace the whole document content with `nodes`.
    pub fn replace_content(current: &Document, nodes: Vec<Node>) -> Self {
        let mut tr = Self::new();
        for i in (0..current.root().children.len()).rev() {
            tr.push(Step::RemoveNode {
                path: NodePath(vec![i]),
            });
        }
        for (index, node) in nodes.into_iter().enumerate() {
            tr.push(Step::InsertNode {
                parent: NodePath::root(),
                index,
                node,
            });
        }
        tr
    }
}

/// Hook run after every dispatched transaction.
pub trait Interceptor {
    fn name(&self) -> &str;

    /// Inspect the transactions not yet seen by this interceptor and the
    /// resulting document; return at most one patch to apply on top.
    fn append_transaction(
        &self,
        transactions: &[Transaction],
        doc: &Document,
    ) -> Option<Transaction>;
}

/// Owns the document and runs interceptors sequentially after each dispatch.
pub struct MutationPipeline {
    doc: Document,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl MutationPipeline {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            interceptors: Vec::new(),
        }
    }

    pub fn register(&mut self, interceptor: Box<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn into_doc(self) -> Document {
        self.doc
    }

    /// Apply `transaction`, then let interceptors append patches until a
    /// round produces none. Returns every transaction applied, the original
    /// first.
    pub fn dispatch(&mut self, transaction: Transaction) -> Vec<Transaction> {
        self.doc.apply(&transaction);
        let mut log = vec![transaction];
        let mut seen = vec![0usize; self.interceptors.len()];

        loop {
            let mut appended = false;
            for (i, interceptor) in self.interceptors.iter().enumerate() {
                if seen[i] >= log.len() {
                    continue;
                }
                let patch = interceptor.append_transaction(&log[seen[i]..], &self.doc);
                if let Some(patch) = patch {
                    tracing::debug!(
                        interceptor = interceptor.name(),
                        steps = patch.steps.len(),
                        "interceptor appended patch"
                    );
                    self.doc.apply(&patch);
                    log.push(patch);
                    appended = true;
                }
                seen[i] = log.len();
            }
            if !appended {
                break;
            }
        }
        log
    }

    /// Replace the document content as one transaction, the way an editor
    /// loads a saved post.
    pub fn load(&mut self, nodes: Vec<Node>) -> Vec<Transaction> {
        let tr = Transaction::replace_content(&self.doc, nodes);
        self.dispatch(tr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn sample() -> Document {
        Document::new(vec![
            Node::heading(1, "Title").with_id("h-1"),
            Node::paragraph("Body"),
            Node::element("blockquote", vec![Node::heading(2, "Nested")]),
        ])
    }

    #[test]
    fn node_lookup_by_path() {
        let doc = sample();
        assert_eq!(doc.node(&NodePath(vec![0])).unwrap().heading_level(), Some(1));
        assert_eq!(
            doc.node(&NodePath(vec![2, 0])).unwrap().text_content(),
            "Nested"
        );
        assert!(doc.node(&NodePath(vec![5])).is_none());
        assert!(doc.node(&NodePath::root()).is_some());
    }

    #[test]
    fn descendants_in_preorder() {
        let doc = sample();
        let paths: Vec<String> = doc
            .descendants()
            .iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["/0", "/0/0", "/1", "/1/0", "/2", "/2/0", "/2/0/0"]
        );
    }

    #[test]
    fn headings_only_include_identified_nonempty() {
        let doc = Document::new(vec![
            Node::heading(1, "A").with_id("h-1"),
            Node::heading(2, "B"),
            Node::heading(2, "  ").with_id("h-2"),
            Node::heading(3, "C").with_id(""),
        ]);
        assert_eq!(doc.headings(), vec![HeadingItem::new("h-1", 1, "A")]);
    }

    #[test]
    fn set_text_replaces_content() {
        let mut doc = sample();
        doc.apply_step(&Step::SetText {
            path: NodePath(vec![1]),
            text: "New body".into(),
        })
        .unwrap();
        assert_eq!(doc.node(&NodePath(vec![1])).unwrap().text_content(), "New body");
    }

    #[test]
    fn insert_and_remove_nodes() {
        let mut doc = sample();
        doc.apply_step(&Step::InsertNode {
            parent: NodePath::root(),
            index: 1,
            node: Node::heading(2, "Inserted"),
        })
        .unwrap();
        assert_eq!(doc.root().children.len(), 4);
        doc.apply_step(&Step::RemoveNode {
            path: NodePath(vec![0]),
        })
        .unwrap();
        assert_eq!(doc.root().children[0].text_content(), "Inserted");
    }

    #[test]
    fn unresolvable_steps_are_errors() {
        let mut doc = sample();
        assert_eq!(
            doc.apply_step(&Step::RemoveNode {
                path: NodePath(vec![9])
            }),
            Err(DocumentError::InvalidPath(NodePath(vec![9])))
        );
        assert_eq!(
            doc.apply_step(&Step::SetHeadingId {
                path: NodePath(vec![1]),
                id: "x".into()
            }),
            Err(DocumentError::NotAHeading(NodePath(vec![1])))
        );
        assert!(doc
            .apply_step(&Step::RemoveNode {
                path: NodePath::root()
            })
            .is_err());
        assert!(doc
            .apply_step(&Step::InsertNode {
                parent: NodePath(vec![0, 0]),
                index: 0,
                node: Node::text("x"),
            })
            .is_err());
    }

    #[test]
    fn apply_skips_bad_steps_and_keeps_good_ones() {
        let mut doc = sample();
        let tr = Transaction::new()
            .step(Step::RemoveNode {
                path: NodePath(vec![42]),
            })
            .step(Step::SetText {
                path: NodePath(vec![1]),
                text: "ok".into(),
            });
        assert_eq!(doc.apply(&tr), 1);
        assert_eq!(doc.root().children[1].text_content(), "ok");
    }

    #[test]
    fn from_html_keeps_ids_and_structure() {
        let html = r#"<h1 id="intro">Intro</h1><p class="lead">Hello &amp; <em>welcome</em></p><img src="a.png">"#;
        let doc = Document::from_html(html);
        assert_eq!(doc.root().children.len(), 3);
        assert_eq!(doc.root().children[0].assigned_id(), Some("intro"));
        assert_eq!(doc.root().children[1].kind, NodeKind::Paragraph);
        assert_eq!(doc.root().children[1].text_content(), "Hello & welcome");
        assert_eq!(doc.root().children[2].kind, NodeKind::Element("img".into()));
    }

    #[test]
    fn from_html_ignores_quoted_angle_brackets_and_script_text() {
        let doc = Document::from_html(
            r#"<h2 title="a>b">Real</h2><script>"<h2>fake</h2>"</script>"#,
        );
        assert_eq!(doc.heading_ids(), vec![(2, None)]);
        assert_eq!(doc.root().children[0].text_content(), "Real");
    }

    #[test]
    fn heading_ids_lists_every_heading_in_order() {
        assert_eq!(
            sample().heading_ids(),
            vec![(1, Some("h-1".to_string())), (2, None)]
        );
    }

    #[test]
    fn html_parse_recovers_from_unclosed_and_stray_tags() {
        let doc = Document::from_html("<h2>Open<p>para</span></p>");
        // h2 never closed: the paragraph nests inside it
        let h2 = &doc.root().children[0];
        assert_eq!(h2.heading_level(), Some(2));
        assert_eq!(h2.text_content(), "Openpara");
    }

    #[test]
    fn transaction_doc_changed() {
        assert!(!Transaction::new().doc_changed());
        assert!(Transaction::new()
            .step(Step::RemoveNode {
                path: NodePath(vec![0])
            })
            .doc_changed());
    }

    /// Counts its calls and, the first time it sees a paragraph without a
    /// trailing marker, appends one.
    struct MarkingInterceptor {
        calls: Cell<usize>,
    }

    impl Interceptor for MarkingInterceptor {
        fn name(&self) -> &str {
            "marking"
        }

        fn append_transaction(&self, trs: &[Transaction], doc: &Document) -> Option<Transaction> {
            self.calls.set(self.calls.get() + 1);
            if !trs.iter().any(Transaction::doc_changed) {
                return None;
            }
            let mut patch = Transaction::new();
            for (path, node) in doc.descendants() {
                if node.kind == NodeKind::Paragraph && !node.text_content().ends_with('!') {
                    patch.push(Step::SetText {
                        path,
                        text: format!("{}!", node.text_content()),
                    });
                }
            }
            patch.doc_changed().then_some(patch)
        }
    }

    struct Recorder {
        calls: Rc<Cell<usize>>,
    }

    impl Interceptor for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn append_transaction(&self, _: &[Transaction], _: &Document) -> Option<Transaction> {
            self.calls.set(self.calls.get() + 1);
            None
        }
    }

    #[test]
    fn selection_only_dispatch_runs_each_interceptor_once() {
        let calls = Rc::new(Cell::new(0));
        let mut pipeline = MutationPipeline::new(sample());
        pipeline.register(Box::new(Recorder {
            calls: Rc::clone(&calls),
        }));
        let log = pipeline.dispatch(Transaction::new());
        assert_eq!(log.len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn patch_is_offered_to_other_interceptors_and_loop_settles() {
        let calls = Rc::new(Cell::new(0));
        let mut pipeline = MutationPipeline::new(sample());
        pipeline.register(Box::new(MarkingInterceptor {
            calls: Cell::new(0),
        }));
        pipeline.register(Box::new(Recorder {
            calls: Rc::clone(&calls),
        }));

        let log = pipeline.dispatch(Transaction::new().step(Step::SetText {
            path: NodePath(vec![1]),
            text: "Edited".into(),
        }));

        // The edit, then the marker patch. Nobody appends in round two.
        assert_eq!(log.len(), 2);
        assert_eq!(pipeline.doc().root().children[1].text_content(), "Edited!");
        // One call that sees the edit and the patch together.
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn settled_document_gets_no_patch() {
        let mut pipeline = MutationPipeline::new(sample());
        pipeline.register(Box::new(MarkingInterceptor {
            calls: Cell::new(0),
        }));
        pipeline.register(Box::new(Recorder {
            calls: Rc::new(Cell::new(0)),
        }));
        pipeline.dispatch(Transaction::new().step(Step::SetText {
            path: NodePath(vec![1]),
            text: "Edited".into(),
        }));
        let again = pipeline.dispatch(Transaction::new().step(Step::SetText {
            path: NodePath(vec![1]),
            text: "Edited!".into(),
        }));
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn load_replaces_content() {
        let mut pipeline = MutationPipeline::new(sample());
        pipeline.load(vec![Node::paragraph("only")]);
        assert_eq!(pipeline.doc().root().children.len(), 1);
        assert_eq!(pipeline.doc().root().children[0].text_content(), "only");
    }
}
