//! Owned markup tree that the sanitizer passes rewrite.
//!
//! A [`MarkupTree`] is always a private deep copy of the caller's DOM
//! subtree, so the passes are free to mutate it in place. Only elements and
//! text survive the copy; comments, doctypes and processing instructions are
//! dropped.
//!
//! Nodes live in an `ego_tree` arena and every walk over them uses an
//! explicit stack, so nesting depth is bounded by memory rather than by the
//! call stack. Dropping or cloning a tree is flat as well.

use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use scraper::{ElementRef, Html, node::Node};

/// HTML5 void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A node of the owned markup tree: an element or a run of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupNode {
    Element(ElementNode),
    /// Decoded text content, escaped again on serialization.
    Text(String),
}

impl MarkupNode {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns `true` for text nodes that hold nothing but whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Returns `true` for text nodes with non-whitespace content.
    pub fn is_meaningful_text(&self) -> bool {
        matches!(self, Self::Text(_)) && !self.is_blank_text()
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }
}

impl From<ElementNode> for MarkupNode {
    fn from(element: ElementNode) -> Self {
        Self::Element(element)
    }
}

/// An element's tag and attributes (in source order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementNode {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// ASCII case-insensitive tag comparison.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.iter().any(|void| self.has_tag(void))
    }

    fn copy_of(element: &scraper::node::Element) -> Self {
        Self {
            tag: element.name().to_string(),
            attrs: element
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    fn write_start_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            push_escaped(out, &html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');
    }
}

/// Owned tree of markup nodes whose root is always an element.
///
/// # Example
///
/// ```
/// use dm_assist::{ElementNode, MarkupTree};
///
/// let mut tree = MarkupTree::new(ElementNode::new("div"));
/// let root = tree.root_id();
/// let p = tree.append_element(root, ElementNode::new("p")).unwrap();
/// tree.append_text(p, "1 < 2");
/// assert_eq!(tree.inner_html(), "<p>1 &lt; 2</p>");
/// ```
#[derive(Clone, Debug)]
pub struct MarkupTree {
    tree: Tree<MarkupNode>,
}

impl MarkupTree {
    /// Create a tree holding only `root`.
    pub fn new(root: ElementNode) -> Self {
        Self {
            tree: Tree::new(MarkupNode::Element(root)),
        }
    }

    /// Deep-copy a parsed DOM element into an owned tree.
    ///
    /// The source document is only read; nothing in the returned tree aliases it.
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let mut copy = Self::new(ElementNode::copy_of(element.value()));
        let mut pending = vec![(*element, copy.root_id())];

        while let Some((source, target)) = pending.pop() {
            for child in source.children() {
                let node = match child.value() {
                    Node::Element(element) => MarkupNode::Element(ElementNode::copy_of(element)),
                    Node::Text(text) => MarkupNode::Text(String::from(&*text.text)),
                    _ => continue,
                };
                let Some(id) = copy.append(target, node) else {
                    continue;
                };
                if child.has_children() {
                    pending.push((child, id));
                }
            }
        }
        copy
    }

    /// Parse an HTML fragment and copy it; the root is the parser's `<html>`
    /// context element.
    pub fn from_fragment(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        Self::from_element(fragment.root_element())
    }

    pub fn root(&self) -> NodeRef<'_, MarkupNode> {
        self.tree.root()
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    /// The root element, `None` only if the root was overwritten with text.
    pub fn root_element(&self) -> Option<&ElementNode> {
        self.tree.root().value().as_element()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, MarkupNode>> {
        self.tree.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<NodeMut<'_, MarkupNode>> {
        self.tree.get_mut(id)
    }

    /// Append `node` as the last child of `parent`, returning the new id.
    pub fn append(&mut self, parent: NodeId, node: MarkupNode) -> Option<NodeId> {
        let mut parent = self.tree.get_mut(parent)?;
        Some(parent.append(node).id())
    }

    pub fn append_element(&mut self, parent: NodeId, element: ElementNode) -> Option<NodeId> {
        self.append(parent, MarkupNode::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Option<NodeId> {
        self.append(parent, MarkupNode::text(text))
    }

    /// Ids of the direct element children of `id`, in document order.
    pub fn child_element_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|node| {
                node.children()
                    .filter(|child| child.value().as_element().is_some())
                    .map(|child| child.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Serialize the children of the root, like the DOM's `innerHTML`.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        write_html(self.tree.root().children(), &mut out);
        out
    }

    /// Serialize the root including its own tags, like `outerHTML`.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_html(std::iter::once(self.tree.root()), &mut out);
        out
    }
}

enum Step<'a> {
    Open(NodeRef<'a, MarkupNode>),
    Close(&'a str),
}

/// Serialize `nodes` and their subtrees in document order.
fn write_html<'a, I>(nodes: I, out: &mut String)
where
    I: DoubleEndedIterator<Item = NodeRef<'a, MarkupNode>>,
{
    let mut stack: Vec<Step<'a>> = nodes.rev().map(Step::Open).collect();

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Open(node) => node,
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
        };
        match node.value() {
            MarkupNode::Text(text) => push_escaped(out, &html_escape::encode_text(text)),
            MarkupNode::Element(element) => {
                element.write_start_tag(out);
                if element.is_void() {
                    continue;
                }
                stack.push(Step::Close(&element.tag));
                stack.extend(node.children().rev().map(Step::Open));
            }
        }
    }
}

/// Push already-escaped text, spelling U+00A0 as `&nbsp;` like `innerHTML`.
fn push_escaped(out: &mut String, escaped: &str) {
    for (i, part) in escaped.split('\u{a0}').enumerate() {
        if i > 0 {
            out.push_str("&nbsp;");
        }
        out.push_str(part);
    }
}
