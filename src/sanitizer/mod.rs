//! HTML sanitization pipeline that turns an untrusted DOM subtree into
//! compact, safe markup for prompting.
//!
//! The [`Sanitizer`] deep-copies its input and runs, in this fixed order:
//!
//! - [`TagStripper`] -- drops scripts, styles, embedded and interactive elements.
//! - [`AttributeAllowlistFilter`] -- keeps only a handful of meaningful attributes.
//! - [`StructuralCollapser`] -- flattens redundant wrapper `div`s.
//! - [`WhitespaceNormalizer`] -- minifies the serialized result.
//!
//! The caller's tree is never modified and sanitization never fails: odd
//! input degrades to odd (possibly empty) output. Every pass walks the tree
//! with an explicit stack, so arbitrarily deep input is handled in full.

mod attributes;
mod collapse;
mod strip;
mod whitespace;

use std::fmt;

use scraper::ElementRef;

use crate::markup::MarkupTree;

pub use attributes::{ALLOWED_ATTRIBUTES, AttributeAllowlistFilter};
pub use collapse::{MAX_COLLAPSE_PASSES, StructuralCollapser};
pub use strip::{REMOVABLE_TAGS, TagStripper};
pub use whitespace::WhitespaceNormalizer;

/// A rewrite applied in place to the private copy of the tree.
///
/// Implementations must be `Send + Sync` so one [`Sanitizer`] can be shared
/// between threads.
pub trait TreePass: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Rewrite `tree` in place, returning how many rewrites were made.
    fn apply(&self, tree: &mut MarkupTree) -> usize;
}

/// Sanitized, minified markup ready to be embedded in a prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CleanedMarkup(String);

impl CleanedMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CleanedMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CleanedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed four-pass sanitization pipeline.
///
/// # Example
///
/// ```
/// use dm_assist::Sanitizer;
///
/// let sanitizer = Sanitizer::new();
/// let cleaned = sanitizer.clean_fragment(
///     r#"<div class="msg">Hello<script>alert(1)</script> World</div>"#,
/// );
/// assert_eq!(cleaned.as_str(), "<div>Hello World</div>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Sanitizer {
    stripper: TagStripper,
    attributes: AttributeAllowlistFilter,
    collapser: StructuralCollapser,
    whitespace: WhitespaceNormalizer,
}

impl Sanitizer {
    /// Create a sanitizer with the standard tag and attribute sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tag-stripping pass.
    pub fn with_stripper(mut self, stripper: TagStripper) -> Self {
        self.stripper = stripper;
        self
    }

    /// Replace the attribute allowlist pass.
    pub fn with_attribute_filter(mut self, filter: AttributeAllowlistFilter) -> Self {
        self.attributes = filter;
        self
    }

    /// Replace the structural collapsing pass.
    pub fn with_collapser(mut self, collapser: StructuralCollapser) -> Self {
        self.collapser = collapser;
        self
    }

    /// Sanitize the contents of a parsed DOM element.
    ///
    /// The element itself is not serialized, only its children (like
    /// `innerHTML`). The document `root` belongs to is left untouched.
    pub fn sanitize(&self, root: ElementRef<'_>) -> CleanedMarkup {
        self.sanitize_owned(MarkupTree::from_element(root))
    }

    /// Sanitize the contents of an owned tree, leaving `tree` as it was.
    pub fn sanitize_tree(&self, tree: &MarkupTree) -> CleanedMarkup {
        self.sanitize_owned(tree.clone())
    }

    /// Parse an HTML fragment and sanitize everything in it.
    pub fn clean_fragment(&self, html: &str) -> CleanedMarkup {
        self.sanitize_owned(MarkupTree::from_fragment(html))
    }

    fn sanitize_owned(&self, mut tree: MarkupTree) -> CleanedMarkup {
        let Some(root) = tree.root_element() else {
            return CleanedMarkup::default();
        };
        if self.stripper.is_removable(&root.tag) {
            tracing::debug!("Root element <{}> is removable, nothing to keep", root.tag);
            return CleanedMarkup::default();
        }

        let passes: [&dyn TreePass; 3] = [&self.stripper, &self.attributes, &self.collapser];
        for pass in passes {
            let rewrites = pass.apply(&mut tree);
            tracing::debug!("Pass {} made {rewrites} rewrites", pass.name());
        }

        let serialized = tree.inner_html();
        let cleaned = self.whitespace.normalize(&serialized);
        tracing::debug!(
            "Sanitized markup from {} to {} bytes",
            serialized.len(),
            cleaned.len()
        );
        CleanedMarkup(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ElementNode;

    #[test]
    fn full_pipeline_on_chat_markup() {
        let html = r#"
            <div class="chat" id="main">
                <script>console.log('test')</script>
                <div class="message" style="padding: 10px;">
                    <p>Hi there!   How are you?</p>
                    <button>Click me</button>
                </div>
            </div>
        "#;
        let cleaned = Sanitizer::new().clean_fragment(html);
        assert_eq!(cleaned.as_str(), "<div><p>Hi there!   How are you?</p></div>");
    }

    #[test]
    fn removable_root_yields_nothing() {
        let mut tree = MarkupTree::new(ElementNode::new("svg"));
        let title = tree.append_element(tree.root_id(), ElementNode::new("title")).unwrap();
        tree.append_text(title, "x");
        assert!(Sanitizer::new().sanitize_tree(&tree).is_empty());
    }

    #[test]
    fn sanitize_tree_does_not_touch_input() {
        let mut tree = MarkupTree::new(ElementNode::new("div").with_attr("class", "wrap"));
        let outer = tree.append_element(tree.root_id(), ElementNode::new("div")).unwrap();
        let inner = tree.append_element(outer, ElementNode::new("div")).unwrap();
        tree.append_text(inner, "x");
        let style = tree.append_element(tree.root_id(), ElementNode::new("style")).unwrap();
        tree.append_text(style, "p{}");
        let before = tree.outer_html();

        let cleaned = Sanitizer::new().sanitize_tree(&tree);
        assert_eq!(cleaned.as_str(), "<div>x</div>");
        assert_eq!(tree.outer_html(), before);
    }

    #[test]
    fn deeply_nested_wrappers_are_cleaned() {
        let mut tree = MarkupTree::new(ElementNode::new("main"));
        let mut parent = tree.root_id();
        for _ in 0..20_000 {
            let wrapper = ElementNode::new("div").with_attr("class", "w");
            parent = tree.append_element(parent, wrapper).unwrap();
        }
        let p = tree.append_element(parent, ElementNode::new("p")).unwrap();
        tree.append_text(p, "deep");

        let cleaned = Sanitizer::new().sanitize_tree(&tree);
        assert_eq!(cleaned.as_str(), "<div><p>deep</p></div>");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(Sanitizer::new().clean_fragment("").is_empty());
        assert!(Sanitizer::new().clean_fragment("   \n  ").is_empty());
        assert!(
            Sanitizer::new()
                .clean_fragment("<script>only()</script>")
                .is_empty()
        );
    }

    #[test]
    fn passes_can_be_swapped() {
        let sanitizer = Sanitizer::new().with_collapser(StructuralCollapser::with_max_passes(0));
        let cleaned = sanitizer.clean_fragment("<div><div><p>Hi</p></div></div>");
        assert_eq!(cleaned.as_str(), "<div><div><p>Hi</p></div></div>");
    }

    #[test]
    fn display_matches_inner_string() {
        let cleaned = Sanitizer::new().clean_fragment("<p>a</p>");
        assert_eq!(cleaned.to_string(), "<p>a</p>");
        assert_eq!(cleaned.into_string(), "<p>a</p>");
    }
}
