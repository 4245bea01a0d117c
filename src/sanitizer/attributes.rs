//! Attribute allowlisting.

use crate::markup::{MarkupNode, MarkupTree};

use super::TreePass;

/// Attributes that carry conversational meaning and survive sanitization.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["alt", "title", "aria-label", "datetime", "href", "src"];

/// Pass that removes every attribute not in the allowlist from every element,
/// the root included.
///
/// Kept attributes retain their name, value and relative order.
#[derive(Clone, Debug)]
pub struct AttributeAllowlistFilter {
    allowed: &'static [&'static str],
}

impl AttributeAllowlistFilter {
    /// Keep the given attributes instead of [`ALLOWED_ATTRIBUTES`].
    pub fn with_allowed(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl Default for AttributeAllowlistFilter {
    fn default() -> Self {
        Self::with_allowed(ALLOWED_ATTRIBUTES)
    }
}

impl TreePass for AttributeAllowlistFilter {
    fn name(&self) -> &'static str {
        "attribute-allowlist"
    }

    fn apply(&self, tree: &mut MarkupTree) -> usize {
        let elements: Vec<_> = tree
            .root()
            .descendants()
            .filter(|node| matches!(node.value(), MarkupNode::Element(_)))
            .map(|node| node.id())
            .collect();

        let mut removed = 0;
        for id in elements {
            let Some(mut node) = tree.get_mut(id) else {
                continue;
            };
            if let Some(element) = node.value().as_element_mut() {
                let before = element.attrs.len();
                element.attrs.retain(|(name, _)| self.is_allowed(name));
                removed += before - element.attrs.len();
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ElementNode;

    #[test]
    fn strips_styling_and_tracking_attributes() {
        let mut tree = MarkupTree::from_fragment(
            r#"<p class="message" id="msg1" style="color: red;" title="A title">Message</p>"#,
        );
        let removed = AttributeAllowlistFilter::default().apply(&mut tree);

        assert_eq!(removed, 3);
        assert_eq!(tree.inner_html(), r#"<p title="A title">Message</p>"#);
    }

    #[test]
    fn keeps_allowed_attributes_verbatim_and_in_order() {
        let mut tree = MarkupTree::new(
            ElementNode::new("img")
                .with_attr("src", "/a.png")
                .with_attr("onerror", "steal()")
                .with_attr("alt", "Alice"),
        );
        AttributeAllowlistFilter::default().apply(&mut tree);
        assert_eq!(
            tree.root_element().unwrap().attrs,
            vec![
                ("src".to_string(), "/a.png".to_string()),
                ("alt".to_string(), "Alice".to_string()),
            ]
        );
    }

    #[test]
    fn names_are_compared_case_insensitively() {
        let mut tree = MarkupTree::new(
            ElementNode::new("time")
                .with_attr("DateTime", "2024-01-15T10:00")
                .with_attr("ARIA-LABEL", "sent")
                .with_attr("Data-Id", "7"),
        );
        AttributeAllowlistFilter::default().apply(&mut tree);
        let attrs = &tree.root_element().unwrap().attrs;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].0, "DateTime");
    }

    #[test]
    fn root_attributes_are_filtered_too() {
        let mut tree =
            MarkupTree::new(ElementNode::new("div").with_attr("data-testid", "conversation"));
        AttributeAllowlistFilter::default().apply(&mut tree);
        assert!(tree.root_element().unwrap().attrs.is_empty());
    }

    #[test]
    fn elements_without_attributes_are_untouched() {
        let mut tree = MarkupTree::from_fragment("<ul><li>a</li></ul>");
        assert_eq!(AttributeAllowlistFilter::default().apply(&mut tree), 0);
    }

    #[test]
    fn deep_elements_are_filtered() {
        let depth = 20_000;
        let html = format!(
            "{}x{}",
            r#"<span class="c">"#.repeat(depth),
            "</span>".repeat(depth)
        );
        let mut tree = MarkupTree::from_fragment(&html);
        assert_eq!(AttributeAllowlistFilter::default().apply(&mut tree), depth);
        assert!(!tree.inner_html().contains("class"));
    }
}
