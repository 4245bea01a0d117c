//! Removal of whole subtrees rooted at disallowed tags.

use crate::markup::MarkupTree;

use super::TreePass;

/// Tags whose elements, together with their subtrees, never reach the output.
pub const REMOVABLE_TAGS: &[&str] = &[
    "script", "style", "svg", "iframe", "noscript", "link", "meta", "button", "input",
];

/// Pass that drops every descendant element whose tag is in the removable set.
///
/// Tag names are compared ASCII case-insensitively. A tree without matches is
/// left untouched. Removable elements nested inside a removed one are not
/// counted separately.
#[derive(Clone, Debug)]
pub struct TagStripper {
    tags: &'static [&'static str],
}

impl TagStripper {
    /// Strip the given tags instead of [`REMOVABLE_TAGS`].
    pub fn with_tags(tags: &'static [&'static str]) -> Self {
        Self { tags }
    }

    pub fn is_removable(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for TagStripper {
    fn default() -> Self {
        Self::with_tags(REMOVABLE_TAGS)
    }
}

impl TreePass for TagStripper {
    fn name(&self) -> &'static str {
        "tag-strip"
    }

    fn apply(&self, tree: &mut MarkupTree) -> usize {
        let mut removed = 0;
        let mut pending = vec![tree.root_id()];

        while let Some(id) = pending.pop() {
            let (doomed, kept): (Vec<_>, Vec<_>) =
                tree.child_element_ids(id).into_iter().partition(|&child| {
                    tree.get(child)
                        .and_then(|node| node.value().as_element())
                        .is_some_and(|element| self.is_removable(&element.tag))
                });

            for child in doomed {
                if let Some(mut node) = tree.get_mut(child) {
                    node.detach();
                    removed += 1;
                }
            }
            pending.extend(kept);
        }
        removed
    }
}
