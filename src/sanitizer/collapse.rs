//! Collapsing of redundant wrapper `div`s.
//!
//! Frameworks wrap content in layers of `div`s that add nesting but no
//! information. A wrapper is redundant when its only element child is another
//! `div` and none of its own text children carry non-whitespace content; it
//! is replaced in its parent by that child.
//!
//! Descendants are visited in document order. After a replacement the
//! promoted child is examined next at the same position, so a chain of
//! wrappers usually flattens within a single scan. The root itself is never
//! replaced.

use ego_tree::NodeId;

use crate::markup::{MarkupNode, MarkupTree};

use super::TreePass;

/// Upper bound on full-tree scans.
pub const MAX_COLLAPSE_PASSES: usize = 5;

const WRAPPER_TAG: &str = "div";

/// Pass that replaces redundant wrapper `div`s with their single `div` child.
#[derive(Clone, Debug)]
pub struct StructuralCollapser {
    max_passes: usize,
}

impl StructuralCollapser {
    /// Bound the number of full-tree scans. Zero disables collapsing.
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self { max_passes }
    }
}

impl Default for StructuralCollapser {
    fn default() -> Self {
        Self::with_max_passes(MAX_COLLAPSE_PASSES)
    }
}

impl TreePass for StructuralCollapser {
    fn name(&self) -> &'static str {
        "structural-collapse"
    }

    fn apply(&self, tree: &mut MarkupTree) -> usize {
        let mut total = 0;
        for pass in 0..self.max_passes {
            let collapsed = collapse_descendants(tree);
            if collapsed == 0 {
                tracing::trace!("Collapse reached a fixpoint after {pass} scans");
                break;
            }
            total += collapsed;
        }
        total
    }
}

/// One document-order scan over the descendants of the root.
fn collapse_descendants(tree: &mut MarkupTree) -> usize {
    let mut collapsed = 0;
    let mut pending: Vec<NodeId> = tree.child_element_ids(tree.root_id());
    pending.reverse();

    while let Some(mut id) = pending.pop() {
        while let Some(inner) = sole_wrapped_div(tree, id) {
            let Some(mut wrapper) = tree.get_mut(id) else {
                break;
            };
            // Blank text left in the wrapper is detached along with it.
            wrapper.insert_id_before(inner);
            wrapper.detach();
            id = inner;
            collapsed += 1;
        }

        let mut children = tree.child_element_ids(id);
        children.reverse();
        pending.extend(children);
    }
    collapsed
}

/// The single `div` child of a redundant wrapper, or `None` if `id` is not one.
fn sole_wrapped_div(tree: &MarkupTree, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id)?;
    if node.parent().is_none() || !node.value().as_element()?.has_tag(WRAPPER_TAG) {
        return None;
    }

    let mut only = None;
    for child in node.children() {
        match child.value() {
            MarkupNode::Text(_) if child.value().is_meaningful_text() => return None,
            MarkupNode::Text(_) => {}
            MarkupNode::Element(inner) => {
                if only.is_some() || !inner.has_tag(WRAPPER_TAG) {
                    return None;
                }
                only = Some(child.id());
            }
        }
    }
    only
}
