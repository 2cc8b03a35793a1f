//! Tree Queries - The small selector surface the controllers need.
//!
//! All traversals are in document order (pre-order, children in insertion
//! order). Class queries never match the root they start from; `closest`
//! does.

use super::arrays::{attributes, classes, core};
use super::registry::{self, children};

/// Parent element.
pub fn parent(index: usize) -> Option<usize> {
    core::get_parent(index)
}

/// Ancestors from the parent up to the root.
pub fn ancestors(index: usize) -> Vec<usize> {
    let mut result = Vec::new();
    let mut cursor = core::get_parent(index);
    while let Some(node) = cursor {
        result.push(node);
        cursor = core::get_parent(node);
    }
    result
}

/// All descendants of `root` in document order (excluding `root`).
pub fn descendants(root: usize) -> Vec<usize> {
    let mut result = Vec::new();
    let mut stack: Vec<usize> = children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        result.push(node);
        stack.extend(children(node).into_iter().rev());
    }
    result
}

/// `root.querySelectorAll('.class')`
pub fn query_all_by_class(root: usize, class: &str) -> Vec<usize> {
    descendants(root)
        .into_iter()
        .filter(|&node| classes::has_class(node, class))
        .collect()
}

/// `root.querySelector('.class')`
pub fn query_by_class(root: usize, class: &str) -> Option<usize> {
    descendants(root)
        .into_iter()
        .find(|&node| classes::has_class(node, class))
}

/// `element.closest('.class')` (includes the element itself).
pub fn closest_by_class(index: usize, class: &str) -> Option<usize> {
    if classes::has_class(index, class) {
        return Some(index);
    }
    ancestors(index)
        .into_iter()
        .find(|&node| classes::has_class(node, class))
}

/// `element.nextElementSibling`
pub fn next_element_sibling(index: usize) -> Option<usize> {
    let parent = core::get_parent(index)?;
    let siblings = children(parent);
    let position = siblings.iter().position(|&c| c == index)?;
    siblings.get(position + 1).copied()
}

/// `ancestor.contains(node)` (true when equal).
pub fn contains(ancestor: usize, node: usize) -> bool {
    node == ancestor || ancestors(node).contains(&ancestor)
}

/// `document.getElementById(id)` among connected elements.
pub fn get_element_by_id(id: &str) -> Option<usize> {
    let body = registry::body();
    std::iter::once(body)
        .chain(descendants(body))
        .find(|&node| attributes::get_attribute(node, "id").as_deref() == Some(id))
}

/// True if the element or any ancestor carries the `hidden` flag.
pub fn is_hidden_in_tree(index: usize) -> bool {
    core::is_hidden(index) || ancestors(index).into_iter().any(core::is_hidden)
}
