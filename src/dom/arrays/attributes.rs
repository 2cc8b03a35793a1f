//! Document Model - Attribute Arrays
//!
//! String-valued element state:
//! - attributes: `id`, `role`, `aria-*`, `data-*`, `tabindex`, `href`, ...
//! - style: Inline style properties (`overflow`, `will-change`, ...)
//!
//! Boolean attributes (`hidden`, `disabled`) live in the core flags instead.

use std::cell::RefCell;
use std::collections::BTreeMap;

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Attribute map per element.
    static ATTRIBUTES: RefCell<Vec<BTreeMap<String, String>>> = const { RefCell::new(Vec::new()) };

    /// Inline style map per element.
    static STYLE: RefCell<Vec<BTreeMap<String, String>>> = const { RefCell::new(Vec::new()) };
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    ATTRIBUTES.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize_with(index + 1, BTreeMap::new);
        }
    });
    STYLE.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize_with(index + 1, BTreeMap::new);
        }
    });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    ATTRIBUTES.with(|arr| {
        if let Some(map) = arr.borrow_mut().get_mut(index) {
            map.clear();
        }
    });
    STYLE.with(|arr| {
        if let Some(map) = arr.borrow_mut().get_mut(index) {
            map.clear();
        }
    });
}

/// Reset all arrays.
pub fn reset() {
    ATTRIBUTES.with(|arr| arr.borrow_mut().clear());
    STYLE.with(|arr| arr.borrow_mut().clear());
}

// =============================================================================
// Attributes
// =============================================================================

/// `element.getAttribute(name)`
pub fn get_attribute(index: usize, name: &str) -> Option<String> {
    ATTRIBUTES.with(|arr| arr.borrow().get(index).and_then(|map| map.get(name).cloned()))
}

/// `element.hasAttribute(name)`
pub fn has_attribute(index: usize, name: &str) -> bool {
    ATTRIBUTES.with(|arr| {
        arr.borrow()
            .get(index)
            .is_some_and(|map| map.contains_key(name))
    })
}

/// `element.setAttribute(name, value)`
pub fn set_attribute(index: usize, name: &str, value: &str) {
    ATTRIBUTES.with(|arr| {
        if let Some(map) = arr.borrow_mut().get_mut(index) {
            map.insert(name.to_string(), value.to_string());
        }
    });
}

/// Set an attribute only when the element does not carry it yet.
///
/// Returns true if the attribute was written.
pub fn set_attribute_if_absent(index: usize, name: &str, value: &str) -> bool {
    if has_attribute(index, name) {
        return false;
    }
    set_attribute(index, name, value);
    has_attribute(index, name)
}

/// `element.removeAttribute(name)`
pub fn remove_attribute(index: usize, name: &str) {
    ATTRIBUTES.with(|arr| {
        if let Some(map) = arr.borrow_mut().get_mut(index) {
            map.remove(name);
        }
    });
}

/// `element.dataset[key]` (reads the `data-{key}` attribute).
pub fn get_data(index: usize, key: &str) -> Option<String> {
    get_attribute(index, &format!("data-{key}"))
}

/// Parsed `tabindex` attribute, if present and numeric.
pub fn get_tab_index(index: usize) -> Option<i32> {
    get_attribute(index, "tabindex").and_then(|v| v.trim().parse().ok())
}

// =============================================================================
// Inline Style
// =============================================================================

/// `element.style[property]`
pub fn get_style(index: usize, property: &str) -> Option<String> {
    STYLE.with(|arr| arr.borrow().get(index).and_then(|map| map.get(property).cloned()))
}

/// `element.style[property] = value`
pub fn set_style(index: usize, property: &str, value: &str) {
    STYLE.with(|arr| {
        if let Some(map) = arr.borrow_mut().get_mut(index) {
            map.insert(property.to_string(), value.to_string());
        }
    });
}

/// `element.style[property] = ''`
pub fn remove_style(index: usize, property: &str) {
    STYLE.with(|arr| {
        if let Some(map) = arr.borrow_mut().get_mut(index) {
            map.remove(property);
        }
    });
}
