//! Document Model - Class List Arrays
//!
//! `element.classList` per element. Modifier classes (`--active`, `--open`,
//! `--expanded`) are the styling hook the controllers toggle.

use std::cell::RefCell;

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Ordered class list per element (no duplicates).
    static CLASSES: RefCell<Vec<Vec<String>>> = const { RefCell::new(Vec::new()) };
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    CLASSES.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize_with(index + 1, Vec::new);
        }
    });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    CLASSES.with(|arr| {
        if let Some(list) = arr.borrow_mut().get_mut(index) {
            list.clear();
        }
    });
}

/// Reset all arrays.
pub fn reset() {
    CLASSES.with(|arr| arr.borrow_mut().clear());
}

// =============================================================================
// Class List
// =============================================================================

/// `element.classList.contains(class)`
pub fn has_class(index: usize, class: &str) -> bool {
    CLASSES.with(|arr| {
        arr.borrow()
            .get(index)
            .is_some_and(|list| list.iter().any(|c| c == class))
    })
}

/// `element.classList.add(class)`
pub fn add_class(index: usize, class: &str) {
    CLASSES.with(|arr| {
        if let Some(list) = arr.borrow_mut().get_mut(index) {
            if !list.iter().any(|c| c == class) {
                list.push(class.to_string());
            }
        }
    });
}

/// `element.classList.remove(class)`
pub fn remove_class(index: usize, class: &str) {
    CLASSES.with(|arr| {
        if let Some(list) = arr.borrow_mut().get_mut(index) {
            list.retain(|c| c != class);
        }
    });
}

/// `element.classList.toggle(class, force)`
pub fn toggle_class(index: usize, class: &str, force: bool) {
    if force {
        add_class(index, class);
    } else {
        remove_class(index, class);
    }
}

/// Snapshot of the class list.
pub fn class_list(index: usize) -> Vec<String> {
    CLASSES.with(|arr| arr.borrow().get(index).cloned().unwrap_or_default())
}
