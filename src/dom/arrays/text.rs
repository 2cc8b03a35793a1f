//! Document Model - Text Arrays
//!
//! `element.textContent` per element. Only leaf text is stored; the modal
//! writes its title and body through here.

use std::cell::RefCell;

thread_local! {
    /// Text content string.
    static TEXT_CONTENT: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    TEXT_CONTENT.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize(index + 1, String::new());
        }
    });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    TEXT_CONTENT.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            slot.clear();
        }
    });
}

/// Reset all arrays.
pub fn reset() {
    TEXT_CONTENT.with(|arr| arr.borrow_mut().clear());
}

/// Get text content at index.
pub fn get_text_content(index: usize) -> String {
    TEXT_CONTENT.with(|arr| arr.borrow().get(index).cloned().unwrap_or_default())
}

/// Set text content at index.
pub fn set_text_content(index: usize, content: &str) {
    TEXT_CONTENT.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            *slot = content.to_string();
        }
    });
}
