//! Document Model - Core Arrays
//!
//! The most fundamental element arrays:
//! - tag: Element tag name (lowercase)
//! - parent: Parent in hierarchy
//! - flags: Boolean attributes (hidden, disabled)

use std::cell::RefCell;

use crate::types::NodeFlags;

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Element tag name ("div", "button", ...). Empty for free slots.
    static TAG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };

    /// Parent element index (None for detached elements and the body).
    static PARENT: RefCell<Vec<Option<usize>>> = const { RefCell::new(Vec::new()) };

    /// Boolean attribute flags.
    static FLAGS: RefCell<Vec<NodeFlags>> = const { RefCell::new(Vec::new()) };
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    TAG.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize(index + 1, String::new());
        }
    });
    PARENT.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize(index + 1, None);
        }
    });
    FLAGS.with(|arr| {
        let mut arr = arr.borrow_mut();
        if arr.len() <= index {
            arr.resize(index + 1, NodeFlags::NONE);
        }
    });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    TAG.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            slot.clear();
        }
    });
    PARENT.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            *slot = None;
        }
    });
    FLAGS.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            *slot = NodeFlags::NONE;
        }
    });
}

/// Reset all arrays.
pub fn reset() {
    TAG.with(|arr| arr.borrow_mut().clear());
    PARENT.with(|arr| arr.borrow_mut().clear());
    FLAGS.with(|arr| arr.borrow_mut().clear());
}

// =============================================================================
// Tag
// =============================================================================

/// Get tag name at index (empty string if unallocated).
pub fn get_tag(index: usize) -> String {
    TAG.with(|arr| arr.borrow().get(index).cloned().unwrap_or_default())
}

/// Set tag name at index. Stored lowercase.
pub fn set_tag(index: usize, tag: &str) {
    TAG.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            *slot = tag.to_ascii_lowercase();
        }
    });
}

// =============================================================================
// Parent
// =============================================================================

/// Get parent index.
pub fn get_parent(index: usize) -> Option<usize> {
    PARENT.with(|arr| arr.borrow().get(index).copied().flatten())
}

/// Set parent index.
pub fn set_parent(index: usize, parent: Option<usize>) {
    PARENT.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            *slot = parent;
        }
    });
}

// =============================================================================
// Flags
// =============================================================================

/// Get all flags at index.
pub fn get_flags(index: usize) -> NodeFlags {
    FLAGS.with(|arr| arr.borrow().get(index).copied().unwrap_or_default())
}

/// Check a flag at index.
pub fn has_flag(index: usize, flag: NodeFlags) -> bool {
    get_flags(index).contains(flag)
}

/// Set or clear a flag at index.
pub fn set_flag(index: usize, flag: NodeFlags, on: bool) {
    FLAGS.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(index) {
            slot.set(flag, on);
        }
    });
}

/// `element.hidden`
pub fn is_hidden(index: usize) -> bool {
    has_flag(index, NodeFlags::HIDDEN)
}

/// `element.hidden = value`
pub fn set_hidden(index: usize, hidden: bool) {
    set_flag(index, NodeFlags::HIDDEN, hidden);
}

/// `element.disabled`
pub fn is_disabled(index: usize) -> bool {
    has_flag(index, NodeFlags::DISABLED)
}

/// `element.disabled = value`
pub fn set_disabled(index: usize, disabled: bool) {
    set_flag(index, NodeFlags::DISABLED, disabled);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset();
    }

    #[test]
    fn test_tag_lowercased() {
        setup();
        ensure_capacity(0);
        set_tag(0, "BUTTON");
        assert_eq!(get_tag(0), "button");
    }

    #[test]
    fn test_flags() {
        setup();
        ensure_capacity(2);

        assert!(!is_hidden(2));
        set_hidden(2, true);
        set_disabled(2, true);
        assert!(is_hidden(2));
        assert!(is_disabled(2));

        set_hidden(2, false);
        assert!(!is_hidden(2));
        assert_eq!(get_flags(2), NodeFlags::DISABLED);

        clear_at_index(2);
        assert_eq!(get_flags(2), NodeFlags::NONE);
    }

    #[test]
    fn test_out_of_range_is_default() {
        setup();
        set_hidden(42, true);
        assert!(!is_hidden(42));
        assert_eq!(get_parent(42), None);
        assert_eq!(get_tag(42), "");
    }
}
