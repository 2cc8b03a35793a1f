//! Focus System - Active element and keyboard navigation
//!
//! Manages focus state and navigation:
//! - `active_element` signal (`document.activeElement`)
//! - Focusable / tabbable queries
//! - Native Tab order (what the host does when no handler prevents Tab)
//! - Focus trapping for modals
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::focus;
//!
//! // Programmatic focus
//! focus::focus(close_button);
//!
//! // Confine Tab navigation to a dialog
//! focus::push_focus_trap(dialog);
//! focus::focus_next();
//! focus::pop_focus_trap();
//! ```

use std::cell::RefCell;

use spark_signals::{signal, Signal};

use crate::dom::arrays::{attributes, core};
use crate::dom::query::{descendants, is_hidden_in_tree};
use crate::dom::{body, is_connected};

// =============================================================================
// ACTIVE ELEMENT SIGNAL
// =============================================================================

thread_local! {
    static ACTIVE_ELEMENT: Signal<Option<usize>> = signal(None);
}

/// `document.activeElement` (None means the body).
pub fn active_element() -> Option<usize> {
    ACTIVE_ELEMENT.with(|s| s.get())
}

/// Check if any element is focused
pub fn has_focus() -> bool {
    active_element().is_some()
}

/// Check if specific element is focused
pub fn is_focused(index: usize) -> bool {
    active_element() == Some(index)
}

fn set_active(index: Option<usize>) {
    if active_element() != index {
        ACTIVE_ELEMENT.with(|s| s.set(index));
    }
}

// =============================================================================
// FOCUSABLE QUERIES
// =============================================================================

/// Tags that take focus without a `tabindex`.
fn is_natively_focusable(index: usize) -> bool {
    match core::get_tag(index).as_str() {
        "button" | "input" | "select" | "textarea" => true,
        "a" => attributes::has_attribute(index, "href"),
        _ => false,
    }
}

/// Can `element.focus()` move focus here?
///
/// Connected, rendered, enabled, and either natively focusable or carrying a
/// `tabindex` (any value, including `-1`).
pub fn can_focus(index: usize) -> bool {
    is_connected(index)
        && !is_hidden_in_tree(index)
        && !core::is_disabled(index)
        && (is_natively_focusable(index) || attributes::get_tab_index(index).is_some())
}

/// Is the element in the Tab sequence? (`tabindex="-1"` is focusable, not tabbable.)
pub fn is_tabbable(index: usize) -> bool {
    can_focus(index) && attributes::get_tab_index(index).is_none_or(|t| t >= 0)
}

/// Tabbable descendants of `root`, in Tab order.
///
/// Positive `tabindex` values come first (ascending), then everything else
/// in document order.
pub fn tabbable_within(root: usize) -> Vec<usize> {
    let mut result: Vec<(usize, usize)> = descendants(root)
        .into_iter()
        .filter(|&i| is_tabbable(i))
        .enumerate()
        .collect();

    result.sort_by_key(|&(position, i)| {
        match attributes::get_tab_index(i) {
            Some(t) if t > 0 => (0, t, position),
            _ => (1, 0, position),
        }
    });

    result.into_iter().map(|(_, i)| i).collect()
}

// =============================================================================
// FOCUS TRAP (for modals/dialogs)
// =============================================================================

thread_local! {
    static FOCUS_TRAP_STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Push a focus trap - native Tab order is confined to this element's subtree
pub fn push_focus_trap(container_index: usize) {
    FOCUS_TRAP_STACK.with(|stack| stack.borrow_mut().push(container_index));
}

/// Pop the current focus trap
pub fn pop_focus_trap() -> Option<usize> {
    FOCUS_TRAP_STACK.with(|stack| stack.borrow_mut().pop())
}

/// Remove a specific trap wherever it sits in the stack
pub fn remove_focus_trap(container_index: usize) -> bool {
    FOCUS_TRAP_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        match stack.iter().rposition(|&c| c == container_index) {
            Some(position) => {
                stack.remove(position);
                true
            }
            None => false,
        }
    })
}

/// Check if focus is currently trapped
pub fn is_focus_trapped() -> bool {
    FOCUS_TRAP_STACK.with(|stack| !stack.borrow().is_empty())
}

/// Get the current focus trap container
pub fn get_focus_trap_container() -> Option<usize> {
    FOCUS_TRAP_STACK.with(|stack| stack.borrow().last().copied())
}

// =============================================================================
// FOCUS NAVIGATION
// =============================================================================

/// Find next tabbable element within the active scope.
fn find_next_tabbable(from: Option<usize>, direction: isize) -> Option<usize> {
    let scope = get_focus_trap_container().unwrap_or_else(body);
    let tabbables = tabbable_within(scope);

    if tabbables.is_empty() {
        return None;
    }

    let current_pos = from.and_then(|index| tabbables.iter().position(|&i| i == index));

    match current_pos {
        None => {
            if direction > 0 {
                tabbables.first().copied()
            } else {
                tabbables.last().copied()
            }
        }
        Some(pos) => {
            let len = tabbables.len() as isize;
            let next_pos = ((pos as isize + direction) % len + len) % len;
            tabbables.get(next_pos as usize).copied()
        }
    }
}

/// Move focus to the next tabbable element (native Tab).
pub fn focus_next() -> bool {
    let current = active_element();
    match find_next_tabbable(current, 1) {
        Some(next) if Some(next) != current => {
            set_active(Some(next));
            true
        }
        _ => false,
    }
}

/// Move focus to the previous tabbable element (native Shift+Tab).
pub fn focus_previous() -> bool {
    let current = active_element();
    match find_next_tabbable(current, -1) {
        Some(prev) if Some(prev) != current => {
            set_active(Some(prev));
            true
        }
        _ => false,
    }
}

/// `element.focus()`. Returns false (and leaves focus alone) if the element
/// cannot take focus.
pub fn focus(index: usize) -> bool {
    if can_focus(index) {
        set_active(Some(index));
        return true;
    }
    false
}

/// Clear focus (focus returns to the body)
pub fn blur() {
    set_active(None);
}

/// Called by the registry when an element is released.
pub(crate) fn element_released(index: usize) {
    if active_element() == Some(index) {
        set_active(None);
    }
    FOCUS_TRAP_STACK.with(|stack| stack.borrow_mut().retain(|&c| c != index));
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    set_active(None);
    FOCUS_TRAP_STACK.with(|stack| stack.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
