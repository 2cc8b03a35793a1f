//! Element Registry - Index allocation and tree structure.
//!
//! Manages the lifecycle of element indices:
//! - Free index pool for O(1) reuse
//! - Generation keys so stale handles can detect a recycled index
//! - Ordered child lists (document order)
//! - Parent context stack for nested element creation
//! - Destroy callbacks
//!
//! Each thread owns one document. The `<body>` element is allocated lazily
//! on first use and is the root every connected element descends from.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use super::arrays;
use super::arrays::core;
use crate::state::{focus, keyboard, pointer};
use crate::widgets::modal;

use super::events;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Set of currently allocated indices (ordered for deterministic iteration).
    static ALLOCATED_INDICES: RefCell<BTreeSet<usize>> = const { RefCell::new(BTreeSet::new()) };

    /// Generation key per allocated index.
    static INDEX_TO_KEY: RefCell<HashMap<usize, u64>> = RefCell::new(HashMap::new());

    /// Ordered children per parent index.
    static CHILDREN: RefCell<HashMap<usize, Vec<usize>>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generation keys.
    static KEY_COUNTER: RefCell<u64> = const { RefCell::new(0) };

    /// Stack of parent indices for nested element creation.
    static PARENT_STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };

    /// The document body, once allocated.
    static BODY: RefCell<Option<usize>> = const { RefCell::new(None) };

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Element Handles
// =============================================================================

/// Weak handle to an element.
///
/// Indices are recycled after release, so a bare index captured earlier may
/// point at a different element later. The generation key detects that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    index: usize,
    key: u64,
}

impl ElementRef {
    /// Capture a handle to a currently allocated element.
    pub fn new(index: usize) -> Option<Self> {
        get_key(index).map(|key| Self { index, key })
    }

    /// The index this handle was captured with.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The index, if it still refers to the same element.
    pub fn resolve(&self) -> Option<usize> {
        (get_key(self.index) == Some(self.key)).then_some(self.index)
    }

    /// True if the element still exists and is attached under `<body>`.
    pub fn is_connected(&self) -> bool {
        self.resolve().is_some_and(is_connected)
    }
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get current parent index (None if at root).
pub fn get_current_parent_index() -> Option<usize> {
    PARENT_STACK.with(|stack| stack.borrow().last().copied())
}

/// Push a parent index onto the stack.
pub fn push_parent_context(index: usize) {
    PARENT_STACK.with(|stack| stack.borrow_mut().push(index));
}

/// Pop a parent index from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new, detached element.
pub fn allocate_index() -> usize {
    let index = FREE_INDICES.with(|free| free.borrow_mut().pop()).unwrap_or_else(|| {
        NEXT_INDEX.with(|next| {
            let mut next = next.borrow_mut();
            let index = *next;
            *next += 1;
            index
        })
    });

    let key = KEY_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        *counter += 1;
        *counter
    });

    INDEX_TO_KEY.with(|map| {
        map.borrow_mut().insert(index, key);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });

    arrays::ensure_all_capacity(index);

    index
}

/// Create an element with the given tag.
///
/// If a parent context is active the element is appended to it.
pub fn create_element(tag: &str) -> usize {
    let index = allocate_index();
    core::set_tag(index, tag);
    if let Some(parent) = get_current_parent_index() {
        append_child(parent, index);
    }
    index
}

/// The document body. Allocated on first use.
pub fn body() -> usize {
    if let Some(index) = BODY.with(|b| *b.borrow()) {
        if is_allocated(index) {
            return index;
        }
    }
    let index = allocate_index();
    core::set_tag(index, "body");
    BODY.with(|b| *b.borrow_mut() = Some(index));
    index
}

/// Release an index back to the pool.
///
/// Also recursively releases all children, detaches the element from its
/// parent, and drops every listener attached to it.
pub fn release_index(index: usize) {
    if !is_allocated(index) {
        return;
    }

    // FIRST: release children (collect first to avoid mutating while iterating)
    for child in children(index) {
        release_index(child);
    }

    run_destroy_callbacks(index);

    detach(index);

    keyboard::cleanup_index(index);
    pointer::cleanup_index(index);
    events::cleanup_index(index);
    focus::element_released(index);

    INDEX_TO_KEY.with(|map| {
        map.borrow_mut().remove(&index);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });
    CHILDREN.with(|map| {
        map.borrow_mut().remove(&index);
    });
    BODY.with(|b| {
        let mut b = b.borrow_mut();
        if *b == Some(index) {
            *b = None;
        }
    });

    arrays::clear_all_at_index(index);

    FREE_INDICES.with(|free| free.borrow_mut().push(index));
}

// =============================================================================
// Tree Structure
// =============================================================================

/// Append `child` as the last child of `parent`, moving it if attached elsewhere.
pub fn append_child(parent: usize, child: usize) {
    if parent == child || !is_allocated(parent) || !is_allocated(child) {
        return;
    }
    // Refuse cycles: parent may not live inside child
    let mut cursor = Some(parent);
    while let Some(node) = cursor {
        if node == child {
            return;
        }
        cursor = core::get_parent(node);
    }

    detach(child);
    core::set_parent(child, Some(parent));
    CHILDREN.with(|map| map.borrow_mut().entry(parent).or_default().push(child));
}

/// Detach an element from its parent, keeping it allocated.
pub fn detach(index: usize) {
    if let Some(parent) = core::get_parent(index) {
        CHILDREN.with(|map| {
            if let Some(list) = map.borrow_mut().get_mut(&parent) {
                list.retain(|&c| c != index);
            }
        });
        core::set_parent(index, None);
    }
}

/// Ordered children of an element.
pub fn children(index: usize) -> Vec<usize> {
    CHILDREN.with(|map| map.borrow().get(&index).cloned().unwrap_or_default())
}

/// True if the element is allocated and its ancestor chain reaches `<body>`.
pub fn is_connected(index: usize) -> bool {
    let Some(body) = BODY.with(|b| *b.borrow()) else {
        return false;
    };
    if !is_allocated(index) {
        return false;
    }
    let mut cursor = Some(index);
    while let Some(node) = cursor {
        if node == body {
            return true;
        }
        cursor = core::get_parent(node);
    }
    false
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the element at `index` is released.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Generation key for an allocated index.
pub fn get_key(index: usize) -> Option<u64> {
    INDEX_TO_KEY.with(|map| map.borrow().get(&index).copied())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated elements.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset the whole document (for testing).
///
/// Clears the tree, all element arrays, all listeners and the focus register.
pub fn reset_document() {
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    INDEX_TO_KEY.with(|map| map.borrow_mut().clear());
    CHILDREN.with(|map| map.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    KEY_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    BODY.with(|b| *b.borrow_mut() = None);
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
    arrays::reset_all_arrays();
    keyboard::reset_keyboard_state();
    pointer::reset_pointer_state();
    events::reset_custom_events();
    focus::reset_focus_state();
    modal::reset_open_modals();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_document();
    }

    #[test]
    fn test_allocate_index() {
        setup();

        let a = allocate_index();
        let b = allocate_index();
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert!(is_allocated(a));
        assert!(!is_allocated(2));
        assert_eq!(get_allocated_count(), 2);
    }

    #[test]
    fn test_release_and_reuse() {
        setup();

        let a = allocate_index();
        let b = allocate_index();

        release_index(a);
        assert!(!is_allocated(a));
        assert!(is_allocated(b));

        let c = allocate_index();
        assert_eq!(c, a);
    }

    #[test]
    fn test_element_ref_detects_recycling() {
        setup();

        let body = body();
        let a = create_element("button");
        append_child(body, a);
        let handle = ElementRef::new(a).unwrap();
        assert!(handle.is_connected());

        release_index(a);
        assert_eq!(handle.resolve(), None);

        // Same index, different element
        let b = create_element("div");
        assert_eq!(b, a);
        append_child(body, b);
        assert_eq!(handle.resolve(), None);
        assert!(!handle.is_connected());
    }

    #[test]
    fn test_tree_order_and_detach() {
        setup();

        let body = body();
        let a = create_element("div");
        let b = create_element("div");
        append_child(body, a);
        append_child(body, b);
        assert_eq!(children(body), vec![a, b]);

        // Re-appending moves to end
        append_child(body, a);
        assert_eq!(children(body), vec![b, a]);

        detach(a);
        assert_eq!(children(body), vec![b]);
        assert!(!is_connected(a));
        assert!(is_connected(b));
    }

    #[test]
    fn test_append_refuses_cycles() {
        setup();

        let a = create_element("div");
        let b = create_element("div");
        append_child(a, b);
        append_child(b, a);
        assert_eq!(core::get_parent(a), None);
        assert_eq!(children(b), Vec::<usize>::new());
    }

    #[test]
    fn test_release_is_recursive() {
        setup();

        let body = body();
        let parent = create_element("section");
        append_child(body, parent);
        push_parent_context(parent);
        let child = create_element("p");
        pop_parent_context();

        assert_eq!(children(parent), vec![child]);

        release_index(parent);
        assert!(!is_allocated(parent));
        assert!(!is_allocated(child));
        assert!(children(body).is_empty());
    }

    #[test]
    fn test_parent_context() {
        setup();

        assert_eq!(get_current_parent_index(), None);
        push_parent_context(5);
        assert_eq!(get_current_parent_index(), Some(5));
        push_parent_context(10);
        assert_eq!(get_current_parent_index(), Some(10));
        pop_parent_context();
        assert_eq!(get_current_parent_index(), Some(5));
        pop_parent_context();
        assert_eq!(get_current_parent_index(), None);
    }

    #[test]
    fn test_destroy_callback() {
        setup();

        let called = Rc::new(Cell::new(false));
        let called_clone = called.clone();

        let idx = allocate_index();
        on_destroy(idx, move || called_clone.set(true));

        assert!(!called.get());
        release_index(idx);
        assert!(called.get());
    }
}
