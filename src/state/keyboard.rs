//! Keyboard Module - Keyboard event types, handler registry, dispatch
//!
//! Two kinds of listeners:
//! - element listeners (`on_element`), reached while the event bubbles from
//!   its target (the active element) up through the ancestors
//! - document listeners (`on`), reached after bubbling
//!
//! A handler returns true to consume the event (prevent default and stop
//! propagation). Unconsumed keys run the native default action: `Tab` moves
//! focus through the tab order, and `Enter`/`Space` on a button (`Enter` on a
//! link) clicks it.
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::keyboard;
//!
//! // Listen on a header element
//! let cleanup = keyboard::on_element(header, |event| {
//!     if event.key == "Enter" {
//!         println!("activate");
//!         return true;
//!     }
//!     false
//! });
//!
//! // Document-level listener
//! let cleanup = keyboard::on(|event| event.key == "Escape");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::focus;
use super::pointer::{self, PointerEvent};
use crate::dom::arrays::{attributes, core};
use crate::dom::query::ancestors;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key value, DOM style ("a", " ", "Enter", "ArrowUp", "Escape", "Tab")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
    /// Explicit target. When None, dispatch targets the active element.
    pub target: Option<usize>,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
            target: None,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::new(key)
        }
    }

    /// Direct the event at a specific element instead of the active one
    pub fn at(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// `Shift+Tab`
    pub fn is_shift_tab(&self) -> bool {
        self.key == "Tab" && self.modifiers.shift
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    element_handlers: HashMap<usize, Vec<(usize, KeyHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            global_handlers: Vec::new(),
            element_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event.
///
/// Order: element handlers from the target up through its ancestors, then
/// document handlers. Handlers are snapshotted before any runs, so a handler
/// may register or remove listeners (a dialog removing its own Escape
/// listener) safely.
///
/// Returns true if a handler consumed the event.
pub fn dispatch(event: KeyboardEvent) -> bool {
    // Only dispatch press events to handlers
    if event.state != KeyState::Press {
        return false;
    }

    let target = event.target.or_else(focus::active_element);
    let mut event = event;
    event.target = target;

    let handlers: Vec<KeyHandler> = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        let path: Vec<usize> = match target {
            Some(target) => std::iter::once(target).chain(ancestors(target)).collect(),
            None => Vec::new(),
        };

        let mut handlers: Vec<KeyHandler> = path
            .iter()
            .filter_map(|node| reg.element_handlers.get(node))
            .flat_map(|list| list.iter().map(|(_, h)| h.clone()))
            .collect();
        handlers.extend(reg.global_handlers.iter().map(|(_, h)| h.clone()));
        handlers
    });

    for handler in &handlers {
        if handler(&event) {
            return true;
        }
    }

    run_default_action(&event);
    false
}

/// Native behavior for keys nobody consumed.
fn run_default_action(event: &KeyboardEvent) {
    match event.key.as_str() {
        "Tab" if event.modifiers.shift => {
            focus::focus_previous();
        }
        "Tab" => {
            focus::focus_next();
        }
        key => {
            if let Some(target) = event.target.filter(|&t| activates_on(t, key)) {
                pointer::dispatch(PointerEvent::click(target));
            }
        }
    }
}

/// Does `key` click the element natively? Buttons take Enter and Space,
/// links with an `href` take Enter.
fn activates_on(index: usize, key: &str) -> bool {
    if core::is_disabled(index) {
        return false;
    }
    match core::get_tag(index).as_str() {
        "button" => key == "Enter" || key == " ",
        "a" => key == "Enter" && attributes::has_attribute(index, "href"),
        _ => false,
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events at document level.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.global_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to events targeting `index` or bubbling through it.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on_element<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.element_handlers
            .entry(index)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.element_handlers.get_mut(&index) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.element_handlers.remove(&index);
                }
            }
        });
    }
}

/// Number of document-level handlers (for diagnostics and tests).
pub fn global_handler_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().global_handlers.len())
}

/// Clean up all handlers for an element index.
/// Called when the element is released.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().element_handlers.remove(&index);
    });
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::new());
}

// =============================================================================
// TESTS
// =============================================================================
