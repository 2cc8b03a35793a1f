//! Custom Events - Bubbling notifications with a string payload.
//!
//! Widgets announce activations (`accordion:toggle`, `carousel:change`) so
//! external listeners such as analytics can react without touching widget
//! state. Events bubble from the target through every ancestor.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::query::ancestors;

// =============================================================================
// TYPES
// =============================================================================

/// A dispatched custom event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEvent {
    /// Event name, e.g. `accordion:toggle`.
    pub name: String,
    /// Identifier payload.
    pub detail: String,
    /// Element the event was dispatched on.
    pub target: usize,
}

/// Handler for custom events.
pub type CustomHandler = Rc<dyn Fn(&CustomEvent)>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    handlers: HashMap<usize, Vec<(usize, String, CustomHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            next_id: 0,
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

/// Listen for `name` on `index` (including events bubbling from descendants).
/// Returns cleanup function.
pub fn on_custom<F>(index: usize, name: &str, handler: F) -> impl FnOnce()
where
    F: Fn(&CustomEvent) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers
            .entry(index)
            .or_default()
            .push((id, name.to_string(), Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.handlers.get_mut(&index) {
                list.retain(|(handler_id, _, _)| *handler_id != id);
                if list.is_empty() {
                    reg.handlers.remove(&index);
                }
            }
        });
    }
}

/// Dispatch a bubbling custom event. Returns how many handlers ran.
pub fn dispatch_custom(target: usize, name: &str, detail: &str) -> usize {
    let event = CustomEvent {
        name: name.to_string(),
        detail: detail.to_string(),
        target,
    };

    // Snapshot first: handlers may add or remove listeners.
    let path: Vec<usize> = std::iter::once(target).chain(ancestors(target)).collect();
    let handlers: Vec<CustomHandler> = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        path.iter()
            .filter_map(|node| reg.handlers.get(node))
            .flat_map(|list| list.iter())
            .filter(|(_, handler_name, _)| handler_name == name)
            .map(|(_, _, handler)| handler.clone())
            .collect()
    });

    for handler in &handlers {
        handler(&event);
    }
    handlers.len()
}

/// Drop all listeners on an element.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().handlers.remove(&index);
    });
}

/// Reset custom event state (for testing).
pub fn reset_custom_events() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::new());
}
