//! Pointer Module - Click, hover and touch events
//!
//! Per-element handler registry with DOM-like propagation:
//! - `Click`, `TouchStart`, `TouchEnd` bubble from the target to the root
//! - `Enter`, `Leave` fire on the element only (`mouseenter`/`mouseleave`)
//!
//! A click first runs the native default of focusing its target when the
//! target can take focus (what a browser does on mousedown).
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::pointer::{self, PointerHandlers};
//! use std::rc::Rc;
//!
//! let cleanup = pointer::on_element(overlay, PointerHandlers {
//!     on_click: Some(Rc::new(move |event| {
//!         if event.target == overlay {
//!             println!("backdrop clicked");
//!         }
//!     })),
//!     ..Default::default()
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::focus;
use super::keyboard::Modifiers;
use crate::dom::query::ancestors;

// =============================================================================
// TYPES
// =============================================================================

/// Pointer event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Click,
    Enter,
    Leave,
    TouchStart,
    TouchEnd,
}

impl PointerKind {
    /// Does this kind propagate to ancestors?
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Enter | Self::Leave)
    }
}

/// Pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Element the pointer is over
    pub target: usize,
    /// Horizontal position (`clientX` / `changedTouches[0].screenX`)
    pub x: f32,
    /// Vertical position
    pub y: f32,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event
    pub fn new(kind: PointerKind, target: usize, x: f32, y: f32) -> Self {
        Self {
            kind,
            target,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Click on an element
    pub fn click(target: usize) -> Self {
        Self::new(PointerKind::Click, target, 0.0, 0.0)
    }

    /// Pointer enters an element
    pub fn enter(target: usize) -> Self {
        Self::new(PointerKind::Enter, target, 0.0, 0.0)
    }

    /// Pointer leaves an element
    pub fn leave(target: usize) -> Self {
        Self::new(PointerKind::Leave, target, 0.0, 0.0)
    }

    /// Finger down at horizontal position `x`
    pub fn touch_start(target: usize, x: f32) -> Self {
        Self::new(PointerKind::TouchStart, target, x, 0.0)
    }

    /// Finger up at horizontal position `x`
    pub fn touch_end(target: usize, x: f32) -> Self {
        Self::new(PointerKind::TouchEnd, target, x, 0.0)
    }
}

/// Pointer callback (Rc so it can be cloned out of the registry).
pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

/// Handlers attached to one element
#[derive(Clone, Default)]
pub struct PointerHandlers {
    pub on_click: Option<PointerHandler>,
    pub on_enter: Option<PointerHandler>,
    pub on_leave: Option<PointerHandler>,
    pub on_touch_start: Option<PointerHandler>,
    pub on_touch_end: Option<PointerHandler>,
}

impl PointerHandlers {
    fn for_kind(&self, kind: PointerKind) -> Option<&PointerHandler> {
        match kind {
            PointerKind::Click => self.on_click.as_ref(),
            PointerKind::Enter => self.on_enter.as_ref(),
            PointerKind::Leave => self.on_leave.as_ref(),
            PointerKind::TouchStart => self.on_touch_start.as_ref(),
            PointerKind::TouchEnd => self.on_touch_end.as_ref(),
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static HOVERED: Signal<Option<usize>> = signal(None);
}

/// Element currently under the pointer, as tracked by [`hover`].
pub fn hovered_element() -> Option<usize> {
    HOVERED.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    element_handlers: HashMap<usize, Vec<(usize, PointerHandlers)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            element_handlers: HashMap::new(),
            next_id: 0,
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

/// Attach handlers to an element. Returns cleanup function.
pub fn on_element(index: usize, handlers: PointerHandlers) -> impl FnOnce() {
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.element_handlers.entry(index).or_default().push((id, handlers));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.element_handlers.get_mut(&index) {
                list.retain(|(handler_id, _)| *handler_id != id);
                if list.is_empty() {
                    reg.element_handlers.remove(&index);
                }
            }
        });
    }
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a pointer event. Returns true if any handler ran.
pub fn dispatch(event: PointerEvent) -> bool {
    if event.kind == PointerKind::Click && focus::can_focus(event.target) {
        focus::focus(event.target);
    }

    let path: Vec<usize> = if event.kind.bubbles() {
        std::iter::once(event.target).chain(ancestors(event.target)).collect()
    } else {
        vec![event.target]
    };

    // Snapshot: handlers may detach listeners (destroy) while running.
    let handlers: Vec<PointerHandler> = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        path.iter()
            .filter_map(|node| reg.element_handlers.get(node))
            .flat_map(|list| list.iter())
            .filter_map(|(_, handlers)| handlers.for_kind(event.kind).cloned())
            .collect()
    });

    for handler in &handlers {
        handler(&event);
    }
    !handlers.is_empty()
}

/// Move the pointer over `target` (or off every element).
///
/// Follows `mouseenter`/`mouseleave` semantics: `Leave` fires on every
/// element the pointer is no longer inside (innermost first), then `Enter`
/// on every element it newly entered (outermost first). Moving between two
/// children of a container leaves the container untouched.
pub fn hover(target: Option<usize>) {
    let previous = hovered_element();
    if previous == target {
        return;
    }
    HOVERED.with(|s| s.set(target));

    let chain = |node: Option<usize>| -> Vec<usize> {
        node.map(|n| std::iter::once(n).chain(ancestors(n)).collect())
            .unwrap_or_default()
    };
    let old_chain = chain(previous);
    let new_chain = chain(target);

    for &node in old_chain.iter().filter(|n| !new_chain.contains(n)) {
        dispatch(PointerEvent::leave(node));
    }
    for &node in new_chain.iter().rev().filter(|n| !old_chain.contains(n)) {
        dispatch(PointerEvent::enter(node));
    }
}

/// Clean up all handlers for an element index.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().element_handlers.remove(&index);
    });
    if hovered_element() == Some(index) {
        HOVERED.with(|s| s.set(None));
    }
}

/// Reset pointer state (for testing)
pub fn reset_pointer_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::new());
    HOVERED.with(|s| s.set(None));
}

// =============================================================================
// TESTS
// =============================================================================
