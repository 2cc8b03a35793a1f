//! # spark-widgets
//!
//! Accessible interactive widget controllers for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): every
//! controller keeps its state register in a `Signal`.
//!
//! ## Architecture
//!
//! Three controllers, each owning one container subtree and one piece of
//! authoritative state, kept consistent across pointer, keyboard, touch and
//! timer input:
//!
//! - **Accordion** - single-expand disclosure group
//! - **Carousel** - circular slide index with single-step wrap
//! - **Modal** - open/closed dialog with focus trap and focus restoration
//!
//! Every state change is a pure `transition(state, action)` followed by one
//! `render(state)` onto the document:
//!
//! ```text
//! input event → handler registry → transition → Signal<State> → render → ARIA/classes
//! ```
//!
//! The document is a per-thread element tree of parallel arrays (ECS-style):
//! elements are indices, not objects.
//!
//! ## Modules
//!
//! - [`dom`] - Element registry, parallel arrays, queries, builder, custom events
//! - [`state`] - Focus, keyboard, pointer, timers, motion, crossterm input bridge
//! - [`widgets`] - The controllers and the page bootstrap
//! - [`config`] - Serde option structs and `data-*` parsing
//! - [`error`] - `WidgetError`
//! - [`types`] - Shared types (cleanup functions, node flags, ARIA strings)

pub mod config;
pub mod dom;
pub mod error;
pub mod state;
pub mod types;
pub mod widgets;

// Re-export commonly used items
pub use types::*;

pub use config::{CarouselOptions, ModalOptions, PageConfig};
pub use error::WidgetError;

pub use dom::{
    body, element, get_current_parent_index, is_allocated, on_custom, on_destroy,
    pop_parent_context, push_parent_context, release_index, reset_document, CustomEvent,
    ElementProps, ElementRef,
};

pub use state::{
    KeyState, KeyboardEvent, Modifiers, MotionContext, PointerEvent, PointerHandlers, PointerKind,
    TimerId,
};

pub use widgets::{
    mount, tick, Accordion, AccordionAction, AccordionState, Carousel, CarouselAction,
    CarouselState, Modal, ModalAction, ModalContent, ModalState, MountHandle, Section,
};
