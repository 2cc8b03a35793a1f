//! Core types for spark-widgets.
//!
//! Shared across the document model, the event registries and the widget
//! controllers.

use std::rc::Rc;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by handler registrations.
///
/// Call this to detach the handler. Controllers collect these and run them
/// on `destroy()`.
pub type Cleanup = Box<dyn FnOnce()>;

/// Shared callback with no arguments (timers, focus hooks).
pub type Callback = Rc<dyn Fn()>;

// =============================================================================
// Node Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Boolean element state stored as a bitfield.
    ///
    /// These mirror the boolean DOM attributes the controllers care about.
    /// Combine with bitwise OR: `NodeFlags::HIDDEN | NodeFlags::DISABLED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// `hidden` attribute: element and subtree are not rendered.
        const HIDDEN = 1 << 0;
        /// `disabled` attribute: form controls cannot take focus.
        const DISABLED = 1 << 1;
    }
}

// =============================================================================
// ARIA values
// =============================================================================

/// Render a boolean as the DOM attribute string ARIA expects.
///
/// ARIA state attributes are strings, never booleans: `"true"` / `"false"`.
pub fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Parse an ARIA boolean attribute. Only the exact string `"true"` is true.
pub fn parse_aria_bool(value: Option<&str>) -> bool {
    value == Some("true")
}

// =============================================================================
// Tests
// =============================================================================
