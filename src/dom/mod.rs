//! Document Model - Element tree, parallel arrays, queries.
//!
//! The controllers only ever talk to the document through this module, so it
//! is the swappable adapter between widget state machines and a concrete UI.
//!
//! # Architecture
//!
//! Elements are NOT objects. They are indices into parallel arrays:
//!
//! ```text
//! Index 0: body    (parent=None, classes=[],                  attrs={aria-hidden})
//! Index 1: div     (parent=0,    classes=[accordion],          attrs={})
//! Index 2: button  (parent=1,    classes=[accordion__header],  attrs={aria-expanded=false, ...})
//! Index 3: div     (parent=1,    classes=[accordion__content], flags=HIDDEN)
//! ```
//!
//! Each thread owns one document.

pub mod arrays;
pub mod builder;
pub mod events;
pub mod query;
mod registry;

pub use builder::{element, ElementProps};
pub use events::{dispatch_custom, on_custom, CustomEvent};
pub use registry::*;
