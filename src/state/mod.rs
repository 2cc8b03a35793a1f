//! State Module - Runtime state management systems
//!
//! The event sources and registers that drive widget interactivity:
//!
//! - **Focus** - Active element, tabbable set, Tab order, focus trap
//! - **Keyboard** - Event types, bubbling dispatch, handler registry
//! - **Pointer** - Click, hover and touch events
//! - **Timers** - Interval timers on a host-driven clock
//! - **Motion** - Reduced-motion preference and layer promotion
//! - **Input** - crossterm bridge (conversion, polling, routing)

pub mod focus;
pub mod input;
pub mod keyboard;
pub mod motion;
pub mod pointer;
pub mod timers;

pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
pub use motion::MotionContext;
pub use pointer::{PointerEvent, PointerHandlers, PointerKind};
pub use timers::TimerId;
