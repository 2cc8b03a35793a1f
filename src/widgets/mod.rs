//! Widgets - Interactive controllers
//!
//! Each controller owns one container subtree and one state register:
//!
//! - [`Accordion`] - single-expand disclosure group
//! - [`Carousel`] - circular slide navigation
//! - [`Modal`] - dialog with focus trap and focus restoration
//!
//! Every controller follows `init → transitions → destroy`. State changes
//! go through a pure `transition(state, action)` and one `render`.

pub mod accordion;
pub mod carousel;
pub mod modal;
mod mount;

pub use accordion::{Accordion, AccordionAction, AccordionState, Section};
pub use carousel::{Carousel, CarouselAction, CarouselState};
pub use modal::{Modal, ModalAction, ModalContent, ModalState};
pub use mount::{mount, tick, MountHandle};
