//! Mount - Page bootstrap
//!
//! Discovers widget containers under a root and mounts one controller per
//! container:
//!
//! - `.accordion` → [`Accordion`]
//! - `.carousel` → [`Carousel`] (page options, then `data-*` overrides)
//! - elements with `data-modal-title` → triggers of one shared [`Modal`]
//!
//! A widget that fails to mount is logged and skipped; the rest of the page
//! still mounts.
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::widgets::{mount, tick};
//!
//! let handle = mount(body(), &PageConfig::default(), MotionContext::new(reduced));
//! while handle.is_mounted() {
//!     tick(Duration::from_millis(16), |x, y| hit_test(x, y))?;
//! }
//! handle.unmount();
//! ```

use std::io;
use std::time::{Duration, Instant};

use crate::config::PageConfig;
use crate::dom::arrays::attributes;
use crate::dom::is_allocated;
use crate::dom::query::{descendants, query_all_by_class};
use crate::state::input;
use crate::state::motion::MotionContext;
use crate::state::timers;
use crate::types::Cleanup;

use super::accordion::{Accordion, ACCORDION_CLASS};
use super::carousel::Carousel;
use super::modal::Modal;

/// Every controller mounted on a page.
pub struct MountHandle {
    pub accordions: Vec<Accordion>,
    pub carousels: Vec<Carousel>,
    pub modal: Option<Modal>,
    trigger_cleanups: Vec<Cleanup>,
    /// Widgets that failed to mount.
    pub skipped: usize,
}

impl MountHandle {
    /// True while any controller is mounted.
    pub fn is_mounted(&self) -> bool {
        !self.accordions.is_empty() || !self.carousels.is_empty() || self.modal.is_some()
    }

    /// Destroy every controller.
    pub fn unmount(self) {
        for cleanup in self.trigger_cleanups {
            cleanup();
        }
        for accordion in self.accordions {
            accordion.destroy();
        }
        for carousel in self.carousels {
            carousel.destroy();
        }
        if let Some(modal) = self.modal {
            modal.destroy();
        }
    }
}

/// Mount every widget found under `root`.
pub fn mount(root: usize, config: &PageConfig, motion: MotionContext) -> MountHandle {
    let mut handle = MountHandle {
        accordions: Vec::new(),
        carousels: Vec::new(),
        modal: None,
        trigger_cleanups: Vec::new(),
        skipped: 0,
    };

    if !is_allocated(root) {
        tracing::warn!(root, "mount root not found");
        return handle;
    }

    for container in query_all_by_class(root, ACCORDION_CLASS) {
        match Accordion::init(container) {
            Ok(accordion) => handle.accordions.push(accordion),
            Err(err) => {
                tracing::warn!(container, %err, "skipping accordion");
                handle.skipped += 1;
            }
        }
    }

    for container in query_all_by_class(root, "carousel") {
        let options = config.carousel.clone().with_dataset(container);
        match Carousel::init(container, options, motion.clone()) {
            Ok(carousel) => handle.carousels.push(carousel),
            Err(err) => {
                tracing::warn!(container, %err, "skipping carousel");
                handle.skipped += 1;
            }
        }
    }

    if let Some(options) = &config.modal {
        let triggers: Vec<usize> = descendants(root)
            .into_iter()
            .filter(|&node| attributes::has_attribute(node, "data-modal-title"))
            .collect();

        match Modal::init(options.clone()) {
            Ok(modal) => {
                for trigger in triggers {
                    match modal.bind_trigger(trigger) {
                        Ok(cleanup) => handle.trigger_cleanups.push(cleanup),
                        Err(err) => tracing::warn!(trigger, %err, "skipping modal trigger"),
                    }
                }
                handle.modal = Some(modal);
            }
            Err(err) => {
                tracing::warn!(%err, "skipping modal");
                handle.skipped += 1;
            }
        }
    }

    tracing::debug!(
        accordions = handle.accordions.len(),
        carousels = handle.carousels.len(),
        modal = handle.modal.is_some(),
        skipped = handle.skipped,
        "page mounted"
    );
    handle
}

/// Run one frame of a terminal host loop: route at most one input event,
/// then advance the widget clock by the real time the frame took.
pub fn tick<H>(frame: Duration, hit_test: H) -> io::Result<()>
where
    H: Fn(u16, u16) -> Option<usize>,
{
    let started = Instant::now();
    if let Some(event) = input::poll_event(frame, hit_test)? {
        input::route_event(event);
    }
    timers::advance(started.elapsed());
    Ok(())
}
