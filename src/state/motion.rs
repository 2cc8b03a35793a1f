//! Motion Module - Reduced-motion preference and GPU layer promotion
//!
//! The host detects `prefers-reduced-motion` and feeds it in; widgets read it
//! through an injected [`MotionContext`] instead of a global.

use spark_signals::{signal, Signal};

use crate::dom::arrays::{attributes, classes};

/// Class added to elements promoted to their own compositing layer.
pub const GPU_LAYER_CLASS: &str = "gpu-layer";

/// Motion preferences shared by the widgets of one page.
#[derive(Clone)]
pub struct MotionContext {
    reduced_motion: Signal<bool>,
}

impl MotionContext {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion: signal(reduced_motion),
        }
    }

    /// Update the preference (e.g. when the media query changes).
    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    /// Hint that `index` animates transforms. Skipped under reduced motion.
    ///
    /// Returns true if the element was promoted.
    pub fn promote_layer(&self, index: usize) -> bool {
        if self.prefers_reduced_motion() {
            return false;
        }
        classes::add_class(index, GPU_LAYER_CLASS);
        attributes::set_style(index, "will-change", "transform");
        true
    }
}

impl Default for MotionContext {
    fn default() -> Self {
        Self::new(false)
    }
}
