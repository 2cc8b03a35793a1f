//! Widget options.
//!
//! Options deserialize with serde (every field defaulted) so hosts can load
//! them from any format. Carousel options can also come from the container's
//! `data-*` attributes.

use serde::Deserialize;
use std::time::Duration;

use crate::dom::arrays::attributes;
use crate::error::WidgetError;

/// Default autoplay period.
pub const DEFAULT_INTERVAL_MS: u64 = 5000;

/// Minimum horizontal travel (px) for a touch gesture to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Default id of the modal root element.
pub const DEFAULT_MODAL_ID: &str = "modal";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselOptions {
    /// Advance automatically every `interval_ms`.
    pub autoplay: bool,
    pub interval_ms: u64,
    pub swipe_threshold: f32,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            autoplay: false,
            interval_ms: DEFAULT_INTERVAL_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl CarouselOptions {
    /// Defaults overridden by the container's `data-*` attributes.
    pub fn from_dataset(container: usize) -> Self {
        Self::default().with_dataset(container)
    }

    /// Override with `data-autoplay` and `data-interval` from a container.
    ///
    /// `data-autoplay` enables autoplay unless its value is `"false"`.
    /// A malformed `data-interval` logs a warning and keeps the current value.
    pub fn with_dataset(mut self, container: usize) -> Self {
        if let Some(value) = attributes::get_data(container, "autoplay") {
            self.autoplay = value != "false";
        }

        if let Some(value) = attributes::get_data(container, "interval") {
            match parse_interval(&value) {
                Ok(ms) => self.interval_ms = ms,
                Err(err) => tracing::warn!(container, %err, "keeping autoplay interval"),
            }
        }

        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Parse an autoplay period in milliseconds. Zero is rejected.
pub fn parse_interval(value: &str) -> Result<u64, WidgetError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(WidgetError::InvalidOption {
            name: "interval",
            value: value.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModalOptions {
    /// Id of the modal root (reused if present, created otherwise).
    pub id: String,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            id: DEFAULT_MODAL_ID.to_string(),
        }
    }
}

/// Page-level options for [`crate::widgets::mount`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Base options for every carousel, before `data-*` overrides.
    pub carousel: CarouselOptions,
    /// Build a modal for `data-modal-title` triggers. None skips the modal.
    pub modal: Option<ModalOptions>,
}
