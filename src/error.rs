//! Widget errors.
//!
//! Nothing in this crate is fatal. Constructors return these so the page
//! bootstrap can log and skip; runtime operations log and no-op instead.

use thiserror::Error;

/// Errors raised while mounting or configuring a widget controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// A required container or child element was not found.
    #[error("missing element: {what}")]
    MissingElement { what: &'static str },

    /// A carousel container holds no `.carousel__slide` children.
    #[error("carousel container {container} has no slides")]
    NoSlides { container: usize },

    /// An option value (usually from a `data-*` attribute) could not be used.
    #[error("invalid option `{name}`: {value:?}")]
    InvalidOption { name: &'static str, value: String },

    /// An element index was released (or recycled) since it was captured.
    #[error("element {index} is no longer attached to the document")]
    StaleElement { index: usize },
}

impl WidgetError {
    /// Shorthand for [`WidgetError::MissingElement`].
    pub fn missing(what: &'static str) -> Self {
        Self::MissingElement { what }
    }
}
