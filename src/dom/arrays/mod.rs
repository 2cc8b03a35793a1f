//! Document Model - Parallel Arrays
//!
//! All element state lives in these parallel arrays.
//! Each array index corresponds to one element.
//!
//! # Array Categories
//!
//! - **core**: Tag name, parent, boolean flags (hidden, disabled)
//! - **attributes**: String attributes and inline style properties
//! - **classes**: Class list
//! - **text**: Text content

pub mod attributes;
pub mod classes;
pub mod core;
pub mod text;

use self::attributes as attribute_arrays;
use self::classes as class_arrays;
use self::core as core_arrays;
use self::text as text_arrays;

/// Ensure all arrays have capacity for the given index.
///
/// Called by registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core_arrays::ensure_capacity(index);
    attribute_arrays::ensure_capacity(index);
    class_arrays::ensure_capacity(index);
    text_arrays::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core_arrays::clear_at_index(index);
    attribute_arrays::clear_at_index(index);
    class_arrays::clear_at_index(index);
    text_arrays::clear_at_index(index);
}

/// Reset all parallel arrays to release memory.
pub fn reset_all_arrays() {
    core_arrays::reset();
    attribute_arrays::reset();
    class_arrays::reset();
    text_arrays::reset();
}
