//! Game rules for 2048.
//!
//! Pure functions over cells and boards. Rules are kept apart from the
//! state type so contracts and tests can call them directly.

pub mod loss;
pub mod slide;

pub use loss::has_lost;
pub use slide::{Collapsed, collapse_line, merge_result};
