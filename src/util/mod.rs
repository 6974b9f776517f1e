//! Utility functions.

pub mod env;
pub mod format;

pub use format::{ellipsize, mask_key, word_count};
