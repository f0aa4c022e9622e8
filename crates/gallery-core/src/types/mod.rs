//! Shared value types.

pub mod sorting;

pub use sorting::{SortDirection, SortKey};
