//! Variable view engine for paused debuggee threads.
//!
//! Materializes one level of the variable tree at a time and renders it as
//! depth-encoded, fold-friendly text lines for a plain-text editor front
//! end. [`VariableView`] owns the expansion cache that lets the consumer
//! expand one composite value at a time without re-walking the object
//! graph; [`ValueFormatter`] holds the pure display logic for a single
//! variable.

pub mod config;
pub mod format;
pub mod view;

pub use config::FormatConfig;
pub use format::ValueFormatter;
pub use view::{VariableView, EXPANDABLE_SYMBOL, INDENT, LEAF_SYMBOL};
