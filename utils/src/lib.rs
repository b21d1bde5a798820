//! Shared utilities for the Sentinel engine.

pub mod format;

pub use format::format_distance;
