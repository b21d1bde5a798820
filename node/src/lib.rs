//! Sentinel alert service — wires the verification engine, per-observer
//! proximity sessions, report storage, metrics, and logging together.
//!
//! The service is the central coordinator that:
//! - Accepts report submissions and edits, writing them through to storage
//! - Records community votes and administrator verification
//! - Runs one proximity monitor per tracking session
//! - Publishes report and danger-zone events to subscribers

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod metrics;
pub mod service;
mod session;

pub use config::NodeConfig;
pub use error::NodeError;
pub use event::AlertEvent;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use service::AlertService;
