//! Abstract storage traits for the Sentinel engine.
//!
//! The engine keeps its authoritative state in memory and writes every
//! changed report through to an external store. Backends implement
//! [`ReportStore`]; the rest of the workspace depends only on the trait.

pub mod error;
pub mod memory;
pub mod report;

pub use error::StoreError;
pub use memory::MemoryReportStore;
pub use report::ReportStore;
