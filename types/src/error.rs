//! Errors raised while constructing shared types from raw input.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("severity {0} is out of range (0..=100)")]
    SeverityOutOfRange(u8),
}
