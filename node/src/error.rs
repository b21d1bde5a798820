use sentinel_types::SessionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("verification error: {0}")]
    Verification(#[from] sentinel_verification::VerificationError),

    #[error("store error: {0}")]
    Store(#[from] sentinel_store::StoreError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("tracking session {0} not found")]
    SessionNotFound(SessionId),

    #[error("tracking session {0} already exists")]
    SessionExists(SessionId),

    #[error("tracking session {0} has shut down")]
    SessionClosed(SessionId),

    #[error("{0}")]
    Other(String),
}

impl NodeError {
    /// The verification rejection behind this error, if that is what it is.
    pub fn as_rejection(&self) -> Option<&sentinel_verification::VerificationError> {
        match self {
            Self::Verification(e) => Some(e),
            _ => None,
        }
    }
}
