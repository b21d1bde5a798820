//! Opaque identifiers for reports, identities, and tracking sessions.
//!
//! The engine never interprets these; they are handed in by the report store,
//! the identity provider, and the device-location collaborator respectively.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Return the raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

opaque_id!(
    /// Unique identifier of an incident report.
    ReportId
);

opaque_id!(
    /// An authenticated identity (reporter, voter, or administrator).
    IdentityId
);

opaque_id!(
    /// One observer's position-tracking session.
    SessionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_string() {
        let id = SessionId::new("session-7");
        assert_eq!(id.to_string(), "session-7");
        assert_eq!(id.as_str(), "session-7");
    }

    #[test]
    fn serializes_transparently() {
        let id = ReportId::new("r-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r-1\"");
    }
}
