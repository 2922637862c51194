//! Network error types

use std::io;

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by fetchers and mutations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request failed before a response arrived
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Remote error {status}: {body}")]
    Remote { status: u16, body: String },

    /// A client-side precondition failed; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Session expiry: a 401 from the server or no session at all
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Remote { status: 401, .. } | Error::NotAuthenticated
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Remote { status: 404, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<skillzone_core::Error> for Error {
    fn from(err: skillzone_core::Error) -> Self {
        match err {
            skillzone_core::Error::Validation(msg) => Error::Validation(msg),
            skillzone_core::Error::Io(e) => Error::Io(e),
            skillzone_core::Error::Serialization(e) => Error::Decode(e),
            other => Error::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        let expired = Error::Remote {
            status: 401,
            body: "Unauthorized".to_string(),
        };
        assert!(expired.is_unauthorized());
        assert!(Error::NotAuthenticated.is_unauthorized());
        assert!(!Error::Remote {
            status: 500,
            body: String::new()
        }
        .is_unauthorized());
        assert!(!Error::Validation("x".into()).is_unauthorized());
    }

    #[test]
    fn test_core_validation_maps_through() {
        let err: Error = skillzone_core::Error::validation("title is required").into();
        assert!(matches!(err, Error::Validation(ref m) if m == "title is required"));
    }
}
