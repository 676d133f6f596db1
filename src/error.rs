//! Unified error handling for groupwarden.
//!
//! Two error families exist: transport failures (recoverable, fail-open)
//! and configuration failures (fatal at startup).

use thiserror::Error;

/// Errors raised by the chat transport boundary.
///
/// None of these are fatal to event processing: membership failures fall
/// back to "not admin", send failures are logged (and retried only for
/// operator notifications).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("membership unavailable for group {0}")]
    MembersUnavailable(String),

    #[error("send rejected: {0}")]
    SendRejected(String),

    #[error("transport closed")]
    Closed,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TransportError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MembersUnavailable(_) => "members_unavailable",
            Self::SendRejected(_) => "send_rejected",
            Self::Closed => "closed",
            Self::Io(_) => "io",
            Self::Encode(_) => "encode",
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid restricted-content pattern: {0}")]
    Pattern(#[from] regex::Error),
}
