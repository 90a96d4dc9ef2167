use std::fmt;

use thiserror::Error;

/// Transport-level failure classes, derived from the HTTP client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Unknown,
}

impl NetworkErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by a single provider call (`create_task` / `get_task_status`).
///
/// Providers never retry internally; the poller decides what is transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Missing or malformed credentials. Caller-fixable, never retried.
    #[error("config error: {0}")]
    Config(String),

    #[error("network error kind={kind}: {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// The vendor answered with a non-2xx status.
    #[error("remote error status={status}: {message}")]
    Remote { status: u16, message: String },

    /// A 2xx response whose body could not be understood.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network { .. } => "network",
            Self::Remote { .. } => "remote",
            Self::Decode(_) => "decode",
        }
    }
}
