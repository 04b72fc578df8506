//! Error type shared by the telemetry adapter, the refresh cycle and config loading.

use std::io;

use crate::types::Category;

pub type Result<T> = std::result::Result<T, DashError>;

#[derive(thiserror::Error, Debug)]
pub enum DashError {
    #[error("http request for {category} failed: {source}")]
    Http {
        category: Category,
        #[source]
        source: reqwest::Error,
    },

    #[error("{category} returned HTTP {status}")]
    Status { category: Category, status: u16 },

    #[error("{category} unreachable: {reason}")]
    Unreachable { category: Category, reason: String },

    #[error("malformed {category} payload: {source}")]
    Decode {
        category: Category,
        #[source]
        source: serde_json::Error,
    },

    #[error("{category} payload rejected: {reason}")]
    Invalid { category: Category, reason: String },

    #[error("invalid backend url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("refresh cycle failed: {0}")]
    Cycle(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DashError {
    pub fn category(&self) -> Option<Category> {
        match self {
            DashError::Http { category, .. }
            | DashError::Status { category, .. }
            | DashError::Unreachable { category, .. }
            | DashError::Decode { category, .. }
            | DashError::Invalid { category, .. } => Some(*category),
            DashError::Url { .. }
            | DashError::Client(_)
            | DashError::Cycle(_)
            | DashError::Io(_) => None,
        }
    }

    /// True when the backend answered but the body could not be used.
    pub fn is_payload_error(&self) -> bool {
        matches!(self, DashError::Decode { .. } | DashError::Invalid { .. })
    }
}
