//! Error types for the Discuit API client.
//!
//! # Design
//! Every failure surfaced by the adapter or the facade lands in exactly one
//! `DiscuitError` variant. Nothing is retried and nothing is recovered
//! locally: callers match on the variant they care about.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `RestAdapter` and `DiscuitClient`.
#[derive(Debug, Error)]
pub enum DiscuitError {
    /// The request never produced a response (connection, DNS, TLS).
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The body was not JSON, or the JSON did not fit the expected entity.
    #[error("could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with a status outside 2xx.
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A single-item lookup came back empty.
    #[error("{0} not found")]
    NotFound(String),

    /// `Link::save_to` was called before the content was fetched.
    #[error("no content fetched for {url}")]
    NoData { url: String },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Caller input rejected before any request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscuitError {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        DiscuitError::Decode {
            context: context.into(),
            source,
        }
    }

    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            DiscuitError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DiscuitError>;
