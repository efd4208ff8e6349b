//! # Client Errors
//!
//! One error type for everything the client can report. Every operation has
//! a `try_*` form that returns `Result<_, MarketError>`; the unprefixed forms
//! keep the marketplace's historical behavior of logging the error and
//! handing back a harmless default.

use thiserror::Error;

use crate::identity::StoreError;

/// Errors surfaced by the marketplace client.
#[derive(Debug, Error)]
pub enum MarketError {
    /// The request never produced a usable response: connection refused,
    /// timeout, or a body that failed to decode.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered, but not with a 2xx.
    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The identity store could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// The client was configured with something unusable, such as a base
    /// URL that doesn't parse.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The caller handed us something we can't encode.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MarketError {
    /// `true` for transport failures and non-2xx responses alike.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }

    /// `true` when the identity store is at fault.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

pub type MarketResult<T> = Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_count_as_network() {
        let err = MarketError::HttpStatus {
            status: 503,
            url: "http://127.0.0.1:8000/listed-nfts/".into(),
        };
        assert!(err.is_network());
        assert!(!err.is_storage());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn storage_errors_are_distinguishable() {
        let err: MarketError = StoreError::Serialization("bad json".into()).into();
        assert!(err.is_storage());
        assert!(!err.is_network());
    }

    #[test]
    fn config_errors_are_neither() {
        let err = MarketError::Config("bad api url".into());
        assert!(!err.is_network());
        assert!(!err.is_storage());
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn invalid_input_is_neither() {
        let err = MarketError::InvalidInput("empty nft id".into());
        assert!(!err.is_network());
        assert!(!err.is_storage());
    }
}
