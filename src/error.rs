//! Error types for the coin market SDK

use crate::constants::{
    DETAILS_FAILED_MESSAGE, FETCH_FAILED_MESSAGE, NOT_FOUND_MESSAGE, RATE_LIMIT_MESSAGE,
    UNEXPECTED_ERROR_MESSAGE,
};
use thiserror::Error;

/// Errors that can occur when fetching market data from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider answered with a non-success HTTP status
    #[error("Provider API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Lookup returned no coin for the requested identifier
    #[error("Coin not found: {0}")]
    NotFound(String),
}

/// Coarse classification of a failed fetch, used to pick the message shown
/// to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 429
    RateLimited,
    /// Any other HTTP status, network failure or timeout
    Transport,
    /// Failure outside the HTTP exchange itself
    Unexpected,
    /// Details lookup came back empty
    NotFound,
}

impl ProviderError {
    /// Creates an ApiError
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Classifies this error
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::RateLimitExceeded => FailureKind::RateLimited,
            ProviderError::ApiError { status: 429, .. } => FailureKind::RateLimited,
            ProviderError::NetworkError(e) if e.is_decode() => FailureKind::Unexpected,
            ProviderError::NetworkError(_)
            | ProviderError::Timeout
            | ProviderError::ApiError { .. } => FailureKind::Transport,
            ProviderError::InvalidResponse(_) => FailureKind::Unexpected,
            ProviderError::NotFound(_) => FailureKind::NotFound,
        }
    }

    /// Message shown when fetching the market list fails
    pub fn market_message(&self) -> &'static str {
        match self.kind() {
            FailureKind::RateLimited => RATE_LIMIT_MESSAGE,
            FailureKind::Transport => FETCH_FAILED_MESSAGE,
            FailureKind::Unexpected | FailureKind::NotFound => UNEXPECTED_ERROR_MESSAGE,
        }
    }

    /// Message shown when fetching a coin's details fails
    pub fn details_message(&self) -> &'static str {
        match self.kind() {
            FailureKind::NotFound => NOT_FOUND_MESSAGE,
            FailureKind::RateLimited => RATE_LIMIT_MESSAGE,
            FailureKind::Transport | FailureKind::Unexpected => DETAILS_FAILED_MESSAGE,
        }
    }
}

/// Errors raised by a persistence backend of the viewed-coins store
///
/// These never reach callers of the store's public operations; the store
/// logs them and carries on with its in-memory state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend lock was poisoned by a panicking writer
    #[error("Storage backend poisoned")]
    Poisoned,
}

/// Returned when a string names no supported currency
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported currency: {0}")]
pub struct UnsupportedCurrency(pub String);

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    /// Creates an InvalidValue error
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
