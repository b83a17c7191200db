//! Centralized error types for fruitscan.

use thiserror::Error;

/// Failure kinds of the analysis relay.
///
/// The `Display` text of every variant is the user-safe message returned to
/// the caller; upstream bodies and raw model output never appear in it.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("No image provided")]
    InvalidInput,

    #[error("AI_GATEWAY_API_KEY is not configured")]
    Misconfigured,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("Service temporarily unavailable. Please try again later.")]
    UpstreamUnavailable,

    #[error("AI gateway error: {0}")]
    UpstreamStatus(u16),

    #[error("Failed to reach AI gateway")]
    UpstreamTransport(#[source] reqwest::Error),

    #[error("No response from AI")]
    EmptyUpstreamResponse,

    #[error("Failed to parse analysis results")]
    MalformedUpstreamPayload,
}

/// Coarse classification of a [`RelayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Misconfigured,
    RateLimited,
    UpstreamUnavailable,
    UpstreamError,
    EmptyUpstreamResponse,
    MalformedUpstreamPayload,
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput => ErrorKind::InvalidInput,
            Self::Misconfigured => ErrorKind::Misconfigured,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::UpstreamUnavailable => ErrorKind::UpstreamUnavailable,
            Self::UpstreamStatus(_) | Self::UpstreamTransport(_) => ErrorKind::UpstreamError,
            Self::EmptyUpstreamResponse => ErrorKind::EmptyUpstreamResponse,
            Self::MalformedUpstreamPayload => ErrorKind::MalformedUpstreamPayload,
        }
    }

    /// HTTP status the relay answers with for this failure.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::RateLimited => 429,
            ErrorKind::UpstreamUnavailable => 402,
            ErrorKind::Misconfigured
            | ErrorKind::UpstreamError
            | ErrorKind::EmptyUpstreamResponse
            | ErrorKind::MalformedUpstreamPayload => 500,
        }
    }
}

/// Errors surfaced by the relay client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Service temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("{message}")]
    Relay { status: u16, message: String },

    #[error("Failed to reach relay: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected relay response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// True for the advisory kinds where the human is asked to retry later.
    pub fn is_advisory(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServiceUnavailable)
    }
}

/// Errors raised while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Result type for relay client operations.
pub type ClientResult<T> = Result<T, ClientError>;
