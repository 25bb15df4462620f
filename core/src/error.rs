//! Error types for the todo API client.
//!
//! # Design
//! `ApiError` covers one request/response cycle: the transport failing, the
//! server answering with a non-2xx status, a body that does not decode, or
//! (in strict mode) an envelope with `success: false`. None of these are
//! fatal; the view-model turns them into a short banner string.

use thiserror::Error;

/// Errors produced while building, executing, or parsing an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, TLS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The envelope decoded but reported `success: false`.
    #[error("request rejected by server: {message}")]
    Rejected { message: String },
}

/// Failures of the persistence port.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures of the configuration flow. The `Display` text is what the
/// configuration prompt shows to the user.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API URL must not be empty")]
    EmptyUrl,

    #[error("Failed to connect to API")]
    ConnectionFailed(#[source] ApiError),

    #[error("Invalid API response format")]
    InvalidResponse,

    #[error("Invalid API URL. Please check the URL and try again.")]
    InvalidUrl,

    #[error("{0}")]
    Unreachable(#[source] ApiError),

    #[error("failed to persist configuration: {0}")]
    Storage(#[from] StorageError),
}
