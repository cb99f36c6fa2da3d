//! Error type for backend calls.

use xccurate_overlay::OverlayError;

/// Errors returned by [`Client`](crate::Client).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("could not reach backend at {url}: {source}")]
    Unavailable {
        /// Endpoint URL that was requested.
        url: String,
        /// Transport error from `reqwest`.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// The body's `error` field, or a per-endpoint fallback.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("invalid response from /{endpoint}: {source}")]
    InvalidResponse {
        /// Endpoint name without the leading slash.
        endpoint: &'static str,
        /// JSON decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A file was rejected before any request was sent.
    #[error("invalid upload {file_name:?}: {reason}")]
    InvalidUpload {
        /// Name of the rejected file.
        file_name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The segmentation response was well-formed but unusable.
    #[error(transparent)]
    Result(#[from] OverlayError),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
