/// Errors from the analytics API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API rejected the bearer token. The stored token has been cleared.
    #[error("Unauthorized: session expired or missing")]
    Unauthorized,

    /// The API returned a non-2xx status other than 401.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
