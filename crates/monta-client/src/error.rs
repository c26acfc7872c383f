use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure: connect, TLS, or the configured timeout.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The API answered with a non-success status. The body is deliberately
    /// not attached.
    #[error("api error: {method} {path} returned {status}")]
    Api {
        method: &'static str,
        path: String,
        status: u16,
    },

    #[error("malformed response body for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
