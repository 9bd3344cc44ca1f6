use thiserror::Error;

/// Errors returned by the Modash client.
#[derive(Debug, Error)]
pub enum ModashError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Modash (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("content not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body carried a truthy `error` field.
    #[error("Modash API error: {0}")]
    Provider(String),

    #[error("invalid Modash base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("MODASH_API_KEY is not set")]
    MissingApiKey,
}
