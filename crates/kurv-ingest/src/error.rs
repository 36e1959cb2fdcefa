use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {retailer} (retry after {retry_after_secs}s)")]
    RateLimited {
        retailer: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("retailer {retailer} has no base_url configured")]
    MissingBaseUrl { retailer: String },

    #[error("invalid base URL \"{base_url}\" for {retailer}: {reason}")]
    InvalidBaseUrl {
        retailer: String,
        base_url: String,
        reason: String,
    },
}
