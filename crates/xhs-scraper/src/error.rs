use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("timed out after {timeout_ms}ms waiting for element {selector:?}")]
    ElementTimeout { selector: String, timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store I/O error at {path}: {source}")]
    StoreIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store serialization error: {0}")]
    StoreSerde(#[from] serde_json::Error),

    #[error("detail fetch failed for {url}: {reason}")]
    DetailFetch { url: String, reason: String },
}
