use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Why a chapter page could not be loaded
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("Status: {status}")]
    Status { status: u16 },

    /// Connection, TLS, timeout or body decoding failure
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Transport used by the collector to load one page at a time
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body; anything other than a 2xx response is an error
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}
