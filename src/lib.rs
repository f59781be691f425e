// Re-export modules
pub mod config;
pub mod crawlers;
pub mod diagnostics;
pub mod filter;
pub mod parsers;
pub mod politeness;
pub mod report;
pub mod results;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::CollectorConfig;
pub use results::{PageRecord, RecordStatus, RunSummary};

use crawlers::{Collection, FetchError, HttpFetcher, PageFetcher};
use diagnostics::{DiagnosticSink, LogSink};
use std::sync::Arc;
use thiserror::Error;

/// Errors that stop a collection before the first request
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
}

/// Builder for a chapter collection run
pub struct Collector {
    config: CollectorConfig,
    sink: Arc<dyn DiagnosticSink>,
    fetcher: Option<Arc<dyn PageFetcher>>,
}

impl Collector {
    /// Create a new builder with the given configuration
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            sink: Arc::new(LogSink),
            fetcher: None,
        }
    }

    /// Set the number of chapters to visit
    pub fn with_chapter_count(mut self, chapter_count: u32) -> Self {
        self.config.chapter_count = chapter_count;
        self
    }

    /// Set the base delay (seconds) and whether it is jittered
    pub fn with_delay(mut self, seconds: f64, randomize: bool) -> Self {
        self.config.download_delay_secs = seconds;
        self.config.randomize_delay = randomize;
        self
    }

    /// Route per-page diagnostics somewhere other than the logger
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use a custom transport instead of the default HTTP client
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Start the crawl and get a receiver for records
    pub fn generate(self) -> Result<Collection, CollectError> {
        let fetcher: Arc<dyn PageFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::from_config(&self.config)?),
        };

        Ok(crawlers::web::start(&self.config, fetcher, self.sink)?)
    }
}
