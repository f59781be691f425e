use crate::config::{CollectorConfig, ConfigError};
use crate::crawlers::crawler::{FetchError, PageFetcher};
use crate::diagnostics::DiagnosticSink;
use crate::parsers::{Extractor, PageExtract};
use crate::politeness::Politeness;
use crate::results::{PageRecord, RunSummary};
use crate::utils::{chapter_identifier, chapter_url};
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Buffered records between the crawl task and the store writer
const RECORD_BUFFER: usize = 64;

/// HTTP transport backed by a reqwest client
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Client that sends `user_agent` on every request
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        Self::with_builder(reqwest::Client::builder(), user_agent, timeout)
    }

    fn with_builder(
        builder: reqwest::ClientBuilder,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = builder.user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(Box::new(e)))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &CollectorConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.user_agent,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Transport(Box::new(e)))
    }
}

/// A running collection: records arrive in visitation order, the summary
/// resolves once the last chapter has been handled
pub struct Collection {
    pub records: mpsc::Receiver<PageRecord>,
    pub summary: JoinHandle<RunSummary>,
}

/// Starts the sequential chapter crawl on the current Tokio runtime.
///
/// Exactly one request is in flight at any time and every request is
/// preceded by a delay from the configured politeness policy. Pages that
/// fail to load are reported to `sink` and produce no record.
pub fn start(
    config: &CollectorConfig,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<Collection, ConfigError> {
    config.validate()?;

    let plan = chapter_plan(config)?;
    let extractor = Extractor::from_config(config)?;
    let politeness = Politeness::from_secs_f64(config.download_delay_secs, config.randomize_delay);

    ::log::info!(
        "Starting collector for {} chapters under {}",
        plan.len(),
        config.base_url
    );

    let (record_tx, record_rx) = mpsc::channel::<PageRecord>(RECORD_BUFFER);

    let summary = tokio::spawn(async move {
        crawl(plan, extractor, politeness, fetcher, sink, record_tx).await
    });

    Ok(Collection {
        records: record_rx,
        summary,
    })
}

/// Runs a whole collection and gathers every record in memory
pub async fn collect_all(
    config: &CollectorConfig,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<(Vec<PageRecord>, RunSummary), ConfigError> {
    let Collection {
        mut records,
        summary,
    } = start(config, fetcher, sink)?;

    let mut collected = Vec::new();
    while let Some(record) = records.recv().await {
        collected.push(record);
    }

    let summary = summary.await.unwrap_or_else(|e| {
        ::log::error!("Collector task ended abnormally: {}", e);
        RunSummary::default()
    });

    Ok((collected, summary))
}

/// Identifier and URL for every chapter in the configured range
fn chapter_plan(config: &CollectorConfig) -> Result<Vec<(String, Url)>, ConfigError> {
    let base = config.base()?;

    config
        .chapters()
        .map(|number| {
            let identifier =
                chapter_identifier(&config.identifier_prefix, number, config.pad_width);
            let url = chapter_url(&base, &identifier).map_err(|e| ConfigError::BaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
            Ok((identifier, url))
        })
        .collect()
}

/// Visits every chapter in order, one request at a time
async fn crawl(
    plan: Vec<(String, Url)>,
    extractor: Extractor,
    politeness: Politeness,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn DiagnosticSink>,
    record_tx: mpsc::Sender<PageRecord>,
) -> RunSummary {
    let mut rng = StdRng::from_entropy();
    let mut summary = RunSummary::default();

    for (identifier, url) in plan {
        let delay = politeness.next_delay(&mut rng);
        if !delay.is_zero() {
            ::log::debug!("Waiting {:.2}s before {}", delay.as_secs_f64(), url);
            tokio::time::sleep(delay).await;
        }

        summary.visited += 1;

        let body = match fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                sink.warn(&format!("Failed to load {} - {}", url, e));
                summary.fetch_failed += 1;
                continue;
            }
        };

        let page = extractor.extract(&body);
        ::log::debug!("Chapter date for {}: {:?}", identifier, page.date);

        let records = page_records(&identifier, &url, page);
        match records.first() {
            Some(record) if record.content_html.is_none() => {
                sink.info(&format!("No commentary block found in {}", identifier));
                summary.not_found += 1;
            }
            _ => summary.found += records.len(),
        }

        for record in records {
            if record_tx.send(record).await.is_err() {
                ::log::warn!("Record receiver dropped, stopping after {}", identifier);
                return summary;
            }
        }
    }

    sink.info(&format!("Collection complete: {}", summary));
    summary
}

/// Records for one successfully fetched page: one per matched region, or a
/// single `not_found` record when nothing matched
pub fn page_records(identifier: &str, url: &Url, page: PageExtract) -> Vec<PageRecord> {
    if page.regions.is_empty() {
        return vec![PageRecord::not_found(
            identifier.to_string(),
            url.to_string(),
        )];
    }

    let PageExtract { date, regions } = page;

    regions
        .into_iter()
        .map(|region| {
            PageRecord::found(
                identifier.to_string(),
                url.to_string(),
                date.clone(),
                region.text,
                region.html,
                region.links,
            )
        })
        .collect()
}
