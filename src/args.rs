use author_notes::CollectorConfig;
use author_notes::store::StoreFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "collector")]
#[command(about = "Collects author commentary blocks from sequential chapter pages")]
#[command(version)]
pub struct Args {
    /// Record store to write (.json, .jsonl or .csv)
    #[arg(short, long, default_value = "results.json")]
    pub output: PathBuf,

    /// Store format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<StoreFormat>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory URL the chapter identifiers are joined onto
    #[arg(long)]
    pub base_url: Option<String>,

    /// First chapter number
    #[arg(long)]
    pub first: Option<u32>,

    /// Number of chapters to visit
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Base delay between requests in seconds
    #[arg(short, long)]
    pub delay: Option<f64>,

    /// Use the base delay as-is instead of jittering it
    #[arg(long)]
    pub no_jitter: bool,

    /// User-Agent header sent with each request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply(&self, mut config: CollectorConfig) -> CollectorConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(first) = self.first {
            config.first_chapter = first;
        }
        if let Some(count) = self.count {
            config.chapter_count = count;
        }
        if let Some(delay) = self.delay {
            config.download_delay_secs = delay;
        }
        if self.no_jitter {
            config.randomize_delay = false;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        config
    }

    pub fn store_format(&self) -> StoreFormat {
        self.format
            .unwrap_or_else(|| StoreFormat::from_path(&self.output))
    }
}
