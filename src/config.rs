use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Errors raised while loading or validating collector configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("chapter_count must be at least 1")]
    EmptyRange,

    #[error("download delay must be a finite, non-negative number of seconds (got {0})")]
    Delay(f64),
}

/// Configuration for the chapter collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Directory URL every chapter identifier is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// First chapter number to visit
    #[serde(default = "default_first_chapter")]
    pub first_chapter: u32,

    /// Number of chapters to visit, starting at `first_chapter`
    #[serde(default = "default_chapter_count")]
    pub chapter_count: u32,

    /// Literal prefix of every chapter identifier
    #[serde(default = "default_identifier_prefix")]
    pub identifier_prefix: String,

    /// Zero-padded width of the chapter number
    #[serde(default = "default_pad_width")]
    pub pad_width: usize,

    /// Base delay before each request, in seconds
    #[serde(default = "default_download_delay_secs")]
    pub download_delay_secs: f64,

    /// Draw each delay from 0.5x..1.5x of the base delay
    #[serde(default = "default_randomize_delay")]
    pub randomize_delay: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// CSS selector for the commentary block(s)
    #[serde(default = "default_region_selector")]
    pub region_selector: String,

    /// CSS selector for the page-level date row
    #[serde(default = "default_date_selector")]
    pub date_selector: String,

    /// Literal token stripped from the date text
    #[serde(default = "default_date_prefix")]
    pub date_prefix: String,

    /// Optional per-request timeout handed to the HTTP client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://www.kanzenshuu.com/manga/db/".to_string()
}

fn default_first_chapter() -> u32 {
    1
}

fn default_chapter_count() -> u32 {
    591
}

fn default_identifier_prefix() -> String {
    crate::utils::IDENTIFIER_PREFIX.to_string()
}

fn default_pad_width() -> usize {
    3
}

fn default_download_delay_secs() -> f64 {
    1.0
}

fn default_randomize_delay() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_region_selector() -> String {
    "div.wj_toriyama".to_string()
}

fn default_date_selector() -> String {
    ".odd".to_string()
}

fn default_date_prefix() -> String {
    "Premiered:".to_string()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            first_chapter: default_first_chapter(),
            chapter_count: default_chapter_count(),
            identifier_prefix: default_identifier_prefix(),
            pad_width: default_pad_width(),
            download_delay_secs: default_download_delay_secs(),
            randomize_delay: default_randomize_delay(),
            user_agent: default_user_agent(),
            region_selector: default_region_selector(),
            date_selector: default_date_selector(),
            date_prefix: default_date_prefix(),
            request_timeout_secs: None,
        }
    }
}

impl CollectorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Parsed base URL
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Chapter numbers in visitation order
    pub fn chapters(&self) -> std::ops::Range<u32> {
        self.first_chapter..self.first_chapter.saturating_add(self.chapter_count)
    }

    /// Checks everything that would otherwise fail halfway through a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;
        compile_selector(&self.region_selector)?;
        compile_selector(&self.date_selector)?;

        if self.chapter_count == 0 {
            return Err(ConfigError::EmptyRange);
        }
        if !self.download_delay_secs.is_finite() || self.download_delay_secs < 0.0 {
            return Err(ConfigError::Delay(self.download_delay_secs));
        }
        Ok(())
    }
}

/// Compile a CSS selector, keeping the parser's message
pub fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_archive() {
        let config = CollectorConfig::default();
        assert_eq!(config.chapter_count, 591);
        assert_eq!(config.chapters(), 1..592);
        assert_eq!(config.identifier_prefix, "chp-");
        assert_eq!(config.download_delay_secs, 1.0);
        assert!(config.randomize_delay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = CollectorConfig::from_json(r#"{"chapter_count": 10, "download_delay_secs": 0.0}"#)
            .unwrap();
        assert_eq!(config.chapter_count, 10);
        assert_eq!(config.download_delay_secs, 0.0);
        assert_eq!(config.region_selector, "div.wj_toriyama");
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = CollectorConfig {
            chapter_count: 0,
            ..CollectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRange)));

        let config = CollectorConfig {
            base_url: "not a url".to_string(),
            ..CollectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BaseUrl { .. })));

        let config = CollectorConfig {
            region_selector: "div[".to_string(),
            ..CollectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Selector { .. })));

        let config = CollectorConfig {
            download_delay_secs: -1.0,
            ..CollectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Delay(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.json");
        std::fs::write(&path, r#"{"base_url": "http://localhost:8080/db/", "first_chapter": 5}"#)
            .unwrap();

        let config = CollectorConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/db/");
        assert_eq!(config.chapters(), 5..596);

        let missing = CollectorConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
