pub mod html;
pub mod text;


use crate::config::{CollectorConfig, ConfigError, compile_selector};
use scraper::Selector;

/// One matched commentary block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Whitespace-normalized text content
    pub text: String,
    /// Serialized outer markup
    pub html: String,
    /// `href` targets inside the block
    pub links: Vec<String>,
}

/// Result of parsing a chapter page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtract {
    /// Page-level date text, shared by every region on the page
    pub date: String,
    /// Matched regions in document order
    pub regions: Vec<Region>,
}

/// Compiled selectors for chapter pages
#[derive(Debug, Clone)]
pub struct Extractor {
    region: Selector,
    date: Selector,
    links: Selector,
    date_prefix: String,
}

impl Extractor {
    /// Compile the extractor from raw selector strings
    pub fn new(region: &str, date: &str, date_prefix: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            region: compile_selector(region)?,
            date: compile_selector(date)?,
            links: compile_selector("a[href]")?,
            date_prefix: date_prefix.to_string(),
        })
    }

    pub fn from_config(config: &CollectorConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.region_selector,
            &config.date_selector,
            &config.date_prefix,
        )
    }

    /// Parse a full chapter page
    pub fn extract(&self, html: &str) -> PageExtract {
        html::extract(html, &self.region, &self.date, &self.links, &self.date_prefix)
    }
}
