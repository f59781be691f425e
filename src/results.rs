use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a chapter page carried a commentary block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Found,
    #[default]
    NotFound,
    /// Any status this crate does not write; never reported
    #[serde(other)]
    Other,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Found => f.write_str("found"),
            RecordStatus::NotFound => f.write_str("not_found"),
            RecordStatus::Other => f.write_str("other"),
        }
    }
}

/// One extracted commentary block (or the absence of one) for a chapter page
///
/// Serialized field names follow the record feed consumed by the reporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Chapter identifier, e.g. `chp-001`
    #[serde(rename = "chapter_id", default)]
    pub identifier: String,

    /// URL that was fetched
    #[serde(rename = "url", default)]
    pub source_url: String,

    /// Raw date text from the page, prefix removed
    #[serde(
        rename = "chapter_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_date: Option<String>,

    /// Whitespace-normalized text of the block
    #[serde(rename = "wj_toriyama_text", default)]
    pub content_text: Option<String>,

    /// Outer HTML of the block, untouched
    #[serde(rename = "wj_toriyama_html", default)]
    pub content_html: Option<String>,

    /// Every `href` inside the block, in document order
    #[serde(rename = "links_in_div", default)]
    pub embedded_links: Vec<String>,

    #[serde(default)]
    pub status: RecordStatus,
}

impl PageRecord {
    /// Record for one matched region on a page
    pub fn found(
        identifier: String,
        source_url: String,
        publication_date: String,
        content_text: String,
        content_html: String,
        embedded_links: Vec<String>,
    ) -> Self {
        Self {
            identifier,
            source_url,
            publication_date: Some(publication_date),
            content_text: Some(content_text),
            content_html: Some(content_html),
            embedded_links,
            status: RecordStatus::Found,
        }
    }

    /// Record for a page that loaded but had no matching region
    pub fn not_found(identifier: String, source_url: String) -> Self {
        Self {
            identifier,
            source_url,
            publication_date: None,
            content_text: None,
            content_html: None,
            embedded_links: Vec::new(),
            status: RecordStatus::NotFound,
        }
    }

    /// Non-empty commentary markup, if any
    pub fn html(&self) -> Option<&str> {
        self.content_html.as_deref().filter(|html| !html.is_empty())
    }
}

/// Counters accumulated over one collector run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Chapters attempted
    pub visited: usize,
    /// `found` records emitted (one per matched region)
    pub found: usize,
    /// `not_found` records emitted
    pub not_found: usize,
    /// Chapters dropped because the fetch failed
    pub fetch_failed: usize,
}

impl RunSummary {
    pub fn records(&self) -> usize {
        self.found + self.not_found
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited {} chapters: {} found, {} not found, {} failed to fetch",
            self.visited, self.found, self.not_found, self.fetch_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_record_shape() {
        let record = PageRecord::not_found(
            "chp-002".to_string(),
            "https://example.org/db/chp-002".to_string(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "chapter_id": "chp-002",
                "url": "https://example.org/db/chp-002",
                "wj_toriyama_text": null,
                "wj_toriyama_html": null,
                "links_in_div": [],
                "status": "not_found"
            })
        );
    }

    #[test]
    fn test_found_record_keeps_markup() {
        let record = PageRecord::found(
            "chp-001".to_string(),
            "https://example.org/db/chp-001".to_string(),
            "November 20, 1984".to_string(),
            "Hello".to_string(),
            "<div class=\"wj_toriyama\">Hello</div>".to_string(),
            vec![],
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["chapter_date"], "November 20, 1984");
        assert_eq!(value["wj_toriyama_html"], "<div class=\"wj_toriyama\">Hello</div>");
        assert_eq!(record.html(), Some("<div class=\"wj_toriyama\">Hello</div>"));
    }

    #[test]
    fn test_lenient_deserialization() {
        let record: PageRecord = serde_json::from_str(r#"{"chapter_id": "chp-009"}"#).unwrap();
        assert_eq!(record.identifier, "chp-009");
        assert_eq!(record.status, RecordStatus::NotFound);
        assert_eq!(record.html(), None);

        let record: PageRecord =
            serde_json::from_str(r#"{"status": "found", "wj_toriyama_html": ""}"#).unwrap();
        assert_eq!(record.status, RecordStatus::Found);
        assert_eq!(record.html(), None);
    }

    #[test]
    fn test_unrecognized_status_is_kept_apart() {
        let record: PageRecord = serde_json::from_str(
            r#"{"chapter_id": "chp-010", "status": "error", "wj_toriyama_html": "<p>x</p>"}"#,
        )
        .unwrap();
        assert_eq!(record.status, RecordStatus::Other);
        assert_eq!(record.identifier, "chp-010");
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            visited: 4,
            found: 2,
            not_found: 1,
            fetch_failed: 1,
        };
        assert_eq!(summary.records(), 3);
        assert_eq!(
            summary.to_string(),
            "visited 4 chapters: 2 found, 1 not found, 1 failed to fetch"
        );
    }
}
