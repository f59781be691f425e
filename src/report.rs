//! Renders collected records into one standalone HTML page.
//!
//! The commentary markup of each record is embedded as-is. It comes from a
//! third-party site, so the page is meant to be opened locally; run it through
//! an allow-list sanitizer before serving it anywhere.

use crate::filter;
use crate::results::PageRecord;
use crate::store::{self, StoreError};
use crate::utils::{IDENTIFIER_PREFIX, chapter_label};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output file used when the caller names none
pub const DEFAULT_OUTPUT: &str = "kanzenshuu_wj_toriyama.html";

/// Shown in place of a missing or empty date
pub const UNKNOWN_DATE: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Error writing HTML file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a successful report run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Records in the store
    pub total: usize,
    /// Records rendered into the page
    pub included: usize,
    pub output: PathBuf,
}

/// Reads `store_path`, keeps the reportable records and writes the page to
/// `output`, replacing any existing file. Nothing is written on failure.
pub fn create_report(store_path: &Path, output: &Path) -> Result<ReportOutcome, ReportError> {
    let records = store::read_records(store_path)?;
    let selected = filter::reportable(&records);

    ::log::info!(
        "Found {} entries with commentary out of {} total entries",
        selected.len(),
        records.len()
    );

    let source_name = store_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| store_path.display().to_string());

    let page = render_report(&selected, &source_name);

    fs::write(output, page).map_err(|source| ReportError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(ReportOutcome {
        total: records.len(),
        included: selected.len(),
        output: output.to_path_buf(),
    })
}

/// Builds the whole document for already-filtered records
pub fn render_report(records: &[&PageRecord], source_name: &str) -> String {
    let mut page = String::with_capacity(8 * 1024 + records.len() * 2 * 1024);

    page.push_str(HEAD);
    page.push_str(&format!(
        r#"<body>
    <div class="header">
        <h1>Kanzenshuu Dragon Ball Manga</h1>
        <h2>Toriyama's Weekly Jump Comments</h2>
        <div class="stats">
            <p>Found <strong>{count}</strong> chapters with Toriyama comments</p>
            <p>Generated from: {source}</p>
        </div>
    </div>

    <div class="content">
"#,
        count = records.len(),
        source = escape(source_name),
    ));

    for (index, record) in records.iter().enumerate() {
        render_section(&mut page, index + 1, record);
    }

    page.push_str(TAIL);
    page
}

/// Appends one `section-N` block
fn render_section(page: &mut String, number: usize, record: &PageRecord) {
    let identifier = if record.identifier.is_empty() {
        "Unknown"
    } else {
        record.identifier.as_str()
    };
    let label = chapter_label(identifier, IDENTIFIER_PREFIX);

    let date = record
        .publication_date
        .as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .unwrap_or(UNKNOWN_DATE);

    let url = if record.source_url.is_empty() {
        "#"
    } else {
        record.source_url.as_str()
    };

    page.push_str(&format!(
        r#"
        <div class="chapter-entry" id="section-{number}">
            <div class="chapter-header">
                <h3 class="chapter-title">Chapter {label}</h3>
                <p class="chapter-meta">
                    <strong>Date:</strong> {date} |
                    <strong>Source:</strong> <a href="{url}" target="_blank">{url}</a>
                </p>
            </div>

            <div class="comment-content">
                {content}
            </div>
        </div>
"#,
        label = escape(&label),
        date = escape(date),
        url = escape(url),
        content = record.content_html.as_deref().unwrap_or_default(),
    ));
}

/// Escapes text for use in element content and quoted attributes
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Kanzenshuu Dragon Ball Manga - Toriyama Comments</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
            line-height: 1.6;
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            padding: 20px;
            background-color: #fff;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
        }
        .header h1 { color: #333; margin-bottom: 10px; }
        .stats { color: #666; font-size: 0.9em; }
        .chapter-entry {
            background-color: #fff;
            margin-bottom: 20px;
            padding: 20px;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
            border-left: 4px solid #ff6b35;
        }
        .chapter-header {
            background-color: #f8f9fa;
            padding: 10px 15px;
            margin: -20px -20px 15px -20px;
            border-radius: 10px 10px 0 0;
            border-bottom: 1px solid #e9ecef;
        }
        .chapter-title { font-size: 1.2em; font-weight: bold; color: #2c3e50; margin: 0; }
        .chapter-meta { font-size: 0.9em; color: #6c757d; margin: 5px 0 0 0; }
        .chapter-meta a { color: #007bff; text-decoration: none; }
        .chapter-meta a:hover { text-decoration: underline; }
        .comment-content { margin-top: 15px; }
        .wj_toriyama {
            background-color: #fff3cd;
            border: 1px solid #ffeaa7;
            border-radius: 5px;
            padding: 15px;
            margin: 10px 0;
            font-style: italic;
        }
        .back-to-top {
            display: none;
            position: fixed;
            bottom: 20px;
            right: 20px;
            background-color: #ff6b35;
            color: white;
            border: none;
            border-radius: 50%;
            width: 50px;
            height: 50px;
            font-size: 18px;
            cursor: pointer;
            box-shadow: 0 2px 10px rgba(0, 0, 0, 0.3);
        }
        .back-to-top:hover { background-color: #e55a2b; }
        @media (max-width: 768px) {
            body { padding: 10px; }
            .chapter-entry { padding: 15px; }
            .chapter-header { margin: -15px -15px 15px -15px; padding: 10px; }
        }
    </style>
</head>
"#;

const TAIL: &str = r#"
    </div>

    <button class="back-to-top" onclick="window.scrollTo({top: 0, behavior: 'smooth'})" title="Back to top">&uarr;</button>

    <script>
        window.addEventListener('scroll', function () {
            var button = document.querySelector('.back-to-top');
            button.style.display = window.pageYOffset > 300 ? 'block' : 'none';
        });
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::RecordStatus;

    fn record(id: &str, status: RecordStatus, html: Option<&str>) -> PageRecord {
        PageRecord {
            identifier: id.to_string(),
            source_url: format!("https://www.kanzenshuu.com/manga/db/{id}"),
            publication_date: Some("November 20, 1984".to_string()),
            content_text: html.map(|_| "comment".to_string()),
            content_html: html.map(str::to_string),
            embedded_links: Vec::new(),
            status,
        }
    }

    fn write_store(dir: &Path, records: &[PageRecord]) -> PathBuf {
        let path = dir.join("results.json");
        fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_three_of_five_records_rendered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = write_store(
            dir.path(),
            &[
                record("chp-001", RecordStatus::Found, Some("<div class=\"wj_toriyama\">one</div>")),
                record("chp-002", RecordStatus::NotFound, None),
                record("chp-003", RecordStatus::Found, Some("<div class=\"wj_toriyama\">three</div>")),
                record("chp-004", RecordStatus::Found, Some("")),
                record("chp-005", RecordStatus::Found, Some("<div class=\"wj_toriyama\">five</div>")),
            ],
        );
        let output = dir.path().join("report.html");

        let outcome = create_report(&store, &output).unwrap();
        assert_eq!(outcome.total, 5);
        assert_eq!(outcome.included, 3);
        assert_eq!(outcome.output, output);

        let page = fs::read_to_string(&output).unwrap();
        assert_eq!(page.matches(r#"class="chapter-entry""#).count(), 3);
        assert!(page.contains("Found <strong>3</strong> chapters"));
        assert!(page.contains("Generated from: results.json"));

        let one = page.find(">one</div>").unwrap();
        let three = page.find(">three</div>").unwrap();
        let five = page.find(">five</div>").unwrap();
        assert!(one < three && three < five);

        assert!(page.contains(r#"id="section-1""#));
        assert!(page.contains(r#"id="section-3""#));
        assert!(!page.contains(r#"id="section-4""#));
        assert!(page.contains("Chapter 5</h3>"));
        assert!(!page.contains("Chapter 2</h3>"));
        assert!(!page.contains("Chapter 4</h3>"));
    }

    #[test]
    fn test_section_contents() {
        let mut with_date = record("chp-007", RecordStatus::Found, Some("<div><b>raw</b> &amp; kept</div>"));
        with_date.publication_date = Some("1985".to_string());
        let mut no_date = record("chp-123", RecordStatus::Found, Some("<p>x</p>"));
        no_date.publication_date = None;
        let mut empty_date = record("chp-124", RecordStatus::Found, Some("<p>y</p>"));
        empty_date.publication_date = Some(String::new());

        let page = render_report(&[&with_date, &no_date, &empty_date], "results.json");

        assert!(page.contains("Chapter 7</h3>"));
        assert!(page.contains("Chapter 123</h3>"));
        assert!(page.contains("<strong>Date:</strong> 1985 |"));
        assert_eq!(page.matches("<strong>Date:</strong> Unknown |").count(), 2);
        assert!(page.contains(
            r#"<a href="https://www.kanzenshuu.com/manga/db/chp-007" target="_blank">https://www.kanzenshuu.com/manga/db/chp-007</a>"#
        ));
        assert!(page.contains("<div><b>raw</b> &amp; kept</div>"));
    }

    #[test]
    fn test_empty_report_is_still_a_page() {
        let page = render_report(&[], "results.json");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Found <strong>0</strong> chapters"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_text_fields_are_escaped() {
        let mut odd = record("chp-001", RecordStatus::Found, Some("<p>ok</p>"));
        odd.publication_date = Some("<script>".to_string());
        let page = render_report(&[&odd], "a&b.json");
        assert!(page.contains("<strong>Date:</strong> &lt;script&gt; |"));
        assert!(page.contains("Generated from: a&amp;b.json"));
    }

    #[test]
    fn test_missing_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.html");

        let err = create_report(&dir.path().join("nope.json"), &output).unwrap_err();
        assert!(matches!(err, ReportError::Store(StoreError::NotFound(_))));
        assert!(err.to_string().contains("not found"));
        assert!(!output.exists());
    }

    #[test]
    fn test_malformed_store_is_reported_differently() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("results.json");
        fs::write(&store, "{not json").unwrap();
        let output = dir.path().join("report.html");

        let err = create_report(&store, &output).unwrap_err();
        assert!(matches!(err, ReportError::Store(StoreError::Malformed { .. })));
        assert!(err.to_string().starts_with("Invalid JSON file"));
        assert!(!output.exists());
    }

    #[test]
    fn test_unrecognized_status_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("results.json");
        fs::write(
            &store,
            r#"[
                {"chapter_id": "chp-001", "status": "error", "wj_toriyama_html": "<p>bad</p>"},
                {"chapter_id": "chp-002", "status": "found", "wj_toriyama_html": "<p>good</p>"}
            ]"#,
        )
        .unwrap();
        let output = dir.path().join("report.html");

        let outcome = create_report(&store, &output).unwrap();
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.included, 1);

        let page = fs::read_to_string(&output).unwrap();
        assert!(page.contains("<p>good</p>"));
        assert!(!page.contains("<p>bad</p>"));
    }

    #[test]
    fn test_existing_output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = write_store(
            dir.path(),
            &[record("chp-010", RecordStatus::Found, Some("<p>new</p>"))],
        );
        let output = dir.path().join("report.html");
        fs::write(&output, "stale").unwrap();

        create_report(&store, &output).unwrap();
        let page = fs::read_to_string(&output).unwrap();
        assert!(!page.contains("stale"));
        assert!(page.contains("<p>new</p>"));
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = write_store(dir.path(), &[]);
        let output = dir.path().join("missing-dir").join("report.html");

        let err = create_report(&store, &output).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }
}
