use crate::results::PageRecord;
use clap::ValueEnum;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column order of delimited stores
const CSV_COLUMNS: [&str; 7] = [
    "chapter_id",
    "url",
    "chapter_date",
    "wj_toriyama_text",
    "wj_toriyama_html",
    "links_in_div",
    "status",
];

/// On-disk layout of a record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreFormat {
    /// A single JSON array
    Json,
    /// One JSON object per line
    #[value(name = "jsonl")]
    JsonLines,
    /// Comma-separated table with a header row
    Csv,
}

impl StoreFormat {
    /// Guess the format from a file extension, defaulting to a JSON array
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => StoreFormat::JsonLines,
            Some("csv") => StoreFormat::Csv,
            _ => StoreFormat::Json,
        }
    }
}

/// Errors raised while reading or writing a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid JSON file - {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Reading {} stores is not supported", .0.display())]
    Unsupported(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Appends records to a store in the order they are written
pub struct RecordWriter<W: Write> {
    out: W,
    format: StoreFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Starts a store; JSON arrays and CSV headers are opened immediately
    pub fn new(mut out: W, format: StoreFormat) -> io::Result<Self> {
        match format {
            StoreFormat::Json => out.write_all(b"[")?,
            StoreFormat::JsonLines => {}
            StoreFormat::Csv => {
                let header = CSV_COLUMNS.map(str::to_string);
                write_csv_row(&mut out, &header)?;
            }
        }

        Ok(Self {
            out,
            format,
            written: 0,
        })
    }

    pub fn write(&mut self, record: &PageRecord) -> io::Result<()> {
        match self.format {
            StoreFormat::Json => {
                if self.written > 0 {
                    self.out.write_all(b",")?;
                }
                self.out.write_all(b"\n")?;
                serde_json::to_writer(&mut self.out, record)?;
            }
            StoreFormat::JsonLines => {
                serde_json::to_writer(&mut self.out, record)?;
                self.out.write_all(b"\n")?;
            }
            StoreFormat::Csv => write_csv_row(&mut self.out, &csv_fields(record))?,
        }
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Closes the store and hands back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == StoreFormat::Json {
            self.out.write_all(b"\n]\n")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Creates (or truncates) `path` and starts a store on it
pub fn create(
    path: &Path,
    format: StoreFormat,
) -> Result<RecordWriter<io::BufWriter<fs::File>>, StoreError> {
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::create(path).map_err(io_err)?;
    RecordWriter::new(io::BufWriter::new(file), format).map_err(io_err)
}

/// Reads every record of a JSON or JSON-lines store, in file order
pub fn read_records(path: &Path) -> Result<Vec<PageRecord>, StoreError> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let malformed = |source: serde_json::Error| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    match StoreFormat::from_path(path) {
        StoreFormat::Csv => Err(StoreError::Unsupported(path.to_path_buf())),
        StoreFormat::JsonLines => contents
            .split(|&b| b == b'\n')
            .filter(|line| !line.trim_ascii().is_empty())
            .map(|line| serde_json::from_slice::<PageRecord>(line).map_err(malformed))
            .collect(),
        StoreFormat::Json => {
            serde_json::from_slice::<Vec<PageRecord>>(&contents).map_err(malformed)
        }
    }
}

fn csv_fields(record: &PageRecord) -> [String; 7] {
    [
        record.identifier.clone(),
        record.source_url.clone(),
        record.publication_date.clone().unwrap_or_default(),
        record.content_text.clone().unwrap_or_default(),
        record.content_html.clone().unwrap_or_default(),
        record.embedded_links.join(","),
        record.status.to_string(),
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row, quoting where needed
fn write_csv_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}
