//! Configuration shared by the CLI and the concrete sources.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipConfig {
    /// Let sources run a full scan when asked for a row count they do not know.
    pub allow_expensive_row_count: bool,

    /// Cursor-set size requested from sources. The zip view ignores it and
    /// always yields one cursor.
    pub parallelism: usize,

    /// Field delimiter for CSV sources.
    pub csv_delimiter: u8,

    /// Whether CSV sources start with a header row.
    pub csv_has_headers: bool,

    /// Rows sampled when inferring a CSV schema.
    pub infer_rows: usize,
}

impl Default for ZipConfig {
    fn default() -> Self {
        Self {
            allow_expensive_row_count: false,
            parallelism: 1,
            csv_delimiter: b',',
            csv_has_headers: true,
            infer_rows: 100,
        }
    }
}

/// Snapshot of the CSV-related settings, consumed by `zipview-io`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    pub infer_rows: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        ZipConfig::default().csv_options()
    }
}

impl ZipConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `ZIPVIEW_ALLOW_EXPENSIVE_ROW_COUNT`: `true`/`false`/`1`/`0`
    /// - `ZIPVIEW_PARALLELISM`: requested cursor-set size
    /// - `ZIPVIEW_CSV_DELIMITER`: single-byte delimiter (`\t` accepted)
    /// - `ZIPVIEW_CSV_HAS_HEADERS`: `true`/`false`/`1`/`0`
    /// - `ZIPVIEW_INFER_ROWS`: rows sampled for schema inference
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("ZIPVIEW_ALLOW_EXPENSIVE_ROW_COUNT") {
            if let Some(v) = parse_bool(&s) {
                cfg.allow_expensive_row_count = v;
            }
        }

        if let Ok(s) = std::env::var("ZIPVIEW_PARALLELISM") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.parallelism = v.max(1);
            }
        }

        if let Ok(s) = std::env::var("ZIPVIEW_CSV_DELIMITER") {
            if let Some(v) = parse_delimiter(&s) {
                cfg.csv_delimiter = v;
            }
        }

        if let Ok(s) = std::env::var("ZIPVIEW_CSV_HAS_HEADERS") {
            if let Some(v) = parse_bool(&s) {
                cfg.csv_has_headers = v;
            }
        }

        if let Ok(s) = std::env::var("ZIPVIEW_INFER_ROWS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.infer_rows = v;
            }
        }

        cfg
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            delimiter: self.csv_delimiter,
            has_headers: self.csv_has_headers,
            infer_rows: self.infer_rows,
        }
    }
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accepts a single ASCII byte or the escape `\t`.
pub fn parse_delimiter(s: &str) -> Option<u8> {
    match s {
        "\\t" => Some(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => s.bytes().next(),
        _ => None,
    }
}
