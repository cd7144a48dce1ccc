//! Delimited-text input: separator names, header discovery, tolerant reading

use std::fs;
use std::path::Path;

use orgtract::{Error, Result};

/// Named separators accepted by `--sep`.
pub const SEPARATORS: &[(&str, u8)] = &[
    ("SEMICOLON", b';'),
    ("COMMA", b','),
    ("TAB", b'\t'),
    ("PIPE", b'|'),
];

/// Separator used when none is given and nobody can be asked.
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Parse a separator name (case-insensitive) or a literal single-byte character.
pub fn parse_separator(value: &str) -> Result<u8> {
    let named = SEPARATORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value.trim()))
        .map(|(_, byte)| *byte);
    if let Some(byte) = named {
        return Ok(byte);
    }
    match value.as_bytes() {
        [byte] if *byte != b'\n' && *byte != b'\r' && *byte != b'"' => Ok(*byte),
        _ => Err(Error::invalid_input(format!(
            "invalid separator '{}': use SEMICOLON, COMMA, TAB, PIPE or a single character",
            value
        ))),
    }
}

/// A header row plus data rows, every row exactly as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the column named `name`.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name.trim())
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "column '{}' not found (available: {})",
                    name,
                    self.headers.join(", ")
                ))
            })
    }

    /// Cells of column `index`; blank cells are absent.
    pub fn fields(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| {
            row.get(index)
                .map(String::as_str)
                .filter(|cell| !cell.trim().is_empty())
        })
    }
}

/// Read a file as text, replacing invalid UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| Error::invalid_input(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Line index of the header row.
///
/// The first line that either names `source_column` as a cell or splits into
/// more than one cell, and whose first cell is not blank. Falls back to 0.
pub fn discover_header(text: &str, separator: u8, source_column: Option<&str>) -> usize {
    let sep = separator as char;
    for (index, line) in text.lines().enumerate() {
        let cells: Vec<&str> = line.split(sep).collect();
        let names_column = source_column.map_or(false, |col| cells.iter().any(|c| *c == col));
        if (names_column || cells.len() > 1) && !cells[0].trim().is_empty() {
            return index;
        }
    }
    0
}

/// Parse `text` starting at line `start_header`, which holds the column names.
///
/// Short rows are padded with empty cells. Rows wider than the header, and
/// rows the CSV reader rejects, are skipped with a warning.
pub fn parse(text: &str, separator: u8, start_header: usize) -> Result<Table> {
    let body = skip_lines(text, start_header);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        Some(Err(e)) => return Err(Error::parse(format!("unreadable header row: {}", e))),
        None => {
            return Err(Error::invalid_input(format!(
                "no header row at line {}",
                start_header
            )))
        }
    };

    let mut rows = Vec::new();
    for (n, record) in records.enumerate() {
        let line = start_header + n + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping malformed row near line {}: {}", line, e);
                continue;
            }
        };
        if record.len() > headers.len() {
            log::warn!(
                "skipping row near line {}: expected {} fields, saw {}",
                line,
                headers.len(),
                record.len()
            );
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    log::debug!("read {} rows with {} columns", rows.len(), headers.len());
    Ok(Table { headers, rows })
}

fn skip_lines(text: &str, count: usize) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n').take(count) {
        offset += line.len();
    }
    &text[offset..]
}
