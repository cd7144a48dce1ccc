//! Output formatting and the resolved CSV writer

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use is_terminal::IsTerminal;
use orgtract::{Record, ResolveStats};

use crate::table::Table;

/// Name of the column `--audit` appends.
pub const AUDIT_COLUMN: &str = "RESOLUTION_STATE";

/// Wrap `text` in an ANSI color when stdout is a terminal.
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Format error message for display
pub fn format_error(operation: &str, details: &str) -> String {
    format!("{} - {}", operation, details)
}

/// Default output column: the source column uppercased plus `_OUTPUT`.
pub fn default_output_column(source: &str) -> String {
    format!("{}_OUTPUT", source.to_uppercase())
}

/// Where the output file goes: inside `output` as `<input stem>.csv` when
/// `output` is an existing directory, otherwise `output` itself.
pub fn output_path(output: &Path, input: &Path) -> PathBuf {
    if output.is_dir() {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        output.join(format!("{}.csv", stem))
    } else {
        output.to_path_buf()
    }
}

/// Layout of the written table.
pub struct OutputLayout<'a> {
    pub separator: u8,
    pub source_index: usize,
    pub output_column: &'a str,
    pub audit: bool,
}

/// Write `table` with each record's label inserted right after the source
/// column. `records` must be in row order.
pub fn write_table(
    path: &Path,
    table: &Table,
    records: &[Record],
    layout: &OutputLayout<'_>,
) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format_error("create directory", &format!("{}: {}", parent.display(), e)))?;
            log::info!("Created output directory: {}", parent.display());
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(layout.separator)
        .from_path(path)
        .map_err(|e| format_error("open output", &format!("{}: {}", path.display(), e)))?;

    let header = output_row(
        &table.headers,
        layout,
        layout.output_column,
        AUDIT_COLUMN,
    );
    writer
        .write_record(&header)
        .map_err(|e| format_error("write header", &e.to_string()))?;

    for (row, record) in table.rows.iter().zip(records) {
        let line = output_row(
            row,
            layout,
            record.resolved_label.as_deref().unwrap_or(""),
            record.state.as_str(),
        );
        writer
            .write_record(&line)
            .map_err(|e| format_error("write row", &e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| format_error("flush output", &e.to_string()))
}

fn output_row<'r>(
    cells: &'r [String],
    layout: &OutputLayout<'_>,
    inserted: &'r str,
    audit: &'r str,
) -> Vec<&'r str> {
    let mut out: Vec<&str> = Vec::with_capacity(cells.len() + 2);
    for (i, cell) in cells.iter().enumerate() {
        out.push(cell);
        if i == layout.source_index {
            out.push(inserted);
        }
    }
    if layout.audit {
        out.push(audit);
    }
    out
}

/// Print the end-of-run summary to stdout.
pub fn print_summary(stats: &ResolveStats, organizations: usize, path: &Path) {
    println!(
        "{} {} organizations found",
        color("1;32", "✓"),
        organizations
    );
    println!(
        "  resolved {} / unresolved {} (of {} rows)",
        color("32", &stats.resolved.to_string()),
        color("33", &stats.unresolved.to_string()),
        stats.records
    );
    println!(
        "  extractor calls {}, cache hits {}, merged labels {}, fallback {}",
        stats.extractor_calls, stats.cache_hits, stats.merged_labels, stats.fallback_assigned
    );
    if stats.operator_sets > 0 {
        println!(
            "  operator: {} sets, {} names approved{}",
            stats.operator_sets,
            stats.operator_approved,
            if stats.operator_cancelled { " (cancelled)" } else { "" }
        );
    }
    println!("  output: {}", path.display());
}
