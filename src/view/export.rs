use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use crate::view::table::{Table, TableRow};

/// Download name used by the export buttons.
pub const DEFAULT_EXPORT_FILENAME: &str = "datos_exportados.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialise header and every body row, hidden or not, with all fields quoted.
pub fn table_to_csv<R: TableRow>(table: &Table<R>) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.headers().iter().map(|h| h.label.as_str()))?;
    for row in table.rows() {
        writer.write_record(row.cells().iter().map(|c| c.trim()))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn write_csv_file<R: TableRow>(table: &Table<R>, path: &Path) -> Result<usize, ExportError> {
    let csv = table_to_csv(table)?;
    std::fs::write(path, csv)?;
    tracing::info!("Exported {} rows to {}", table.rows().len(), path.display());
    Ok(table.rows().len())
}
