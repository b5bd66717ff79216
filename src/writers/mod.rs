pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::CsvTableWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use crate::error::{ProcessingError, Result};
use crate::models::HourlyTable;
use std::path::Path;

/// Persistence format for group tables
pub trait TableSink: Send + Sync {
    /// File extension of the artifacts this sink writes, without the dot
    fn extension(&self) -> &'static str;

    fn write_table(&self, table: &HourlyTable, path: &Path) -> Result<()>;
}

/// Write `table` next to `path` and rename it into place once complete.
/// A failed or interrupted write leaves no file at `path`.
pub fn commit_table(sink: &dyn TableSink, table: &HourlyTable, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempfile_in(dir)?;
    sink.write_table(table, staging.path())?;
    staging
        .persist(path)
        .map_err(|e| ProcessingError::Io(e.error))?;

    Ok(())
}
