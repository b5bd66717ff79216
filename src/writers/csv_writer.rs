use crate::error::Result;
use crate::models::{Column, HourlyTable};
use crate::writers::TableSink;
use std::path::Path;

/// Plain CSV output; nulls are written as empty cells
pub struct CsvTableWriter;

impl CsvTableWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_table(&self, table: &HourlyTable, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let columns: Vec<&Column> = table.index().into_iter().chain(table.columns()).collect();
        writer.write_record(columns.iter().map(|c| c.name.as_str()))?;

        for row in 0..table.num_rows() {
            writer.write_record(
                columns
                    .iter()
                    .map(|c| c.data.display_value(row).unwrap_or_default()),
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvTableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for CsvTableWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write_table(&self, table: &HourlyTable, path: &Path) -> Result<()> {
        CsvTableWriter::write_table(self, table, path)
    }
}
