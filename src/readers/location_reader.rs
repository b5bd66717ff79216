use crate::error::{ProcessingError, Result};
use crate::models::{Coordinates, LocationRecord};
use crate::utils::constants::GAZETTEER_COLUMNS;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const GAZETTEER_DELIMITER: u8 = b'\t';

/// Reads GeoNames-style tab-separated gazetteer dumps
pub struct GazetteerReader;

impl GazetteerReader {
    pub fn new() -> Self {
        Self
    }

    /// Select the reference columns from every gazetteer line
    pub fn read_locations(&self, path: &Path) -> Result<Vec<LocationRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(GAZETTEER_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)?;

        let mut records = Vec::new();
        for (line_number, row) in reader.records().enumerate() {
            let row = row?;
            if let Some(record) = self.parse_row(&row, line_number + 1)? {
                records.push(record);
            }
        }

        debug!("Read {} gazetteer entries from {}", records.len(), path.display());
        Ok(records)
    }

    fn parse_row(&self, row: &StringRecord, line_number: usize) -> Result<Option<LocationRecord>> {
        let fields: Vec<&str> = GAZETTEER_COLUMNS
            .iter()
            .filter_map(|&i| row.get(i))
            .map(str::trim)
            .collect();

        if fields.len() < GAZETTEER_COLUMNS.len() {
            // Skip truncated lines
            return Ok(None);
        }

        let parse_coordinate = |value: &str| {
            value.parse::<f64>().map_err(|_| {
                ProcessingError::InvalidFormat(format!(
                    "Invalid coordinate '{}' on gazetteer line {}",
                    value, line_number
                ))
            })
        };

        Ok(Some(LocationRecord {
            geonameid: fields[0].to_string(),
            name: fields[1].to_string(),
            latitude: parse_coordinate(fields[2])?,
            longitude: parse_coordinate(fields[3])?,
            feature_code: fields[4].to_string(),
            country_code: fields[5].to_string(),
            admin1_code: fields[6].to_string(),
        }))
    }
}

impl Default for GazetteerReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact-match lookup of (name, admin1 code) to coordinates
#[derive(Debug, Clone, Default)]
pub struct LocationReference {
    entries: HashMap<(String, String), Coordinates>,
}

impl LocationReference {
    /// First record for a (name, admin1 code) pair wins
    pub fn from_records(records: &[LocationRecord]) -> Self {
        let mut entries = HashMap::with_capacity(records.len());
        for record in records {
            if let Err(e) = record.validate() {
                warn!("Location {} ({}) failed validation: {}", record.name, record.geonameid, e);
            }
            entries
                .entry((record.name.clone(), record.admin1_code.clone()))
                .or_insert_with(|| Coordinates::from(record));
        }
        Self { entries }
    }

    /// Load a reference table written by [`write_reference_csv`]; a leading BOM is ignored
    pub fn from_csv(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
        if had_errors {
            warn!("Replaced invalid UTF-8 sequences in {}", path.display());
        }

        let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());
        let records = reader
            .deserialize::<LocationRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::from_records(&records))
    }

    pub fn lookup(&self, name: &str, admin1_code: &str) -> Result<Coordinates> {
        self.entries
            .get(&(name.to_string(), admin1_code.to_string()))
            .copied()
            .ok_or_else(|| ProcessingError::LocationNotFound {
                name: name.to_string(),
                admin_code: admin1_code.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write the reference table as UTF-8 CSV with a byte-order mark
pub fn write_reference_csv(records: &[LocationRecord], path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(UTF8_BOM)?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
