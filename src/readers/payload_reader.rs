use crate::error::{ProcessingError, Result};
use crate::models::DayPayload;
use crate::utils::constants::{DEFAULT_TIMESTAMP_KEY, MMAP_THRESHOLD_BYTES};
use memmap2::Mmap;
use serde_json::{Map, Value};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Decoded contents of one monthly artifact
#[derive(Debug, Clone, Default)]
pub struct MonthlyArtifact {
    /// Day payloads in file order
    pub days: Vec<DayPayload>,
    /// Labels of days that did not match the expected response shape
    pub skipped_days: Vec<String>,
}

impl MonthlyArtifact {
    pub fn station_entries(&self) -> usize {
        self.days.iter().map(|d| d.stations.len()).sum()
    }
}

pub struct PayloadReader {
    timestamp_key: String,
    use_mmap: bool,
}

impl PayloadReader {
    pub fn new() -> Self {
        Self {
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
            use_mmap: false,
        }
    }

    pub fn with_timestamp_key(mut self, timestamp_key: impl Into<String>) -> Self {
        self.timestamp_key = timestamp_key.into();
        self
    }

    /// Always memory-map, not only for files above the size threshold
    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read a monthly artifact. An unreadable file is an error; a malformed day is skipped.
    pub fn read_artifact(&self, path: &Path) -> Result<MonthlyArtifact> {
        let source_name = path.display().to_string();
        let root = self.read_root(path).map_err(|e| match e {
            ProcessingError::Json(e) => ProcessingError::MalformedPayload {
                source_name: source_name.clone(),
                message: e.to_string(),
            },
            other => other,
        })?;

        Ok(self.decode_days(&source_name, root))
    }

    /// Decode an already-parsed artifact object
    pub fn decode_days(&self, source_name: &str, root: Map<String, Value>) -> MonthlyArtifact {
        let mut artifact = MonthlyArtifact::default();

        for (label, value) in root {
            match DayPayload::decode(&label, value, &self.timestamp_key) {
                Ok(day) => artifact.days.push(day),
                Err(e) => {
                    warn!("Skipping day '{}' in {}: {}", label, source_name, e);
                    artifact.skipped_days.push(label);
                }
            }
        }

        debug!(
            "{}: {} days, {} station entries, {} skipped days",
            source_name,
            artifact.days.len(),
            artifact.station_entries(),
            artifact.skipped_days.len()
        );

        artifact
    }

    fn read_root(&self, path: &Path) -> Result<Map<String, Value>> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        if self.use_mmap || size >= MMAP_THRESHOLD_BYTES {
            // The artifact is only read for the lifetime of the map
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(serde_json::from_slice(&mmap)?)
        } else {
            let bytes = std::fs::read(path)?;
            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}

impl Default for PayloadReader {
    fn default() -> Self {
        Self::new()
    }
}
