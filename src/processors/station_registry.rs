use crate::models::payload::is_empty_value;
use crate::models::{DayPayload, StationMetadata, StationPayload};
use std::collections::HashMap;
use tracing::{debug, warn};
use validator::Validate;

/// Station metadata seen while processing one file, keyed by string id.
/// The first record for a string id wins; later ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: HashMap<String, StationMetadata>,
    order: Vec<String>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every station of every day and return the ones with usable readings
    pub fn extract(days: &[DayPayload]) -> (Self, Vec<&StationPayload>) {
        let mut registry = Self::new();
        let mut retained = Vec::new();

        for day in days {
            for station in &day.stations {
                registry.register(&station.metadata);

                if has_observations(station) {
                    retained.push(station);
                } else {
                    debug!(
                        "Dropping station {} on {}: no observations",
                        station.metadata.string_id, day.label
                    );
                }
            }
        }

        (registry, retained)
    }

    /// Returns `true` when the station was not known yet
    pub fn register(&mut self, metadata: &StationMetadata) -> bool {
        if self.stations.contains_key(&metadata.string_id) {
            return false;
        }

        if let Err(e) = metadata.validate() {
            warn!("Station {} has invalid metadata: {}", metadata.string_id, e);
        }

        self.order.push(metadata.string_id.clone());
        self.stations
            .insert(metadata.string_id.clone(), metadata.clone());
        true
    }

    pub fn get(&self, string_id: &str) -> Option<&StationMetadata> {
        self.stations.get(string_id)
    }

    /// Stations in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &StationMetadata> {
        self.order.iter().filter_map(|id| self.stations.get(id))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// A station is usable when any non-timestamp observation field carries a value
pub fn has_observations(station: &StationPayload) -> bool {
    station.series.values().any(|value| !is_empty_value(value))
}
