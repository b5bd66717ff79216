use crate::models::{floor_to_hour, HourBuckets, StationPayload, VariableCatalog};
use crate::processors::StationRegistry;
use std::sync::Arc;

/// Buckets irregular station readings into hours, one raw list per tracked variable
pub struct ObservationNormalizer {
    catalog: Arc<VariableCatalog>,
}

impl ObservationNormalizer {
    pub fn new(catalog: Arc<VariableCatalog>) -> Self {
        Self { catalog }
    }

    /// Build fresh buckets for one file's retained stations
    pub fn normalize<'a, I>(&self, stations: I, registry: &StationRegistry) -> HourBuckets
    where
        I: IntoIterator<Item = &'a StationPayload>,
    {
        stations
            .into_iter()
            .fold(HourBuckets::new(self.catalog.len()), |buckets, station| {
                self.bucket_station(buckets, station, registry)
            })
    }

    /// Append one station's readings. Every timestamp adds exactly one entry per
    /// variable, null when the series is missing or too short at that index.
    pub fn bucket_station(
        &self,
        mut buckets: HourBuckets,
        station: &StationPayload,
        registry: &StationRegistry,
    ) -> HourBuckets {
        let identity = registry
            .get(&station.metadata.string_id)
            .unwrap_or(&station.metadata);

        for (i, timestamp) in station.timestamps.iter().enumerate() {
            let bucket = buckets.bucket_mut(identity, floor_to_hour(*timestamp));
            for (position, variable) in self.catalog.variables().iter().enumerate() {
                bucket.push(position, station.value_at(&variable.series_key, i));
            }
        }

        buckets
    }
}
