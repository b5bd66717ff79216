use crate::models::StationMetadata;
use chrono::{NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap};

/// Truncate a timestamp to the top of its hour
pub fn floor_to_hour(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}

/// Raw values for one (station, hour), one list per tracked variable in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct HourBucket {
    values: Vec<Vec<Option<f64>>>,
}

impl HourBucket {
    fn new(width: usize) -> Self {
        Self {
            values: vec![Vec::new(); width],
        }
    }

    pub fn push(&mut self, variable: usize, value: Option<f64>) {
        if let Some(list) = self.values.get_mut(variable) {
            list.push(value);
        }
    }

    pub fn values(&self, variable: usize) -> &[Option<f64>] {
        self.values.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// Hour buckets of a single station, chronologically ordered
#[derive(Debug, Clone)]
pub struct StationBuckets {
    pub numeric_id: u32,
    pub string_id: String,
    pub hours: BTreeMap<NaiveDateTime, HourBucket>,
}

/// Scratch state for one source file, keyed by (station, hour).
/// Stations keep the order in which they first appeared.
#[derive(Debug, Clone)]
pub struct HourBuckets {
    width: usize,
    stations: Vec<StationBuckets>,
    index: HashMap<String, usize>,
}

impl HourBuckets {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            stations: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn bucket_mut(&mut self, station: &StationMetadata, hour: NaiveDateTime) -> &mut HourBucket {
        let position = match self.index.get(&station.string_id) {
            Some(&position) => position,
            None => {
                self.stations.push(StationBuckets {
                    numeric_id: station.numeric_id,
                    string_id: station.string_id.clone(),
                    hours: BTreeMap::new(),
                });
                self.index
                    .insert(station.string_id.clone(), self.stations.len() - 1);
                self.stations.len() - 1
            }
        };

        let width = self.width;
        self.stations[position]
            .hours
            .entry(hour)
            .or_insert_with(|| HourBucket::new(width))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.stations.iter().map(|s| s.hours.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket_count() == 0
    }

    pub fn stations(&self) -> &[StationBuckets] {
        &self.stations
    }

    pub fn into_stations(self) -> Vec<StationBuckets> {
        self.stations
    }
}

/// One reduced (station, hour) row, values in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedRow {
    pub station_num: u32,
    pub station_id: String,
    pub hour: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}
