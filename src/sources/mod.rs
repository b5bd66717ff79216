pub mod extraction;

pub use extraction::MonthlyExtraction;

use crate::error::Result;
use crate::models::Coordinates;
use crate::utils::constants::{DEFAULT_RADIUS_MILES, QUERY_TIME_FORMAT};
use chrono::NaiveDateTime;
use serde_json::Value;

/// A time-series request around one location
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationQuery {
    pub coordinates: Coordinates,
    pub radius: f64,
    /// Window start, UTC
    pub start: NaiveDateTime,
    /// Window end, UTC
    pub end: NaiveDateTime,
    pub variables: Vec<String>,
}

impl ObservationQuery {
    pub fn new(coordinates: Coordinates, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            coordinates,
            radius: DEFAULT_RADIUS_MILES,
            start,
            end,
            variables: Vec::new(),
        }
    }

    pub fn with_variables<S: AsRef<str>>(mut self, variables: &[S]) -> Self {
        self.variables = variables.iter().map(|v| v.as_ref().to_string()).collect();
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Query parameters in the form the time-series service expects
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "radius",
                format!(
                    "{},{},{}",
                    self.coordinates.latitude, self.coordinates.longitude, self.radius
                ),
            ),
            ("start", self.start.format(QUERY_TIME_FORMAT).to_string()),
            ("end", self.end.format(QUERY_TIME_FORMAT).to_string()),
            ("vars", self.variables.join(",")),
        ]
    }
}

/// Remote service answering station time-series queries.
///
/// `Ok(None)` means the service had nothing for the window; the caller logs it
/// and moves on. Implementations own transport, authentication and retries.
pub trait ObservationSource: Send + Sync {
    fn fetch(&self, query: &ObservationQuery) -> Result<Option<Value>>;
}
