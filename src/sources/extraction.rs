use crate::error::Result;
use crate::models::Coordinates;
use crate::sources::{ObservationQuery, ObservationSource};
use crate::utils::constants::{
    DEFAULT_LAST_DAY, DEFAULT_RADIUS_MILES, DEFAULT_WINDOW_END_HOUR, DEFAULT_WINDOW_START_HOUR,
};
use crate::utils::filename::monthly_artifact_filename;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Pulls one day-window per day of a month from an [`ObservationSource`] and
/// stores the responses as a monthly artifact keyed by day label.
pub struct MonthlyExtraction<'a> {
    source: &'a dyn ObservationSource,
    variables: Vec<String>,
    radius: f64,
    window_start_hour: u32,
    window_end_hour: u32,
    last_day: u32,
}

impl<'a> MonthlyExtraction<'a> {
    pub fn new(source: &'a dyn ObservationSource, variables: Vec<String>) -> Self {
        Self {
            source,
            variables,
            radius: DEFAULT_RADIUS_MILES,
            window_start_hour: DEFAULT_WINDOW_START_HOUR,
            window_end_hour: DEFAULT_WINDOW_END_HOUR,
            last_day: DEFAULT_LAST_DAY,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_window(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.window_start_hour = start_hour;
        self.window_end_hour = end_hour;
        self
    }

    pub fn with_last_day(mut self, last_day: u32) -> Self {
        self.last_day = last_day;
        self
    }

    /// `2023_06_7`: year, zero-padded month, unpadded day
    pub fn day_label(date: NaiveDate) -> String {
        use chrono::Datelike;
        format!("{}_{:02}_{}", date.year(), date.month(), date.day())
    }

    /// Fetch every day of the month. Days the source has nothing for, or fails
    /// on, are logged and left out of the result.
    pub fn extract_month(
        &self,
        location: &str,
        coordinates: Coordinates,
        year: i32,
        month: u32,
    ) -> Map<String, Value> {
        let mut days = Map::new();

        for day in 1..=self.last_day {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                debug!("Skipping {}-{:02}-{}: not a calendar day", year, month, day);
                continue;
            };
            let (Some(start), Some(end)) = (
                date.and_hms_opt(self.window_start_hour, 0, 0),
                date.and_hms_opt(self.window_end_hour, 0, 0),
            ) else {
                warn!(
                    "Invalid window {}..{} for {}",
                    self.window_start_hour, self.window_end_hour, date
                );
                continue;
            };

            let query = ObservationQuery::new(coordinates, start, end)
                .with_radius(self.radius)
                .with_variables(&self.variables);

            match self.source.fetch(&query) {
                Ok(Some(response)) => {
                    days.insert(Self::day_label(date), response);
                }
                Ok(None) => info!("Weather data not available for {} on {}", location, date),
                Err(e) => warn!("Fetching {} on {} failed: {}", location, date, e),
            }
        }

        days
    }

    /// Extract one month and write it as `<location>_<year>_<MM>_weather_data.json` in `output_dir`
    pub fn write_month(
        &self,
        location: &str,
        coordinates: Coordinates,
        year: i32,
        month: u32,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let days = self.extract_month(location, coordinates, year, month);

        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(monthly_artifact_filename(location, year, month));
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &Value::Object(days))?;

        info!("Weather data for {} in {}-{:02} saved as {}", location, year, month, path.display());
        Ok(path)
    }
}
