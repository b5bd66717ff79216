use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of the location reference table derived from the gazetteer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LocationRecord {
    pub geonameid: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[serde(rename = "feature code")]
    pub feature_code: String,

    #[serde(rename = "country code")]
    pub country_code: String,

    #[serde(rename = "admin1 code")]
    pub admin1_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&LocationRecord> for Coordinates {
    fn from(record: &LocationRecord) -> Self {
        Self::new(record.latitude, record.longitude)
    }
}
