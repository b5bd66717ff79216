use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    /// Numeric identifier assigned by the observation service (`ID`)
    pub numeric_id: u32,

    /// Station code (`STID`), the natural key
    #[validate(length(min = 1))]
    pub string_id: String,

    /// Network identifier (`MNET_ID`)
    pub network_id: String,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

impl StationMetadata {
    pub fn new(
        numeric_id: u32,
        string_id: String,
        network_id: String,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            numeric_id,
            string_id,
            network_id,
            longitude,
            latitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let station = StationMetadata::new(
            5231,
            "KDEN".to_string(),
            "1".to_string(),
            -104.65622,
            39.84658,
        );

        assert!(station.validate().is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        let station = StationMetadata::new(5231, "KDEN".to_string(), "1".to_string(), -104.6, 91.0);
        assert!(station.validate().is_err());

        let station = StationMetadata::new(5231, String::new(), "1".to_string(), -104.6, 39.8);
        assert!(station.validate().is_err());
    }
}
