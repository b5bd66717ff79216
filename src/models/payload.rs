use crate::error::{ProcessingError, Result};
use crate::models::StationMetadata;
use crate::utils::constants::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One observation service response, as stored under a day label
#[derive(Debug, Clone, Deserialize)]
struct RawDayPayload {
    #[serde(rename = "STATION", default)]
    stations: Vec<RawStation>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawStation {
    #[serde(rename = "ID", deserialize_with = "lenient_u32")]
    id: u32,

    #[serde(rename = "STID")]
    stid: String,

    #[serde(rename = "MNET_ID", default, deserialize_with = "lenient_string")]
    mnet_id: String,

    #[serde(rename = "LONGITUDE", deserialize_with = "lenient_f64")]
    longitude: f64,

    #[serde(rename = "LATITUDE", deserialize_with = "lenient_f64")]
    latitude: f64,

    #[serde(rename = "OBSERVATIONS", default)]
    observations: Map<String, Value>,
}

/// A station entry with its timestamps already parsed
#[derive(Debug, Clone)]
pub struct StationPayload {
    pub metadata: StationMetadata,
    pub timestamps: Vec<NaiveDateTime>,
    /// Every observation field except the timestamp key
    pub series: Map<String, Value>,
}

impl StationPayload {
    /// Value of `series_key` at `index`; absent series, short series and non-numeric entries are null
    pub fn value_at(&self, series_key: &str, index: usize) -> Option<f64> {
        self.series
            .get(series_key)
            .and_then(|series| series.as_array())
            .and_then(|values| values.get(index))
            .and_then(numeric_value)
    }
}

/// All stations reported for one day label
#[derive(Debug, Clone)]
pub struct DayPayload {
    pub label: String,
    pub stations: Vec<StationPayload>,
}

impl DayPayload {
    /// Validate one day's JSON against the expected response shape
    pub fn decode(label: &str, value: Value, timestamp_key: &str) -> Result<Self> {
        let raw: RawDayPayload =
            serde_json::from_value(value).map_err(|e| ProcessingError::MalformedPayload {
                source_name: label.to_string(),
                message: e.to_string(),
            })?;

        let stations = raw
            .stations
            .into_iter()
            .map(|station| Self::decode_station(label, station, timestamp_key))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            label: label.to_string(),
            stations,
        })
    }

    fn decode_station(label: &str, raw: RawStation, timestamp_key: &str) -> Result<StationPayload> {
        let mut series = raw.observations;

        let timestamps = match series.remove(timestamp_key) {
            Some(Value::Array(values)) => values
                .iter()
                .map(|v| parse_timestamp(label, &raw.stid, v))
                .collect::<Result<Vec<_>>>()?,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ProcessingError::MalformedPayload {
                    source_name: label.to_string(),
                    message: format!(
                        "station {}: '{}' is not a list: {}",
                        raw.stid, timestamp_key, other
                    ),
                })
            }
        };

        Ok(StationPayload {
            metadata: StationMetadata::new(
                raw.id,
                raw.stid,
                raw.mnet_id,
                raw.longitude,
                raw.latitude,
            ),
            timestamps,
            series,
        })
    }
}

fn parse_timestamp(label: &str, stid: &str, value: &Value) -> Result<NaiveDateTime> {
    let text = value
        .as_str()
        .ok_or_else(|| ProcessingError::MalformedPayload {
            source_name: label.to_string(),
            message: format!("station {}: timestamp {} is not a string", stid, value),
        })?;

    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|e| {
        ProcessingError::MalformedPayload {
            source_name: label.to_string(),
            message: format!("station {}: bad timestamp '{}': {}", stid, text, e),
        }
    })
}

/// Numbers pass through, numeric strings are parsed, everything else is null
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Null, empty strings and empty containers carry no reading.
/// A list of nulls still counts as a reported series.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| D::Error::custom(format!("invalid station number: {}", value)))
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    numeric_value(&value).ok_or_else(|| D::Error::custom(format!("invalid coordinate: {}", value)))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid network id: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> Value {
        json!({
            "STATION": [{
                "ID": "5231",
                "STID": "KDEN",
                "MNET_ID": "1",
                "LONGITUDE": "-104.65622",
                "LATITUDE": "39.84658",
                "OBSERVATIONS": {
                    "date_time": ["2023-06-01T08:05:00Z", "2023-06-01T08:35:00Z"],
                    "air_temp_set_1": [21.5, null],
                    "pressure_set_1": ["83412.5", "n/a"]
                }
            }]
        })
    }

    #[test]
    fn test_decode_day_payload() -> Result<()> {
        let payload = DayPayload::decode("2023_06_1", day(), "date_time")?;
        assert_eq!(payload.label, "2023_06_1");
        assert_eq!(payload.stations.len(), 1);

        let station = &payload.stations[0];
        assert_eq!(station.metadata.numeric_id, 5231);
        assert_eq!(station.metadata.string_id, "KDEN");
        assert_eq!(station.metadata.network_id, "1");
        assert!((station.metadata.latitude - 39.84658).abs() < 1e-9);
        assert_eq!(station.timestamps.len(), 2);
        assert!(!station.series.contains_key("date_time"));

        assert_eq!(station.value_at("air_temp_set_1", 0), Some(21.5));
        assert_eq!(station.value_at("air_temp_set_1", 1), None);
        assert_eq!(station.value_at("air_temp_set_1", 7), None);
        assert_eq!(station.value_at("pressure_set_1", 0), Some(83412.5));
        assert_eq!(station.value_at("pressure_set_1", 1), None);
        assert_eq!(station.value_at("wind_speed_set_1", 0), None);
        Ok(())
    }

    #[test]
    fn test_numeric_station_fields() -> Result<()> {
        let value = json!({
            "STATION": [{
                "ID": 17, "STID": "ABC", "MNET_ID": 65,
                "LONGITUDE": -105.0, "LATITUDE": 40.0,
                "OBSERVATIONS": {}
            }]
        });
        let payload = DayPayload::decode("d", value, "date_time")?;
        assert_eq!(payload.stations[0].metadata.numeric_id, 17);
        assert_eq!(payload.stations[0].metadata.network_id, "65");
        assert!(payload.stations[0].timestamps.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_station_list_is_empty_day() -> Result<()> {
        let payload = DayPayload::decode("d", json!({"SUMMARY": {"RESPONSE_CODE": 2}}), "date_time")?;
        assert!(payload.stations.is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_day_is_rejected() {
        assert!(DayPayload::decode("d", json!([1, 2, 3]), "date_time").is_err());
        assert!(DayPayload::decode("d", json!({"STATION": [{"STID": "X"}]}), "date_time").is_err());

        let mut bad_time = day();
        bad_time["STATION"][0]["OBSERVATIONS"]["date_time"] = json!(["06/01/2023 08:05"]);
        assert!(matches!(
            DayPayload::decode("d", bad_time, "date_time"),
            Err(ProcessingError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!([null, null])));
        assert!(!is_empty_value(&json!([null, 0.0])));
        assert!(!is_empty_value(&json!("calm")));
    }
}
