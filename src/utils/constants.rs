/// Observation payload keys
pub const DEFAULT_TIMESTAMP_KEY: &str = "date_time";
pub const DEFAULT_SERIES_SUFFIX: &str = "_set_1";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Table column names
pub const COL_STATION_NUM: &str = "STATION_NUM";
pub const COL_STATION_ID: &str = "STATION_ID";
pub const COL_DATETIME: &str = "DATETIME";
pub const COL_YEAR: &str = "YEAR";
pub const COL_MONTH: &str = "MONTH";
pub const COL_DAY: &str = "DAY";
pub const COL_HOUR: &str = "HOUR";

/// Calendar columns are shared across groups and never prefixed
pub const CALENDAR_COLUMNS: [&str; 4] = [COL_YEAR, COL_MONTH, COL_DAY, COL_HOUR];

/// File naming
pub const ARTIFACT_EXTENSION: &str = "json";
pub const ARTIFACT_SUFFIX: &str = "weather_data.json";
pub const DEFAULT_GROUP_SEPARATOR: &str = "_";
pub const DEFAULT_OUTPUT_PREFIX: &str = "Weatherdata_processed_";

/// Gazetteer (GeoNames dump) column positions kept in the reference table
pub const GAZETTEER_COLUMNS: [usize; 7] = [0, 1, 4, 5, 7, 8, 10];
pub const REFERENCE_HEADER: [&str; 7] = [
    "geonameid",
    "name",
    "latitude",
    "longitude",
    "feature code",
    "country code",
    "admin1 code",
];

/// Observation source query defaults
pub const DEFAULT_RADIUS_MILES: f64 = 6.3;
pub const DEFAULT_WINDOW_START_HOUR: u32 = 8;
pub const DEFAULT_WINDOW_END_HOUR: u32 = 18;
pub const DEFAULT_LAST_DAY: u32 = 30;
pub const QUERY_TIME_FORMAT: &str = "%Y%m%d%H%M";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const MMAP_THRESHOLD_BYTES: u64 = 64 * 1024 * 1024;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// Variables requested from the observation service, in output column order.
/// `pressure` and `water_temp` are listed twice upstream; the catalog keeps the first.
pub const TRACKED_VARIABLES: [&str; 49] = [
    "air_temp",
    "pressure",
    "wind_speed",
    "solar_radiation",
    "precip_accum",
    "snow_accum",
    "water_temp",
    "dew_point_temperature",
    "relative_humidity",
    "wind_direction",
    "wind_gust",
    "altimeter",
    "pressure",
    "soil_temp",
    "water_temp",
    "precip_storm",
    "road_temp",
    "road_freezing_temp",
    "visibility",
    "ceiling",
    "soil_temp_ir",
    "soil_moisture",
    "snow_accum_manual",
    "evapotranspiration",
    "surface_temp",
    "net_radiation_sw",
    "net_radiation_lw",
    "sonic_air_temp",
    "sonic_vertical_vel",
    "sonic_zonal_wind_stdev",
    "sonic_vertical_wind_stdev",
    "sonic_air_temp_stdev",
    "vertical_heat_flux",
    "friction_velocity",
    "vertical_moisture_flux",
    "ozone_concentration",
    "electric_conductivity",
    "incoming_radiation_uv",
    "NH3_concentration",
    "NO2y_concentration",
    "NO2_concentration",
    "NOx_concentration",
    "NOy_concentration",
    "NO_concentration",
    "outgoing_radiation_lw",
    "outgoing_radiation_uv",
    "particulate_concentration",
    "PM_10_concentration",
    "SO2_concentration",
];

/// Running totals, reduced by maximum instead of mean
pub const ACCUMULATING_VARIABLES: [&str; 3] = ["precip_accum", "snow_accum", "snow_accum_manual"];
