use crate::error::Result;
use crate::models::{MeanPolicy, VariableCatalog};
use crate::utils::constants::{
    ACCUMULATING_VARIABLES, COMPRESSION_SNAPPY, DEFAULT_GROUP_SEPARATOR, DEFAULT_OUTPUT_PREFIX,
    DEFAULT_ROW_GROUP_SIZE, DEFAULT_SERIES_SUFFIX, DEFAULT_TIMESTAMP_KEY, TRACKED_VARIABLES,
};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

pub const ENV_PREFIX: &str = "SYNOPTIC";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tracked_variables: Vec<String>,
    pub accumulating_variables: Vec<String>,
    pub timestamp_key: String,
    pub series_suffix: String,
    pub group_separator: String,
    pub output_prefix: String,
    pub mean_policy: MeanPolicy,
    pub compression: String,
    pub row_group_size: usize,
}

impl Settings {
    /// Layer built-in defaults, an optional TOML file and `SYNOPTIC_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(path, Self::environment())
    }

    /// `SYNOPTIC_*` variables; list keys take comma-separated values
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("tracked_variables")
            .with_list_parse_key("accumulating_variables")
    }

    fn load_layers(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("tracked_variables", defaults.tracked_variables)?
            .set_default("accumulating_variables", defaults.accumulating_variables)?
            .set_default("timestamp_key", defaults.timestamp_key)?
            .set_default("series_suffix", defaults.series_suffix)?
            .set_default("group_separator", defaults.group_separator)?
            .set_default("output_prefix", defaults.output_prefix)?
            .set_default("mean_policy", defaults.mean_policy.as_str())?
            .set_default("compression", defaults.compression)?
            .set_default("row_group_size", defaults.row_group_size as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }

    pub fn catalog(&self) -> VariableCatalog {
        VariableCatalog::new(
            self.tracked_variables.as_slice(),
            self.accumulating_variables.as_slice(),
            &self.series_suffix,
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tracked_variables: TRACKED_VARIABLES.iter().map(|v| v.to_string()).collect(),
            accumulating_variables: ACCUMULATING_VARIABLES
                .iter()
                .map(|v| v.to_string())
                .collect(),
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
            series_suffix: DEFAULT_SERIES_SUFFIX.to_string(),
            group_separator: DEFAULT_GROUP_SEPARATOR.to_string(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            mean_policy: MeanPolicy::default(),
            compression: COMPRESSION_SNAPPY.to_string(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}
