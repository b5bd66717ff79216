use crate::utils::constants::ARTIFACT_SUFFIX;
use std::path::{Path, PathBuf};

/// Maps an artifact file name to the group it belongs to.
pub trait GroupKeyStrategy: Send + Sync {
    fn group_key(&self, file_name: &str) -> Option<String>;
}

/// Group by the first token of the file name (`Denver_2023_06_weather_data.json` -> `Denver`)
#[derive(Debug, Clone)]
pub struct FirstToken {
    separator: String,
}

impl FirstToken {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for FirstToken {
    fn default() -> Self {
        Self::new("_")
    }
}

impl GroupKeyStrategy for FirstToken {
    fn group_key(&self, file_name: &str) -> Option<String> {
        let stem = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_name);

        let token = if self.separator.is_empty() {
            stem
        } else {
            stem.split(self.separator.as_str()).next().unwrap_or(stem)
        };

        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

impl<F> GroupKeyStrategy for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn group_key(&self, file_name: &str) -> Option<String> {
        self(file_name)
    }
}

/// `<location>_<year>_<MM>_weather_data.json`
pub fn monthly_artifact_filename(location: &str, year: i32, month: u32) -> String {
    format!("{}_{}_{:02}_{}", location, year, month, ARTIFACT_SUFFIX)
}

/// Output artifact path for one group, e.g. `out/Weatherdata_processed_Denver.parquet`
pub fn group_output_path(output_dir: &Path, prefix: &str, group: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}{}.{}", prefix, group, extension))
}
