use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How non-accumulating buckets are averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanPolicy {
    /// Mean of the non-null values, but null whenever the bucket's first value is null
    #[default]
    PeekFirst,
    /// Mean of the non-null values regardless of position
    NonNull,
}

impl MeanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeanPolicy::PeekFirst => "peek_first",
            MeanPolicy::NonNull => "non_null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    /// Running totals keep the largest reading in the hour
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedVariable {
    pub name: String,
    /// Key of the primary-sensor series in the payload, also the output column name
    pub series_key: String,
    pub reduction: Reduction,
}

/// Ordered, duplicate-free list of the variables extracted from each station
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    variables: Vec<TrackedVariable>,
}

impl VariableCatalog {
    pub fn new<S: AsRef<str>>(tracked: &[S], accumulating: &[S], series_suffix: &str) -> Self {
        let accumulating: HashSet<&str> = accumulating.iter().map(|v| v.as_ref()).collect();
        let mut seen = HashSet::new();

        let variables = tracked
            .iter()
            .map(|v| v.as_ref())
            .filter(|name| seen.insert(*name))
            .map(|name| TrackedVariable {
                name: name.to_string(),
                series_key: format!("{}{}", name, series_suffix),
                reduction: if accumulating.contains(name) {
                    Reduction::Max
                } else {
                    Reduction::Mean
                },
            })
            .collect();

        Self { variables }
    }

    pub fn variables(&self) -> &[TrackedVariable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
