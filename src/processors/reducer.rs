use crate::models::{HourBuckets, MeanPolicy, ReducedRow, Reduction, VariableCatalog};
use std::sync::Arc;

/// Collapses every (station, hour) bucket into one row of scalars
pub struct HourlyReducer {
    catalog: Arc<VariableCatalog>,
    mean_policy: MeanPolicy,
}

impl HourlyReducer {
    pub fn new(catalog: Arc<VariableCatalog>) -> Self {
        Self {
            catalog,
            mean_policy: MeanPolicy::default(),
        }
    }

    pub fn with_mean_policy(mut self, mean_policy: MeanPolicy) -> Self {
        self.mean_policy = mean_policy;
        self
    }

    /// Consume one file's buckets; rows come out station by station, hours ascending
    pub fn reduce(&self, buckets: HourBuckets) -> Vec<ReducedRow> {
        let mut rows = Vec::with_capacity(buckets.bucket_count());

        for station in buckets.into_stations() {
            for (hour, bucket) in station.hours {
                let values = self
                    .catalog
                    .variables()
                    .iter()
                    .enumerate()
                    .map(|(position, variable)| {
                        reduce_values(variable.reduction, self.mean_policy, bucket.values(position))
                    })
                    .collect();

                rows.push(ReducedRow {
                    station_num: station.numeric_id,
                    station_id: station.string_id.clone(),
                    hour,
                    values,
                });
            }
        }

        rows
    }
}

/// Reduce one bucket list. Empty or all-null input is null, never an error.
pub fn reduce_values(reduction: Reduction, policy: MeanPolicy, values: &[Option<f64>]) -> Option<f64> {
    match reduction {
        Reduction::Max => values
            .iter()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))),
        Reduction::Mean => {
            if policy == MeanPolicy::PeekFirst && !matches!(values.first(), Some(Some(_))) {
                return None;
            }

            let (sum, count) = values
                .iter()
                .flatten()
                .fold((0.0_f64, 0usize), |(sum, count), v| (sum + v, count + 1));

            if count == 0 {
                None
            } else {
                Some(sum / count as f64)
            }
        }
    }
}
