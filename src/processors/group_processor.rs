use crate::error::{ProcessingError, Result};
use crate::models::{HourlyTable, MeanPolicy, VariableCatalog};
use crate::processors::run_report::{GroupReport, GroupStatus, RunReport};
use crate::processors::{
    GroupMerger, HourlyReducer, ObservationNormalizer, StationRegistry, TableAssembler,
};
use crate::readers::PayloadReader;
use crate::utils::constants::ARTIFACT_EXTENSION;
use crate::utils::filename::{group_output_path, FirstToken, GroupKeyStrategy};
use crate::utils::progress::ProgressReporter;
use crate::utils::settings::Settings;
use crate::writers::{commit_table, TableSink};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One artifact run through the per-file stages
#[derive(Debug)]
pub struct FileOutcome {
    pub table: HourlyTable,
    pub skipped_days: usize,
    pub station_ids: Vec<String>,
}

/// Drives discovery, per-file processing, merging and output for every group.
/// Groups run in parallel; files inside a group run in name order.
pub struct GroupProcessor {
    catalog: Arc<VariableCatalog>,
    mean_policy: MeanPolicy,
    group_key: Arc<dyn GroupKeyStrategy>,
    reader: PayloadReader,
    output_prefix: String,
    max_workers: usize,
    cancel: Arc<AtomicBool>,
}

impl GroupProcessor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            catalog: Arc::new(settings.catalog()),
            mean_policy: settings.mean_policy,
            group_key: Arc::new(FirstToken::new(settings.group_separator.clone())),
            reader: PayloadReader::new().with_timestamp_key(settings.timestamp_key.clone()),
            output_prefix: settings.output_prefix.clone(),
            max_workers: num_cpus::get(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_group_key(mut self, strategy: Arc<dyn GroupKeyStrategy>) -> Self {
        self.group_key = strategy;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.reader = self.reader.with_mmap(use_mmap);
        self
    }

    /// Shared flag; storing `true` stops every group before its next file
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Group the `.json` artifacts of `input_dir` by key, each group's files sorted by name
    pub fn discover_groups(&self, input_dir: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>> {
        let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for entry in std::fs::read_dir(input_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION)
            {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!("Skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };

            match self.group_key.group_key(file_name) {
                Some(key) => groups.entry(key).or_default().push(path),
                None => warn!("Skipping {}: no group key in file name", path.display()),
            }
        }

        for files in groups.values_mut() {
            files.sort();
        }

        Ok(groups)
    }

    /// Read one artifact and run it through extraction, normalization, reduction and assembly
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let artifact = self.reader.read_artifact(path)?;
        let (registry, retained) = StationRegistry::extract(&artifact.days);

        let buckets =
            ObservationNormalizer::new(Arc::clone(&self.catalog)).normalize(retained, &registry);
        let rows = HourlyReducer::new(Arc::clone(&self.catalog))
            .with_mean_policy(self.mean_policy)
            .reduce(buckets);
        let table = TableAssembler::new(Arc::clone(&self.catalog)).assemble(&rows)?;

        debug!(
            "{}: {} stations, {} hourly rows",
            path.display(),
            registry.len(),
            table.num_rows()
        );

        Ok(FileOutcome {
            table,
            skipped_days: artifact.skipped_days.len(),
            station_ids: registry.iter().map(|s| s.string_id.clone()).collect(),
        })
    }

    /// Process one group's files in order and commit its table through `sink`.
    /// Unreadable or malformed files are skipped; a cancelled group writes nothing.
    pub fn process_group(
        &self,
        group: &str,
        files: &[PathBuf],
        output_dir: &Path,
        sink: &dyn TableSink,
    ) -> GroupReport {
        let mut report = GroupReport::new(group, files.len());
        let mut tables = Vec::with_capacity(files.len());
        let mut stations = HashSet::new();

        info!("Group {}: processing {} files", group, files.len());

        for path in files {
            if self.is_cancelled() {
                warn!("Group {}: cancelled, discarding partial results", group);
                report.status = GroupStatus::Cancelled;
                return report;
            }

            match self.process_file(path) {
                Ok(outcome) => {
                    info!("Group {}: {} -> {} rows", group, path.display(), outcome.table.num_rows());
                    report.days_skipped += outcome.skipped_days;
                    stations.extend(outcome.station_ids);
                    tables.push(outcome.table);
                }
                Err(e) => {
                    warn!("Group {}: skipping {}: {}", group, path.display(), e);
                    report.files_skipped.push((path.clone(), e.to_string()));
                }
            }
        }
        report.stations = stations.len();

        let merged = match GroupMerger::new().merge(group, tables) {
            Ok(Some(table)) => table,
            Ok(None) => {
                report.status = GroupStatus::Empty;
                return report;
            }
            Err(e) => {
                warn!("Group {}: merge failed: {}", group, e);
                report.status = GroupStatus::Failed(e.to_string());
                return report;
            }
        };

        if self.is_cancelled() {
            report.status = GroupStatus::Cancelled;
            return report;
        }

        let path = group_output_path(output_dir, &self.output_prefix, group, sink.extension());
        report.status = match commit_table(sink, &merged, &path) {
            Ok(()) => {
                info!("Group {}: wrote {} ({})", group, path.display(), merged);
                GroupStatus::Written {
                    path,
                    rows: merged.num_rows(),
                    columns: merged.columns().len(),
                }
            }
            Err(e) => {
                warn!("Group {}: failed to write {}: {}", group, path.display(), e);
                GroupStatus::Failed(e.to_string())
            }
        };

        report
    }

    /// Process every group found in `input_dir`, writing one artifact per group into `output_dir`
    pub fn process_all(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        sink: &dyn TableSink,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunReport> {
        let groups = self.discover_groups(input_dir)?;
        if groups.is_empty() {
            warn!("No artifacts found in {}", input_dir.display());
            return Ok(RunReport::default());
        }

        self.process_groups(groups, output_dir, sink, progress)
    }

    /// Process already-discovered groups on a dedicated thread pool
    pub fn process_groups(
        &self,
        groups: BTreeMap<String, Vec<PathBuf>>,
        output_dir: &Path,
        sink: &dyn TableSink,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunReport> {
        let groups: Vec<(String, Vec<PathBuf>)> = groups.into_iter().collect();

        std::fs::create_dir_all(output_dir)?;
        info!(
            "Processing {} groups with {} workers",
            groups.len(),
            self.max_workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let reports: Vec<GroupReport> = pool.install(|| {
            groups
                .par_iter()
                .map(|(group, files)| {
                    let report = self.process_group(group, files, output_dir, sink);

                    if let Some(p) = progress {
                        p.increment(1);
                        p.set_message(&format!("Finished {}", group));
                    }

                    report
                })
                .collect()
        });

        Ok(RunReport { groups: reports })
    }
}
