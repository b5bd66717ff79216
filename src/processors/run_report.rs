use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum GroupStatus {
    Written {
        path: PathBuf,
        rows: usize,
        columns: usize,
    },
    /// No file in the group produced rows; nothing was written
    Empty,
    Cancelled,
    Failed(String),
}

/// Outcome of processing one group
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub group: String,
    pub status: GroupStatus,
    pub files_total: usize,
    pub files_skipped: Vec<(PathBuf, String)>,
    pub days_skipped: usize,
    pub stations: usize,
}

impl GroupReport {
    pub fn new(group: impl Into<String>, files_total: usize) -> Self {
        Self {
            group: group.into(),
            status: GroupStatus::Empty,
            files_total,
            files_skipped: Vec::new(),
            days_skipped: 0,
            stations: 0,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self.status, GroupStatus::Written { .. })
    }
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            GroupStatus::Written { path, rows, columns } => write!(
                f,
                "{}: {} rows x {} columns -> {}",
                self.group,
                rows,
                columns,
                path.display()
            )?,
            GroupStatus::Empty => write!(f, "{}: no data, nothing written", self.group)?,
            GroupStatus::Cancelled => write!(f, "{}: cancelled", self.group)?,
            GroupStatus::Failed(reason) => write!(f, "{}: failed ({})", self.group, reason)?,
        }

        if !self.files_skipped.is_empty() || self.days_skipped > 0 {
            write!(
                f,
                " [{} of {} files skipped, {} days skipped]",
                self.files_skipped.len(),
                self.files_total,
                self.days_skipped
            )?;
        }

        Ok(())
    }
}

/// Per-group outcomes of a processing run, ordered by group name
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.groups.iter().filter(|g| g.is_written()).count()
    }

    pub fn was_cancelled(&self) -> bool {
        self.groups
            .iter()
            .any(|g| g.status == GroupStatus::Cancelled)
    }

    pub fn failed(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups
            .iter()
            .filter(|g| matches!(g.status, GroupStatus::Failed(_)))
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Processing Summary:\n\
            - Groups: {}\n\
            - Written: {}\n\
            - Empty: {}\n\
            - Failed: {}\n\
            - Files skipped: {}",
            self.groups.len(),
            self.written(),
            self.groups
                .iter()
                .filter(|g| g.status == GroupStatus::Empty)
                .count(),
            self.failed().count(),
            self.groups.iter().map(|g| g.files_skipped.len()).sum::<usize>(),
        );

        for group in &self.groups {
            summary.push_str(&format!("\n  {}", group));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut written = GroupReport::new("Denver", 2);
        written.status = GroupStatus::Written {
            path: PathBuf::from("out/Weatherdata_processed_Denver.parquet"),
            rows: 10,
            columns: 54,
        };
        let mut empty = GroupReport::new("Aspen", 1);
        empty.files_skipped.push((PathBuf::from("Aspen_2023_06_weather_data.json"), "bad".into()));

        let report = RunReport {
            groups: vec![empty, written],
        };

        assert_eq!(report.written(), 1);
        assert!(!report.was_cancelled());

        let summary = report.summary();
        assert!(summary.contains("- Groups: 2"));
        assert!(summary.contains("- Files skipped: 1"));
        assert!(summary.contains("Denver: 10 rows x 54 columns"));
        assert!(summary.contains("Aspen: no data, nothing written [1 of 1 files skipped, 0 days skipped]"));
    }
}
