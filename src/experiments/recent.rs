use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::experiments::activity::{creation_time, last_activity_time};
use crate::scheduler::Job;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_name: String,
    pub time_activity: NaiveDateTime,
}

/// Selects experiments that are recent but not currently in the queue.
#[derive(Debug, Clone)]
pub struct RecencyFilter {
    root: PathBuf,
    creation_cutoff: NaiveDateTime,
    activity_cutoff: NaiveDateTime,
}

impl RecencyFilter {
    pub fn new(
        root: impl Into<PathBuf>,
        creation_cutoff: NaiveDateTime,
        activity_cutoff: NaiveDateTime,
    ) -> Self {
        Self {
            root: root.into(),
            creation_cutoff,
            activity_cutoff,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the experiments root and return every directory created at or after the
    /// creation cutoff, active at or after the activity cutoff, and not named after a job in
    /// `queue`. Results are sorted by experiment name.
    pub fn recent(&self, queue: &[Job]) -> Result<Vec<Experiment>> {
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "Experiments directory not found");
            return Ok(Vec::new());
        }

        let queued: HashSet<&str> = queue.iter().map(|job| job.job_name.as_str()).collect();
        let mut experiments = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            // Follows symlinks, so linked experiment directories count.
            let metadata = match std::fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !metadata.is_dir() {
                continue;
            }
            if creation_time(&metadata)? < self.creation_cutoff {
                continue;
            }

            let experiment_name = entry.file_name().to_string_lossy().into_owned();
            if queued.contains(experiment_name.as_str()) {
                continue;
            }

            let time_activity = last_activity_time(&entry.path())?;
            if time_activity < self.activity_cutoff {
                continue;
            }

            experiments.push(Experiment {
                experiment_name,
                time_activity,
            });
        }

        experiments.sort_by(|a, b| a.experiment_name.cmp(&b.experiment_name));
        tracing::debug!(
            root = %self.root.display(),
            recent = experiments.len(),
            "Scanned experiments"
        );
        Ok(experiments)
    }
}
