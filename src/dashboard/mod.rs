pub mod aggregate;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{expand_home, LocalOptions};
use crate::cutoff::require_cutoff;
use crate::error::{DashboardError, Result};
use crate::experiments::{Experiment, RecencyFilter};
use crate::runner::CommandRunner;
use crate::scheduler::{fetch_queue, Job};

pub use aggregate::{AggregatedDashboard, Aggregator};

/// Snapshot of one host: its queue and recently active experiments.
///
/// `error`/`output` are only set when the host could not be queried, in which case `queue`
/// and `recent` are empty placeholders rather than an authoritative empty state. The minimal
/// payload leaves `recent` out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub queue: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent: Option<Vec<Experiment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Dashboard {
    pub fn new(queue: Vec<Job>, recent: Vec<Experiment>) -> Self {
        Self {
            queue,
            recent: Some(recent),
            error: None,
            output: None,
        }
    }

    /// Queue-only payload.
    pub fn minimal(queue: Vec<Job>) -> Self {
        Self {
            queue,
            ..Self::default()
        }
    }

    /// Recently active experiments; empty when the host sent none.
    pub fn recent(&self) -> &[Experiment] {
        self.recent.as_deref().unwrap_or_default()
    }

    /// Placeholder for a host whose retrieval failed.
    pub fn failed(error: impl Into<String>, output: Option<String>) -> Self {
        Self {
            error: Some(error.into()),
            output,
            ..Self::default()
        }
    }

    /// Convert a per-host failure into an error-bearing payload.
    pub fn from_error(err: &DashboardError) -> Self {
        match err {
            DashboardError::Retrieval { message, output } => {
                Self::failed(format!("Command failed: {}", message), output.clone())
            }
            other => Self::failed(other.to_string(), None),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decode the JSON document written by a remote `local` invocation.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the dashboard for the host we are running on.
///
/// Cutoffs are resolved once against `now`. Every failure is fatal here: a single host
/// never reports a partial dashboard.
pub async fn build_local_dashboard(
    runner: &dyn CommandRunner,
    options: &LocalOptions,
    now: NaiveDateTime,
) -> Result<Dashboard> {
    let creation_cutoff = require_cutoff("--recent-creation-cutoff", &options.creation_cutoff, now)?;
    let activity_cutoff = require_cutoff("--recent-activity-cutoff", &options.activity_cutoff, now)?;

    let user = options.resolve_user()?;
    let queue = fetch_queue(runner, &user, options.format, now).await?;

    let dashboard = if options.include_recent {
        let filter = RecencyFilter::new(
            expand_home(&options.experiments_path),
            creation_cutoff,
            activity_cutoff,
        );
        let recent = filter.recent(&queue)?;
        Dashboard::new(queue, recent)
    } else {
        Dashboard::minimal(queue)
    };

    tracing::info!(
        jobs = dashboard.queue.len(),
        recent = dashboard.recent().len(),
        "Built local dashboard"
    );
    Ok(dashboard)
}
