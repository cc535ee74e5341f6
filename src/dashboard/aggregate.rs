use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{DashboardConfig, HostConfig};
use crate::dashboard::Dashboard;
use crate::runner::CommandRunner;

const SSH: &str = "ssh";

/// Dashboards for every configured host, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregatedDashboard {
    entries: IndexMap<String, Dashboard>,
}

impl AggregatedDashboard {
    pub fn get(&self, key: &str) -> Option<&Dashboard> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dashboard)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of hosts whose dashboard carries an error.
    pub fn failed_count(&self) -> usize {
        self.entries.values().filter(|d| d.is_error()).count()
    }
}

impl FromIterator<(String, Dashboard)> for AggregatedDashboard {
    fn from_iter<I: IntoIterator<Item = (String, Dashboard)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Queries every configured host over `ssh` and merges the results.
///
/// Each host is attempted once. A failed or garbled host turns into an error-bearing
/// [`Dashboard`] and never aborts the others.
pub struct Aggregator {
    config: DashboardConfig,
    runner: Arc<dyn CommandRunner>,
}

impl Aggregator {
    pub fn new(config: DashboardConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Fetch the dashboard of a single host.
    pub async fn query_host(&self, key: &str, host: &HostConfig) -> Dashboard {
        let args = host.ssh_args();
        tracing::debug!(host = %key, address = %host.host, ?args, "Querying host");

        let result = match self.runner.run(SSH, &args).await {
            Ok(stdout) => Dashboard::from_json(&stdout),
            Err(e) => Err(e),
        };

        match result {
            Ok(dashboard) => {
                tracing::debug!(host = %key, jobs = dashboard.queue.len(), "Host responded");
                dashboard
            }
            Err(e) => {
                tracing::warn!(host = %key, error = %e, "Host query failed");
                Dashboard::from_error(&e)
            }
        }
    }

    /// Query all hosts, at most `max_concurrency` at a time, keeping declaration order.
    pub async fn collect(&self) -> AggregatedDashboard {
        let limit = self.config.max_concurrency.max(1);

        let entries: IndexMap<String, Dashboard> = stream::iter(self.config.hosts())
            .map(|(key, host)| async move { (key.to_string(), self.query_host(key, host).await) })
            .buffered(limit)
            .collect()
            .await;

        let aggregated = AggregatedDashboard { entries };
        tracing::info!(
            hosts = aggregated.len(),
            failed = aggregated.failed_count(),
            "Aggregated dashboards"
        );
        aggregated
    }
}
