use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::scheduler::QueueFormat;

/// Name of the dashboard executable expected on remote hosts.
pub const DEFAULT_REMOTE_COMMAND: &str = "clusterbar";

const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// One cluster host as declared in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// Address passed to `ssh` (hostname or ssh config alias).
    pub host: String,
    /// Heading shown in the menu bar.
    pub label: String,
    /// Install prefix on the remote host; the dashboard runs as `<venv>/bin/clusterbar`.
    #[serde(default)]
    pub venv: Option<PathBuf>,
    /// Remote executable, used when `venv` is not set.
    #[serde(default)]
    pub command: Option<String>,
    /// Extra arguments for the remote `local` subcommand.
    #[serde(default)]
    pub args: Vec<String>,
}

impl HostConfig {
    pub fn new(host: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            label: label.into(),
            venv: None,
            command: None,
            args: Vec::new(),
        }
    }

    pub fn remote_program(&self) -> String {
        match (&self.venv, &self.command) {
            (Some(venv), _) => venv
                .join("bin")
                .join(DEFAULT_REMOTE_COMMAND)
                .to_string_lossy()
                .into_owned(),
            (None, Some(command)) => command.clone(),
            (None, None) => DEFAULT_REMOTE_COMMAND.to_string(),
        }
    }

    /// Full `ssh` argument list that runs the local dashboard on this host.
    pub fn ssh_args(&self) -> Vec<String> {
        let mut args = vec![self.host.clone(), self.remote_program(), "local".to_string()];
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Hosts to aggregate, passed explicitly to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Hosts keyed by host key, in declaration order.
    #[serde(default)]
    pub servers: IndexMap<String, HostConfig>,
    /// Upper bound on hosts queried at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            servers: IndexMap::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // `Value` mappings reject duplicate keys; `IndexMap` alone would keep the last one.
        let config: Self = serde_yaml::from_str::<serde_yaml::Value>(text)
            .and_then(serde_yaml::from_value)
            .map_err(|e| DashboardError::Config(format!("invalid config: {}", e)))?;
        if config.max_concurrency == 0 {
            return Err(DashboardError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    pub fn with_host(mut self, key: impl Into<String>, host: HostConfig) -> Self {
        self.servers.insert(key.into(), host);
        self
    }

    pub fn hosts(&self) -> impl Iterator<Item = (&str, &HostConfig)> {
        self.servers.iter().map(|(key, host)| (key.as_str(), host))
    }

    pub fn host(&self, key: &str) -> Option<&HostConfig> {
        self.servers.get(key)
    }
}

/// Settings for building the dashboard of the host we run on.
#[derive(Debug, Clone)]
pub struct LocalOptions {
    pub experiments_path: PathBuf,
    pub creation_cutoff: String,
    pub activity_cutoff: String,
    pub format: QueueFormat,
    /// Emit the `recent` section. The minimal payload carries only `queue`.
    pub include_recent: bool,
    /// Scheduler user; falls back to `$USER`.
    pub user: Option<String>,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            experiments_path: PathBuf::from("~/experiments"),
            creation_cutoff: "1 week".to_string(),
            activity_cutoff: "1 day".to_string(),
            format: QueueFormat::Extended,
            include_recent: true,
            user: None,
        }
    }
}

impl LocalOptions {
    pub fn resolve_user(&self) -> Result<String> {
        match &self.user {
            Some(user) => Ok(user.clone()),
            None => std::env::var("USER").map_err(|_| {
                DashboardError::Config("USER is not set; pass --user".to_string())
            }),
        }
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
