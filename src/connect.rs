use crate::config::{DashboardConfig, HostConfig};
use crate::error::Result;
use crate::runner::CommandRunner;

/// Outcome of probing one host.
#[derive(Debug)]
pub struct ConnectResult {
    pub key: String,
    pub result: Result<()>,
}

/// Run `ssh <host> /bin/true` against a single host.
pub async fn check_host(runner: &dyn CommandRunner, key: &str, host: &HostConfig) -> ConnectResult {
    let args = vec![host.host.clone(), "/bin/true".to_string()];
    let result = runner.run("ssh", &args).await.map(|_| ());

    if let Err(e) = &result {
        tracing::warn!(host = %key, error = %e, "Connection check failed");
    }

    ConnectResult {
        key: key.to_string(),
        result,
    }
}

/// Check each host in declaration order. Failures do not stop the sweep.
pub async fn check_hosts(runner: &dyn CommandRunner, config: &DashboardConfig) -> Vec<ConnectResult> {
    let mut results = Vec::new();
    for (key, host) in config.hosts() {
        results.push(check_host(runner, key, host).await);
    }
    results
}
