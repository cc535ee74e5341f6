use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::config::DashboardConfig;
use crate::dashboard::{AggregatedDashboard, Dashboard};
use crate::experiments::Experiment;
use crate::render::delta::natural_delta;
use crate::scheduler::{Job, JobStatus};

/// Script on the cluster that follows a job's log, opened from job and experiment items.
pub const TAIL_LOG_SCRIPT: &str = "~/rc/tail-log.sh";

/// How the menu items invoke this binary again (for the `Connect` action).
#[derive(Debug, Clone)]
pub struct SelfInvocation {
    pub executable: String,
    pub config_file: String,
}

/// Render the aggregated dashboard as SwiftBar plugin output.
///
/// Hosts appear in configuration order. A host without an entry in `dashboards` renders as
/// an error rather than disappearing.
pub fn render(
    config: &DashboardConfig,
    dashboards: &AggregatedDashboard,
    invocation: &SelfInvocation,
    now: NaiveDateTime,
) -> String {
    let mut out = String::new();
    let missing = Dashboard::failed("No data", None);

    line(&mut out, ":computer: Cluster | emojize=True symbolize=False");
    for (key, host) in config.hosts() {
        let dashboard = dashboards.get(key).unwrap_or(&missing);

        line(&mut out, "---");
        line(&mut out, &format!("**{}** | color='blue' md=true", host.label));
        line(&mut out, "---");

        if dashboard.queue.is_empty() && !dashboard.is_error() {
            line(&mut out, "Empty");
        }
        if let Some(error) = &dashboard.error {
            line(&mut out, &format!("Error: {} | color=red", single_line(error)));
        }
        for job in &dashboard.queue {
            line(
                &mut out,
                &format!(
                    "{} {}",
                    format_job_label(job),
                    tail_log_action(&host.host, &job.job_name)
                ),
            );
        }

        line(&mut out, "---");
        for experiment in dashboard.recent() {
            line(
                &mut out,
                &format!(
                    "{} {}",
                    format_experiment_label(experiment, now),
                    tail_log_action(&host.host, &experiment.experiment_name)
                ),
            );
        }

        line(
            &mut out,
            &format!(
                ":computer: Shell | emojize=True symbolize=False bash=ssh param0='{}' terminal=True",
                host.host
            ),
        );
    }

    line(&mut out, "---");
    line(
        &mut out,
        ":arrows_counterclockwise: Refresh | refresh=true emojize=True symbolize=False",
    );
    line(
        &mut out,
        &format!(
            ":link: Connect | emojize=True symbolize=False bash='{}' param0='--config-file' \
             param1='{}' param2='connect' terminal=True",
            invocation.executable, invocation.config_file
        ),
    );
    out
}

pub fn format_job_label(job: &Job) -> String {
    let (icon, time_ind) = match &job.status {
        JobStatus::Running => (":rocket:", job.time_left.clone()),
        JobStatus::Pending => {
            let pending = job.time_pending.as_deref().unwrap_or(&job.time_left);
            (
                ":hourglass_flowing_sand:",
                format!(":clock2: {}", strip_fraction(pending)),
            )
        }
        JobStatus::Other(_) => (":warning:", ":bangbang:".to_string()),
    };
    format!("{} {} ({})", icon, job.job_name, time_ind)
}

pub fn format_experiment_label(experiment: &Experiment, now: NaiveDateTime) -> String {
    format!(
        " :red_circle: {} ({})",
        experiment.experiment_name,
        natural_delta(now - experiment.time_activity)
    )
}

fn tail_log_action(host: &str, name: &str) -> String {
    format!(
        "| emojize=True symbolize=False color='yellow' bash='ssh' param0='{}' \
         param1=\"'{}'\" param2='{}' terminal=true",
        host, TAIL_LOG_SCRIPT, name
    )
}

/// Drop a trailing `.123456` fraction from a duration string.
fn strip_fraction(duration: &str) -> &str {
    match duration.rfind('.') {
        Some(idx)
            if idx + 1 < duration.len()
                && duration[idx + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &duration[..idx]
        }
        _ => duration,
    }
}

// SwiftBar treats every newline as a new menu item.
fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

fn line(out: &mut String, text: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", text);
}
