use chrono::NaiveDateTime;

use crate::error::{DashboardError, Result};
use crate::runner::CommandRunner;
use crate::scheduler::job::{Job, JobStatus};

const SQUEUE: &str = "squeue";

/// Column layout requested from `squeue -o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueFormat {
    /// Name, state, time left.
    Minimal,
    /// Name, state, time left, start timestamp.
    #[default]
    Extended,
}

impl QueueFormat {
    pub fn field_count(self) -> usize {
        match self {
            QueueFormat::Minimal => 3,
            QueueFormat::Extended => 4,
        }
    }

    pub fn squeue_format(self) -> &'static str {
        match self {
            QueueFormat::Minimal => "%j\t%T\t%L",
            QueueFormat::Extended => "%j\t%T\t%L\t%V",
        }
    }
}

/// Parse tab-separated `squeue` output into jobs, preserving input order.
///
/// The first line is the header and is always discarded. Blank lines and lines with the
/// wrong number of fields are skipped. In the extended layout an unparseable start
/// timestamp is an error: it means the scheduler broke the output contract.
pub fn parse_queue(output: &str, format: QueueFormat, now: NaiveDateTime) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();

    for line in output.trim().lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() != format.field_count() {
            tracing::debug!(line, expected = format.field_count(), "Skipping malformed queue line");
            continue;
        }

        let job = Job::new(parts[0], JobStatus::from(parts[1]), parts[2]);
        let job = match format {
            QueueFormat::Minimal => job,
            QueueFormat::Extended => job.with_start(parse_start_time(parts[3])?, now),
        };
        jobs.push(job);
    }

    Ok(jobs)
}

fn parse_start_time(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|source| DashboardError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Run `squeue` for `user` and parse its output.
///
/// A non-zero exit surfaces as [`DashboardError::Retrieval`], never as an empty queue.
pub async fn fetch_queue(
    runner: &dyn CommandRunner,
    user: &str,
    format: QueueFormat,
    now: NaiveDateTime,
) -> Result<Vec<Job>> {
    let args = vec![
        "-u".to_string(),
        user.to_string(),
        "-o".to_string(),
        format.squeue_format().to_string(),
    ];

    let stdout = runner.run(SQUEUE, &args).await.map_err(|e| match e {
        DashboardError::Retrieval { message, output } => DashboardError::Retrieval {
            message: format!("Error retrieving queue: {}", message),
            output,
        },
        other => other,
    })?;

    let jobs = parse_queue(&stdout, format, now)?;
    tracing::debug!(user, jobs = jobs.len(), "Fetched scheduler queue");
    Ok(jobs)
}
