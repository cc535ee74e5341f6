use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Scheduler job state as reported by `squeue %T`.
///
/// Only `RUNNING` and `PENDING` drive rendering decisions; every other state is kept
/// verbatim so it survives the trip across hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Running,
    Pending,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Running => "RUNNING",
            JobStatus::Pending => "PENDING",
            JobStatus::Other(state) => state,
        }
    }
}

impl From<String> for JobStatus {
    fn from(state: String) -> Self {
        match state.as_str() {
            "RUNNING" => JobStatus::Running,
            "PENDING" => JobStatus::Pending,
            _ => JobStatus::Other(state),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(state: &str) -> Self {
        JobStatus::from(state.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_name: String,
    pub status: JobStatus,
    /// Remaining wall time, verbatim from the scheduler (`1:00:00`, `-`, `UNLIMITED`).
    pub time_left: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_started: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_pending: Option<String>,
}

impl Job {
    pub fn new(job_name: impl Into<String>, status: JobStatus, time_left: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            status,
            time_left: time_left.into(),
            time_started: None,
            time_pending: None,
        }
    }

    /// Attach the start timestamp, deriving `time_pending` for pending jobs.
    pub fn with_start(mut self, time_started: NaiveDateTime, now: NaiveDateTime) -> Self {
        self.time_pending = match self.status {
            JobStatus::Pending => Some(format_pending(now - time_started)),
            _ => None,
        };
        self.time_started = Some(time_started);
        self
    }
}

/// Formats a duration as `[N day[s], ]H:MM:SS`, dropping sub-second precision.
/// Negative durations clamp to zero.
pub fn format_pending(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    let clock = format!("{}:{:02}:{:02}", hours, minutes, seconds);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn status_round_trips_unknown_states() {
        assert_eq!(JobStatus::from("RUNNING"), JobStatus::Running);
        assert_eq!(JobStatus::from("PENDING"), JobStatus::Pending);
        let other = JobStatus::from("COMPLETING");
        assert_eq!(other, JobStatus::Other("COMPLETING".to_string()));
        assert_eq!(String::from(other), "COMPLETING");
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&JobStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let status: JobStatus = serde_json::from_str("\"SUSPENDED\"").unwrap();
        assert_eq!(status.as_str(), "SUSPENDED");
    }

    #[test]
    fn pending_job_gets_pending_duration() {
        let job = Job::new("train", JobStatus::Pending, "2:00:00").with_start(at(10, 0, 0), at(11, 2, 3));
        assert_eq!(job.time_pending.as_deref(), Some("1:02:03"));
        assert_eq!(job.time_started, Some(at(10, 0, 0)));
    }

    #[test]
    fn running_job_has_no_pending_duration() {
        let job = Job::new("train", JobStatus::Running, "2:00:00").with_start(at(10, 0, 0), at(11, 0, 0));
        assert!(job.time_pending.is_none());
        assert!(job.time_started.is_some());
    }

    #[test]
    fn format_pending_strips_subseconds_and_counts_days() {
        assert_eq!(format_pending(TimeDelta::milliseconds(5_750)), "0:00:05");
        assert_eq!(format_pending(TimeDelta::seconds(86_400 + 61)), "1 day, 0:01:01");
        assert_eq!(format_pending(TimeDelta::days(3)), "3 days, 0:00:00");
    }

    #[test]
    fn format_pending_clamps_negative() {
        assert_eq!(format_pending(TimeDelta::seconds(-30)), "0:00:00");
    }

    #[test]
    fn minimal_job_omits_optional_fields() {
        let job = Job::new("foo", JobStatus::Running, "1:00:00");
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"job_name": "foo", "status": "RUNNING", "time_left": "1:00:00"})
        );
    }
}
