
use chrono::NaiveDate;

use clusterbar::error::DashboardError;
use clusterbar::scheduler::{fetch_queue, parse_queue, JobStatus, QueueFormat};
use test_harness::{local_now, ScriptedRunner};

const MINIMAL: &str = "NAME\tSTATE\tTIME\nfoo\tRUNNING\t1:00:00\nbar\tPENDING\t-\n";

#[test]
fn test_well_formed_lines_all_parse() {
    let mut raw = String::from("JOBNAME\tSTATE\tTIME_LEFT\n");
    for i in 0..25 {
        raw.push_str(&format!("job-{}\tRUNNING\t{}:00:00\n", i, i));
        if i % 5 == 0 {
            raw.push('\n');
        }
    }

    let jobs = parse_queue(&raw, QueueFormat::Minimal, local_now()).unwrap();
    assert_eq!(jobs.len(), 25);
    assert_eq!(jobs[0].job_name, "job-0");
    assert_eq!(jobs[24].job_name, "job-24");
}

#[test]
fn test_malformed_lines_do_not_stop_parsing() {
    let raw = "NAME\tSTATE\tTIME\n\
               onlytwo\tfields\n\
               foo\tRUNNING\t1:00:00\n\
               too\tmany\tfields\there\n\
               bar\tPENDING\t-\n";

    let jobs = parse_queue(raw, QueueFormat::Minimal, local_now()).unwrap();
    let names: Vec<&str> = jobs.iter().map(|j| j.job_name.as_str()).collect();
    assert_eq!(names, vec!["foo", "bar"]);
}

#[tokio::test]
async fn test_fetch_queue_runs_squeue_for_user() {
    let runner = ScriptedRunner::new().stdout("squeue", "-u", MINIMAL);

    let jobs = fetch_queue(&runner, "alice", QueueFormat::Minimal, local_now())
        .await
        .unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].status, JobStatus::Running);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "squeue");
    assert_eq!(calls[0].1, vec!["-u", "alice", "-o", "%j\t%T\t%L"]);
}

#[tokio::test]
async fn test_fetch_queue_extended_requests_start_time() {
    let raw = "NAME\tSTATE\tTIME_LEFT\tSUBMIT_TIME\nsweep\tPENDING\t2:00:00\t2024-01-15T10:30:00\n";
    let runner = ScriptedRunner::new().stdout("squeue", "-u", raw);
    let now = NaiveDate::from_ymd_opt(2024, 1, 16)
        .unwrap()
        .and_hms_opt(10, 30, 5)
        .unwrap();

    let jobs = fetch_queue(&runner, "alice", QueueFormat::Extended, now)
        .await
        .unwrap();

    assert_eq!(jobs[0].time_pending.as_deref(), Some("1 day, 0:00:05"));
    assert_eq!(runner.calls()[0].1[3], "%j\t%T\t%L\t%V");
}

#[tokio::test]
async fn test_failed_squeue_is_not_an_empty_queue() {
    let runner = ScriptedRunner::new().fail(
        "squeue",
        "-u",
        "'squeue' returned non-zero exit status 1",
        "slurm_load_jobs error: Unable to contact slurm controller",
    );

    let err = fetch_queue(&runner, "alice", QueueFormat::Minimal, local_now())
        .await
        .unwrap_err();

    match err {
        DashboardError::Retrieval { message, output } => {
            assert!(message.starts_with("Error retrieving queue:"));
            assert!(output.unwrap().contains("Unable to contact slurm controller"));
        }
        other => panic!("expected retrieval error, got {:?}", other),
    }
}
