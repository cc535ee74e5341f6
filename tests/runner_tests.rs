
use clusterbar::config::{DashboardConfig, HostConfig};
use clusterbar::connect::{check_host, check_hosts};
use clusterbar::error::DashboardError;
use clusterbar::runner::{CommandRunner, ProcessRunner};
use test_harness::ScriptedRunner;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[tokio::test]
async fn test_run_captures_stdout() {
    let out = ProcessRunner::new().run("sh", &sh("echo hello")).await.unwrap();
    assert_eq!(out, "hello\n");
}

#[tokio::test]
async fn test_run_empty_output_is_ok() {
    let out = ProcessRunner::new().run("sh", &sh("true")).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_nonzero_exit_carries_stderr() {
    let err = ProcessRunner::new()
        .run("sh", &sh("echo 'slurm is down' >&2; exit 3"))
        .await
        .unwrap_err();

    match err {
        DashboardError::Retrieval { message, output } => {
            assert_eq!(message, "'sh' returned non-zero exit status 3");
            assert_eq!(output.as_deref(), Some("slurm is down\n"));
        }
        other => panic!("expected retrieval error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_program_is_retrieval_error() {
    let err = ProcessRunner::new()
        .run("nonexistent_command_12345", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Retrieval { output: None, .. }));
    assert!(err.to_string().contains("nonexistent_command_12345"));
}

#[tokio::test]
async fn test_tab_separated_output_is_preserved() {
    let out = ProcessRunner::new()
        .run("sh", &sh("printf 'NAME\\tSTATE\\tTIME\\nfoo\\tRUNNING\\t1:00\\n'"))
        .await
        .unwrap();
    assert_eq!(out, "NAME\tSTATE\tTIME\nfoo\tRUNNING\t1:00\n");
}

#[tokio::test]
async fn test_connect_checks_every_host_in_order() {
    let config = DashboardConfig::default()
        .with_host("b", HostConfig::new("b.example.org", "B"))
        .with_host("a", HostConfig::new("a.example.org", "A"));
    let runner = ScriptedRunner::new()
        .stdout("ssh", "b.example.org", "")
        .fail("ssh", "a.example.org", "exit 255", "Permission denied");

    let results = check_hosts(&runner, &config).await;

    let keys: Vec<&str> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert!(results[0].result.is_ok());
    assert!(results[1].result.is_err());
    let calls = runner.calls();
    assert_eq!(calls[1].1, vec!["a.example.org", "/bin/true"]);
}

#[tokio::test]
async fn test_connect_single_host_reports_failure() {
    let host = HostConfig::new("down.example.org", "Down");
    let runner = ScriptedRunner::new().fail("ssh", "down.example.org", "exit 255", "No route to host");

    let outcome = check_host(&runner, "down", &host).await;

    assert_eq!(outcome.key, "down");
    let err = outcome.result.unwrap_err();
    assert!(err.to_string().contains("No route to host"));
}
