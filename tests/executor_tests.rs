//! Integration tests for the command executor

mod common;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use common::{exit, out, FakeConnector, Reply};
use hostkit::{ExecError, ExecOptions, Executor};

#[tokio::test]
async fn run_combines_stdout_then_stderr() {
    let connector = FakeConnector::new().reply(
        "greet",
        Reply::Output("hello".to_string(), "warning".to_string()),
    );
    let executor = Executor::new(connector);

    let output = executor.run("greet", false).await.unwrap();
    assert_eq!(output, "hello\nwarning");
}

#[tokio::test]
async fn run_returns_command_error_unchanged() {
    let connector = FakeConnector::new().reply("broken", exit(2, "no such unit"));
    let executor = Executor::new(connector);

    let err = executor.run("broken", false).await.unwrap_err();
    let cmd = err.as_command_exit().expect("expected command-exit error");
    assert_eq!(cmd.exit_code, 2);
    assert_eq!(cmd.stderr, "no such unit");
}

#[tokio::test]
async fn check_distinguishes_exit_from_transport() {
    let connector = FakeConnector::new()
        .reply("inactive-unit", exit(3, "inactive"))
        .reply("lost", Reply::Transport("connection reset".to_string()))
        .reply("active-unit", out(""));
    let executor = Executor::new(connector);

    assert!(executor.check("active-unit", false).await.unwrap());
    assert!(!executor.check("inactive-unit", false).await.unwrap());
    assert!(matches!(
        executor.check("lost", false).await,
        Err(ExecError::Transport { .. })
    ));
}

#[tokio::test]
async fn run_with_options_applies_sudo_prefix_once_and_forwards_stdin() {
    let connector = FakeConnector::new();
    let executor = Executor::new(connector);

    let options = ExecOptions {
        sudo: true,
        timeout: None,
        stdin: Some("payload".to_string()),
    };
    executor
        .run_with_options("systemctl start nginx", &options)
        .await
        .unwrap();

    let calls = executor.connector().calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("sudo -E sh -c "));
    assert_eq!(calls[0].matches("sudo").count(), 1);

    let forwarded = executor.connector().last_options().unwrap();
    assert!(!forwarded.sudo, "sudo must not be applied a second time");
    assert_eq!(forwarded.stdin.as_deref(), Some("payload"));
}

#[tokio::test]
async fn run_with_options_rejects_empty_command_locally() {
    let executor = Executor::new(FakeConnector::new());

    let err = executor
        .run_with_options("   ", &ExecOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Policy { .. }));
    assert_eq!(executor.connector().calls().len(), 0);
}

#[tokio::test]
async fn run_with_options_bounds_a_hanging_connector() {
    let connector = FakeConnector::new().reply("slow", Reply::Hang);
    let executor = Executor::new(connector);

    let options = ExecOptions {
        timeout: Some(Duration::from_millis(50)),
        ..Default::default()
    };
    let err = executor.run_with_options("slow", &options).await.unwrap_err();
    assert!(matches!(err, ExecError::Timeout { .. }));
}

#[tokio::test]
async fn run_retry_succeeds_on_third_attempt() {
    let connector = FakeConnector::new().reply(
        "flaky",
        Reply::FailThenSucceed {
            failures: 2,
            stdout: "done".to_string(),
        },
    );
    let executor = Executor::new(connector);
    let cancel = CancellationToken::new();

    let output = executor
        .run_retry("flaky", false, 2, Duration::from_millis(5), &cancel)
        .await
        .unwrap();
    assert_eq!(output, "done");
    assert_eq!(executor.connector().invocations_matching("flaky"), 3);
}

#[tokio::test]
async fn run_retry_reports_attempt_count_on_exhaustion() {
    let connector = FakeConnector::new().reply("doomed", exit(1, "still broken"));
    let executor = Executor::new(connector);
    let cancel = CancellationToken::new();

    let err = executor
        .run_retry("doomed", false, 2, Duration::from_millis(5), &cancel)
        .await
        .unwrap_err();
    match err {
        ExecError::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(source.as_command_exit().is_some());
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(executor.connector().invocations_matching("doomed"), 3);
}

#[tokio::test]
async fn run_retry_aborts_immediately_when_already_cancelled() {
    let executor = Executor::new(FakeConnector::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = executor
        .run_retry("anything", false, 5, Duration::from_secs(30), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Cancelled { last_error: None }));
    assert_eq!(executor.connector().calls().len(), 0);
}

#[tokio::test]
async fn run_retry_cancellation_interrupts_the_delay_and_wraps_last_error() {
    let connector = FakeConnector::new().reply("doomed", exit(1, "still broken"));
    let executor = Executor::new(connector);
    let cancel = CancellationToken::new();

    let (result, _) = tokio::join!(
        executor.run_retry("doomed", false, 5, Duration::from_secs(60), &cancel),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        }
    );

    match result.unwrap_err() {
        ExecError::Cancelled { last_error } => {
            let wrapped = last_error.expect("expected the last command error to be wrapped");
            assert!(wrapped.as_command_exit().is_some());
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(executor.connector().invocations_matching("doomed"), 1);
}

#[tokio::test]
async fn run_in_background_prefers_nohup() {
    let connector = FakeConnector::new().tool("nohup");
    let executor = Executor::new(connector);

    executor.run_in_background("sleep 600", false).await.unwrap();

    let calls = executor.connector().calls();
    assert!(calls.contains(&"lookup:nohup".to_string()));
    let launch = calls.last().unwrap();
    assert!(launch.starts_with("nohup sh -c "));
    assert!(launch.ends_with(">/dev/null 2>&1 &"));
}

#[tokio::test]
async fn run_in_background_falls_back_to_subshell_detach() {
    let executor = Executor::new(FakeConnector::new());

    executor.run_in_background("sleep 600", false).await.unwrap();

    let calls = executor.connector().calls();
    let launch = calls.last().unwrap();
    assert!(launch.starts_with("( sh -c "));
    assert!(launch.ends_with("& )"));
}
