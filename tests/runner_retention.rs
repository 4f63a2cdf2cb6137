// tests/runner_retention.rs

use std::fs;

use chrono::{Duration, Local};
use cronwrap::exec::RunIdentity;

use cronwrap_test_utils::builders::{run_dirs, runner_in_tempdir};
use cronwrap_test_utils::notifiers::RecordingNotifier;
use cronwrap_test_utils::{argv, init_tracing, with_timeout};

#[tokio::test]
async fn echo_hello_keeps_log_and_does_not_notify() {
    init_tracing();
    let notifier = RecordingNotifier::new();
    let sent = notifier.messages();
    let (root, runner) = runner_in_tempdir(notifier);

    let outcome = with_timeout(runner.run(&argv(&["echo", "hello"]))).await.unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.produced_output);
    assert!(outcome.retained);
    assert!(!outcome.notified);
    assert!(sent.lock().unwrap().is_empty());

    let dirs = run_dirs(root.path());
    assert_eq!(dirs.len(), 1);
    assert!(dirs[0].starts_with(root.path().join("echo")));
    assert_eq!(outcome.log_path, dirs[0].join("log"));

    let log = fs::read_to_string(&outcome.log_path).unwrap();
    let info_lines: Vec<&str> = log.lines().filter(|l| l.contains(" INFO : ")).collect();
    assert_eq!(info_lines.len(), 1);
    assert!(info_lines[0].ends_with(" INFO : hello"));
    assert!(log.contains("DEBUG : Starting cron \"echo/"));
    assert!(log.contains("exit 0 after"));
}

#[tokio::test]
async fn silent_success_removes_run_directory() {
    init_tracing();
    let (root, runner) = runner_in_tempdir(RecordingNotifier::new());

    let outcome = with_timeout(runner.run(&argv(&["true"]))).await.unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert!(!outcome.produced_output);
    assert!(!outcome.retained);
    assert!(!outcome.log_path.exists());
    assert!(run_dirs(root.path()).is_empty());
}

#[tokio::test]
async fn silent_failure_is_removed_but_still_notified() {
    init_tracing();
    let notifier = RecordingNotifier::new();
    let sent = notifier.messages();
    let (root, runner) = runner_in_tempdir(notifier);

    let outcome = with_timeout(runner.run(&argv(&["false"]))).await.unwrap();

    assert_eq!(outcome.exit_code, 1);
    assert!(!outcome.retained);
    assert!(outcome.notified);
    assert!(run_dirs(root.path()).is_empty());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let msg = &sent[0];
    assert!(msg.starts_with("Cron false/"));
    assert!(msg.contains("completed with status 1."));
    assert!(msg.contains("DEBUG : Starting cron"));
    assert!(msg.contains("exit 1 after"));
}

#[tokio::test]
async fn stderr_only_output_is_kept_at_error_level() {
    init_tracing();
    let (_root, runner) = runner_in_tempdir(RecordingNotifier::new());

    let outcome = with_timeout(runner.run(&argv(&["sh", "-c", "echo warning >&2"])))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.retained);
    let log = fs::read_to_string(&outcome.log_path).unwrap();
    assert!(log.contains(" ERROR : warning\n"));
    assert!(!log.contains(" INFO : "));
}

#[tokio::test]
async fn failing_command_with_output_is_kept() {
    init_tracing();
    let (_root, runner) = runner_in_tempdir(RecordingNotifier::new());

    let outcome = with_timeout(runner.run(&argv(&["sh", "-c", "echo partial; exit 4"])))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 4);
    assert!(outcome.retained);
    assert!(outcome.log_path.is_file());
}

#[tokio::test]
async fn output_written_after_the_child_exits_is_not_lost() {
    init_tracing();
    let (_root, runner) = runner_in_tempdir(RecordingNotifier::new());

    // The background writer outlives the direct child and keeps the pipe
    // open; capture has to run until EOF, not until exit.
    let script = "(sleep 0.2; echo late) & echo early";
    let outcome = with_timeout(runner.run(&argv(&["sh", "-c", script])))
        .await
        .unwrap();

    let log = fs::read_to_string(&outcome.log_path).unwrap();
    assert!(log.contains(" INFO : early\n"));
    assert!(log.contains(" INFO : late\n"));
}

#[tokio::test]
async fn shell_wrapped_jobs_are_named_after_the_script() {
    init_tracing();
    let (root, runner) = runner_in_tempdir(RecordingNotifier::new());
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("nightly.sh");
    fs::write(&script, "echo ran\n").unwrap();

    let outcome = with_timeout(runner.run(&argv(&["sh", script.to_str().unwrap()])))
        .await
        .unwrap();

    assert!(outcome.run_key.starts_with("nightly.sh/"));
    assert!(root.path().join("nightly.sh").is_dir());
}

#[tokio::test]
async fn repeated_runs_within_a_second_get_separate_directories() {
    init_tracing();
    let (root, runner) = runner_in_tempdir(RecordingNotifier::new());

    let first = with_timeout(runner.run(&argv(&["echo", "a"]))).await.unwrap();
    let second = with_timeout(runner.run(&argv(&["echo", "b"]))).await.unwrap();

    assert_ne!(first.log_path, second.log_path);
    assert_eq!(run_dirs(root.path()).len(), 2);
    for outcome in [&first, &second] {
        assert_eq!(root.path().join(&outcome.run_key).join("log"), outcome.log_path);
    }
    assert!(fs::read_to_string(&first.log_path).unwrap().contains(" INFO : a\n"));
    assert!(fs::read_to_string(&second.log_path).unwrap().contains(" INFO : b\n"));
}

#[tokio::test]
async fn unusable_log_root_aborts_before_starting_the_command() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let marker = tmp.path().join("ran");

    let runner = cronwrap::exec::ProcessRunner::new(
        &blocker,
        Box::new(RecordingNotifier::new()),
        std::time::Duration::from_secs(1),
    );

    let cmd = format!("touch {}", marker.display());
    let result = with_timeout(runner.run(&argv(&["sh", "-c", &cmd]))).await;

    assert!(result.is_err());
    assert!(!marker.exists(), "command must not run without a log sink");
}

#[tokio::test]
async fn suffixed_directory_is_the_one_reported_and_notified() {
    init_tracing();
    let notifier = RecordingNotifier::new();
    let sent = notifier.messages();
    let (root, runner) = runner_in_tempdir(notifier);
    let args = argv(&["sh", "-c", "echo X; exit 2"]);

    // Occupy the plain timestamp directories for the next few seconds so the
    // run has to take a suffixed one.
    let now = Local::now();
    for offset in 0..3 {
        let id = RunIdentity::new(args.as_slice(), now + Duration::seconds(offset));
        fs::create_dir_all(root.path().join(id.run_key())).unwrap();
    }

    let outcome = with_timeout(runner.run(&args)).await.unwrap();

    assert!(outcome.run_key.ends_with("-1"), "run_key: {}", outcome.run_key);
    assert_eq!(root.path().join(&outcome.run_key).join("log"), outcome.log_path);
    assert!(outcome.log_path.is_file());

    let log = fs::read_to_string(&outcome.log_path).unwrap();
    assert!(log.contains(&format!("Starting cron \"{}\"", outcome.run_key)));
    assert!(log.contains(&format!("Cron \"{}\" exit 2", outcome.run_key)));

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with(&format!("Cron {} completed with status 2.", outcome.run_key)));
}
