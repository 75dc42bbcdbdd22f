use std::fs;
use std::process::Command;

use tempfile::tempdir;

const SOLUTION: &str = "EventId,Label,Weight\nE1,s,1.0\nE2,b,2.0\nE3,s,0.5\n";
const SUBMISSION: &str = "EventId,RankOrder,Class\nE1,1,s\nE2,2,b\nE3,3,s\n";

#[test]
fn cli_scores_default_files_in_working_directory() {
    let tmp = tempdir().expect("temporary directory");
    fs::write(tmp.path().join("solution.csv"), SOLUTION).expect("write solution");
    fs::write(tmp.path().join("submission.csv"), SUBMISSION).expect("write submission");

    let exe = env!("CARGO_BIN_EXE_ams-grader");
    let output = Command::new(exe)
        .current_dir(tmp.path())
        .args(["score", "--events", "3"])
        .output()
        .expect("run ams-grader cli");

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("signal = 1.5, background = 0.0"));
    let ams_line = lines.next().expect("AMS line");
    let value: f64 = ams_line
        .strip_prefix("AMS = ")
        .expect("AMS prefix")
        .parse()
        .expect("AMS value");
    assert!((value - 0.463168).abs() < 1e-6, "unexpected AMS {value}");
}

#[test]
fn cli_reports_duplicate_ranks_and_exits_nonzero() {
    let tmp = tempdir().expect("temporary directory");
    let solution = tmp.path().join("truth.csv");
    let submission = tmp.path().join("entry.csv");
    fs::write(&solution, SOLUTION).expect("write solution");
    fs::write(
        &submission,
        "EventId,RankOrder,Class\nE1,1,s\nE2,1,b\nE3,3,s\n",
    )
    .expect("write submission");

    let exe = env!("CARGO_BIN_EXE_ams-grader");
    let output = Command::new(exe)
        .current_dir(tmp.path())
        .args([
            "score",
            solution.to_str().expect("path str"),
            submission.to_str().expect("path str"),
            "--events",
            "3",
        ])
        .output()
        .expect("run ams-grader cli");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no score may be printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("RankOrder column must contain unique values"),
        "expected cardinality diagnostic, stderr: {stderr}"
    );
}

#[test]
fn cli_reads_settings_from_config_file() {
    let tmp = tempdir().expect("temporary directory");
    fs::write(tmp.path().join("truth.csv"), SOLUTION).expect("write solution");
    fs::write(
        tmp.path().join("entry.csv"),
        "EventId,RankOrder,Class\nE1,1,s\nE2,x,b\nE3,3,s\n",
    )
    .expect("write submission");
    fs::write(
        tmp.path().join("grader.toml"),
        "solution_path = \"truth.csv\"\nsubmission_path = \"entry.csv\"\nexpected_events = 3\n",
    )
    .expect("write config");

    let exe = env!("CARGO_BIN_EXE_ams-grader");
    let legacy = Command::new(exe)
        .current_dir(tmp.path())
        .args(["score", "--config", "grader.toml"])
        .output()
        .expect("run ams-grader cli");
    assert!(
        legacy.status.success(),
        "legacy check should accept a partial permutation: {}",
        String::from_utf8_lossy(&legacy.stderr)
    );

    let strict = Command::new(exe)
        .current_dir(tmp.path())
        .args(["score", "--config", "grader.toml", "--strict-ranks"])
        .output()
        .expect("run ams-grader cli");
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("not an integer"), "stderr: {stderr}");
}

#[test]
fn cli_missing_files_fail_with_io_diagnostic() {
    let tmp = tempdir().expect("temporary directory");
    let exe = env!("CARGO_BIN_EXE_ams-grader");
    let output = Command::new(exe)
        .current_dir(tmp.path())
        .output()
        .expect("run ams-grader cli");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to read 'solution.csv'"),
        "stderr: {stderr}"
    );
}

#[test]
fn cli_writes_config_template() {
    let tmp = tempdir().expect("temporary directory");
    let exe = env!("CARGO_BIN_EXE_ams-grader");
    let output = Command::new(exe)
        .current_dir(tmp.path())
        .args(["init-config", "--out", "grader.toml"])
        .output()
        .expect("run ams-grader cli");

    assert!(output.status.success());
    let written = fs::read_to_string(tmp.path().join("grader.toml")).expect("config written");
    assert!(written.contains("expected_events = 550000"), "{written}");
    assert!(written.contains("rank_check = \"legacy\""), "{written}");
}
