// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for the sweep subcommand (batch run post-processing)

use cert_lab::sweep::{self, SweepConfig};
use std::fs;
use tempfile::TempDir;

fn make_run(parent: &std::path::Path, name: &str, properties: &str, log: Option<&str>) {
    let run = parent.join(name);
    fs::create_dir_all(&run).unwrap();
    fs::write(run.join("properties"), properties).unwrap();
    if let Some(body) = log {
        fs::write(run.join("run.log"), body).unwrap();
    }
}

#[test]
fn test_sweep_empty_directory() {
    let dir = TempDir::new().unwrap();
    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };

    let report = sweep::run(&config).expect("sweep should succeed on empty dir");
    assert_eq!(report.runs_processed, 0);
    assert_eq!(report.parse_errors, 0);
    assert!(report.results.is_empty());
}

#[test]
fn test_sweep_discovers_runs_with_properties_only() {
    let dir = TempDir::new().unwrap();

    make_run(dir.path(), "runs-00001/00001", r#"{"algorithm": "hmax"}"#, None);

    // A directory without a properties file is not a run.
    fs::create_dir_all(dir.path().join("not-a-run")).unwrap();
    fs::write(dir.path().join("not-a-run/notes.txt"), "hello").unwrap();

    // A plain file is ignored.
    fs::write(dir.path().join("stray-file.txt"), "hello").unwrap();

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };

    let report = sweep::run(&config).expect("sweep should succeed");
    assert_eq!(
        report.runs_processed, 1,
        "should only discover the directory holding a properties file"
    );
}

#[test]
fn test_sweep_enriches_valid_certificate_run() {
    let dir = TempDir::new().unwrap();
    make_run(
        dir.path(),
        "00001",
        r#"{"algorithm": "hmax-certifying", "problem": "prob03.pddl", "search_time": 100.0}"#,
        Some(
            "Verify total time: 12.5\n\
             Time for writing unsolvability certificate: 5.0\n\
             Exiting: certificate is valid\n",
        ),
    );

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };
    let report = sweep::run(&config).expect("sweep should succeed");

    assert_eq!(report.parse_errors, 0);
    assert_eq!(report.valid_certificates, 1);
    assert_eq!(report.invalid_certificates, 0);

    let records = report.records();
    assert_eq!(records.len(), 1);
    let record = records[0];
    assert_eq!(record.get_str("unsolv_is_certificate"), Some("yes"));
    assert_eq!(record.get_float("unsolv_total_time"), Some(12.5));
    assert_eq!(record.get_int("verify_finished"), Some(1));
    assert_eq!(record.get_int("valid_certificate"), Some(1));
    assert_eq!(record.get_int("invalid_certificate"), Some(0));
    // search_time came from properties, write_cert_time from the log.
    assert_eq!(record.get_float("search_time_wo_cert"), Some(95.0));
}

#[test]
fn test_sweep_flags_timed_out_verifier() {
    let dir = TempDir::new().unwrap();
    // A timed-out verifier never printed a certificate line.
    make_run(
        dir.path(),
        "00002",
        r#"{"algorithm": "mas-certifying", "verify_returncode": 7}"#,
        Some("abort time 1800s\nExiting: Timeout reached\n"),
    );

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };
    let report = sweep::run(&config).expect("sweep should succeed");

    assert_eq!(report.timeouts, 1);
    let records = report.records();
    let record = records[0];
    assert_eq!(record.get_int("verify_timeout"), Some(1));
    assert_eq!(record.get_int("verify_oom"), Some(0));
    assert_eq!(record.get_str("unsolv_is_certificate"), Some("unknown"));
    assert_eq!(record.get_int("verify_finished"), Some(0));
    assert_eq!(record.get_float("unsolv_abort_time"), Some(1800.0));
}

#[test]
fn test_sweep_run_without_log_still_enriched() {
    let dir = TempDir::new().unwrap();
    make_run(
        dir.path(),
        "00003",
        r#"{"algorithm": "hmax", "verify_returncode": 6}"#,
        None,
    );

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };
    let report = sweep::run(&config).expect("sweep should succeed");

    let records = report.records();
    let record = records[0];
    assert_eq!(record.get_int("verify_oom"), Some(1));
    assert_eq!(record.get_int("verify_timeout"), Some(0));
    assert_eq!(record.get_str("unsolv_is_certificate"), Some("unknown"));
}

#[test]
fn test_sweep_isolates_per_run_parse_errors() {
    let dir = TempDir::new().unwrap();

    // Log without the required exit message: parse error for this run.
    make_run(
        dir.path(),
        "00001",
        r#"{"algorithm": "hmax"}"#,
        Some("Verify total time: 3.0\n"),
    );
    make_run(
        dir.path(),
        "00002",
        r#"{"algorithm": "hmax"}"#,
        Some("Exiting: certificate is valid\n"),
    );

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };
    let report = sweep::run(&config).expect("sweep should keep going past bad runs");

    assert_eq!(report.runs_processed, 2);
    assert_eq!(report.parse_errors, 1);
    assert_eq!(report.records().len(), 1);

    let failed = report.results.iter().find(|r| r.error.is_some()).unwrap();
    assert!(
        failed.error.as_deref().unwrap().contains("unsolv_exit_message"),
        "error should name the missing required attribute"
    );
}

#[test]
fn test_sweep_write_back_updates_properties() {
    let dir = TempDir::new().unwrap();
    make_run(
        dir.path(),
        "00001",
        r#"{"algorithm": "hmax", "verify_returncode": 7}"#,
        None,
    );

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: true,
    };
    sweep::run(&config).expect("sweep should succeed");

    let content = fs::read_to_string(dir.path().join("00001/properties")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["verify_timeout"], 1);
    assert_eq!(parsed["verify_oom"], 0);
    assert_eq!(parsed["unsolv_is_certificate"], "unknown");
    // Original keys survive the rewrite.
    assert_eq!(parsed["algorithm"], "hmax");
}

#[test]
fn test_sweep_write_report() {
    let dir = TempDir::new().unwrap();
    make_run(
        dir.path(),
        "00001",
        r#"{"algorithm": "hmax"}"#,
        Some("Exiting: certificate is not valid\n"),
    );

    let config = SweepConfig {
        directory: dir.path().to_path_buf(),
        write_back: false,
    };
    let report = sweep::run(&config).expect("sweep should succeed");
    assert_eq!(report.invalid_certificates, 1);

    let output_path = dir.path().join("sweep-output.json");
    sweep::write_report(&report, &output_path).expect("write_report should succeed");

    let content = fs::read_to_string(&output_path).expect("should read output file");
    let parsed: serde_json::Value =
        serde_json::from_str(&content).expect("should be valid JSON");

    assert!(parsed["runs_processed"].is_number());
    assert!(parsed["results"].is_array());
}

#[test]
fn test_sweep_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("not-a-dir.txt");
    fs::write(&file_path, "hello").unwrap();

    let config = SweepConfig {
        directory: file_path,
        write_back: false,
    };

    let result = sweep::run(&config);
    assert!(
        result.is_err(),
        "sweep should error when given a file instead of a directory"
    );
}
