// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sweep: batch post-processing of a completed experiment directory
//!
//! Walks an experiment directory, treats every subdirectory holding a
//! `properties` file as one run, and for each run parses the verifier
//! log, applies the derivation pipeline, and optionally writes the
//! enriched record back. Runs are processed strictly one at a time; a
//! run that fails to parse is recorded with its error and skipped, the
//! sweep itself keeps going.

use crate::enrich;
use crate::parser::rules::verifier_parser;
use crate::types::RunRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the per-run key-value file, as written by the experiment driver.
const PROPERTIES_FILE: &str = "properties";
/// Name of the per-run combined output log.
const RUN_LOG_FILE: &str = "run.log";

/// Configuration for a sweep run
pub struct SweepConfig {
    /// Experiment directory containing the run directories
    pub directory: PathBuf,
    /// Write enriched records back to each run's `properties` file
    pub write_back: bool,
}

/// Outcome of post-processing a single run directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_dir: PathBuf,
    pub algorithm: Option<String>,
    pub problem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub record: Option<RunRecord>,
}

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub created_at: String,
    pub directory: PathBuf,
    pub runs_processed: usize,
    pub parse_errors: usize,
    pub valid_certificates: usize,
    pub invalid_certificates: usize,
    pub timeouts: usize,
    pub results: Vec<RunResult>,
}

impl SweepReport {
    /// Successfully processed records, in run-directory order.
    pub fn records(&self) -> Vec<&RunRecord> {
        self.results
            .iter()
            .filter_map(|r| r.record.as_ref())
            .collect()
    }
}

/// Find all run directories under the experiment directory.
fn discover_runs(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        anyhow::bail!("Not a directory: {}", directory.display());
    }

    let mut runs = Vec::new();
    for entry in WalkDir::new(directory).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() && entry.path().join(PROPERTIES_FILE).is_file() {
            runs.push(entry.path().to_path_buf());
        }
    }

    runs.sort();
    Ok(runs)
}

/// Parse and enrich one run. The properties file must exist and hold a
/// JSON object; the run log is optional (a crashed run may not have
/// produced one), in which case only the derivation pipeline applies.
pub fn process_run(run_dir: &Path, write_back: bool) -> Result<RunRecord> {
    let props_path = run_dir.join(PROPERTIES_FILE);
    let content = fs::read_to_string(&props_path)
        .with_context(|| format!("reading {}", props_path.display()))?;
    let mut record: RunRecord = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", props_path.display()))?;

    let log_path = run_dir.join(RUN_LOG_FILE);
    if log_path.is_file() {
        let parser = verifier_parser()?;
        parser.parse_file(&log_path, &mut record)?;
    }

    enrich::apply_all(&mut record);

    if write_back {
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&props_path, json)
            .with_context(|| format!("writing {}", props_path.display()))?;
    }

    Ok(record)
}

/// Run the sweep across all runs in an experiment directory.
pub fn run(config: &SweepConfig) -> Result<SweepReport> {
    let runs = discover_runs(&config.directory)?;
    let mut results: Vec<RunResult> = Vec::new();

    for run_dir in &runs {
        match process_run(run_dir, config.write_back) {
            Ok(record) => {
                results.push(RunResult {
                    run_dir: run_dir.clone(),
                    algorithm: record.get_str("algorithm").map(str::to_string),
                    problem: record.get_str("problem").map(str::to_string),
                    error: None,
                    record: Some(record),
                });
            }
            Err(e) => {
                results.push(RunResult {
                    run_dir: run_dir.clone(),
                    algorithm: None,
                    problem: None,
                    error: Some(format!("{:#}", e)),
                    record: None,
                });
            }
        }
    }

    let parse_errors = results.iter().filter(|r| r.error.is_some()).count();
    let count_flag = |key: &str| {
        results
            .iter()
            .filter_map(|r| r.record.as_ref())
            .filter(|rec| rec.get_int(key) == Some(1))
            .count()
    };
    let valid_certificates = count_flag("valid_certificate");
    let invalid_certificates = count_flag("invalid_certificate");
    let timeouts = count_flag("verify_timeout");

    Ok(SweepReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: config.directory.clone(),
        runs_processed: runs.len(),
        parse_errors,
        valid_certificates,
        invalid_certificates,
        timeouts,
        results,
    })
}

/// Print a summary table to the terminal
pub fn print_summary(report: &SweepReport, quiet: bool) {
    if quiet {
        return;
    }

    println!("\n=== SWEEP SUMMARY ===");
    println!(
        "Directory: {}  |  Runs: {}  |  Parse errors: {}",
        report.directory.display(),
        report.runs_processed,
        report.parse_errors
    );
    println!(
        "Valid certificates: {}  |  Invalid: {}  |  Timeouts: {}",
        report.valid_certificates, report.invalid_certificates, report.timeouts
    );
    println!();

    if report.results.is_empty() {
        println!("  No run directories found.");
        return;
    }

    println!(
        "  {:<28} {:<20} {:>10} {:>10}",
        "Run", "Algorithm", "Status", "Time"
    );
    println!("  {}", "-".repeat(72));

    for result in &report.results {
        let run_name = result
            .run_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| result.run_dir.display().to_string());

        if let Some(err) = &result.error {
            println!("  {:<28} ERROR: {}", run_name, err);
            continue;
        }
        let Some(record) = result.record.as_ref() else {
            continue;
        };
        let status = record.get_str("unsolv_is_certificate").unwrap_or("-");
        let time = record
            .get_float("unsolv_total_time")
            .map(|t| format!("{:.2}", t))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<28} {:<20} {:>10} {:>10}",
            run_name,
            result.algorithm.as_deref().unwrap_or("-"),
            status,
            time
        );
    }
    println!();
}

/// Write the sweep report as JSON
pub fn write_report(report: &SweepReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
