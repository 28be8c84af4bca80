// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persistent storage helpers for comparison reports

use crate::report::ReportOutputFormat;
use crate::types::ComparisonReport;
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the report into `directory` (default `reports/`) once per
/// requested format, named `cert-lab-<timestamp>.<ext>`.
pub fn persist_report(
    report: &ComparisonReport,
    directory: Option<&Path>,
    formats: &[ReportOutputFormat],
) -> Result<Vec<PathBuf>> {
    let mut stored = Vec::new();
    let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();

    let base_dir = directory
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("reports"));
    fs::create_dir_all(&base_dir)?;

    for format in formats {
        let file_name = format!("cert-lab-{}.{}", timestamp, format.extension());
        let path = base_dir.join(&file_name);
        let content = format.serialize(report)?;
        fs::write(&path, content)?;
        stored.push(path);
    }

    Ok(stored)
}

/// The `count` most recent JSON reports in `dir`, oldest first.
pub fn latest_reports(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(anyhow!("report directory not found: {}", dir.display()));
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();

    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if entries.len() < count {
        return Err(anyhow!(
            "not enough reports in {} (need {}, found {})",
            dir.display(),
            count,
            entries.len()
        ));
    }
    let start = entries.len() - count;
    Ok(entries[start..].to_vec())
}
