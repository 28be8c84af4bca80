// SPDX-License-Identifier: PMPL-1.0-or-later

//! Comparison report module

pub mod formatter;
pub mod generator;
pub mod output;

use crate::types::{ComparisonReport, RunRecord};
use anyhow::Result;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use generator::ReportGenerator;
pub use output::ReportOutputFormat;

/// Aggregate enriched run records into a per-algorithm comparison report
pub fn generate_comparison_report(
    eval_dir: &Path,
    records: &[&RunRecord],
    attributes: Vec<String>,
) -> Result<ComparisonReport> {
    let generator = ReportGenerator::new(attributes);
    generator.generate(eval_dir, records)
}

/// Save report to file
pub fn save_report<P: AsRef<Path>>(report: &ComparisonReport, path: P) -> Result<()> {
    let formatter = ReportFormatter::new();
    formatter.save(report, path)
}

/// Print report to console
pub fn print_report(report: &ComparisonReport) {
    let formatter = ReportFormatter::new();
    formatter.print(report);
}
