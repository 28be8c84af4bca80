// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::types::ComparisonReport;
use anyhow::Result;
use colored::*;
use std::fs;
use std::path::Path;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &ComparisonReport) {
        println!("\n{}", "=== CERT-LAB COMPARISON REPORT ===".bold().cyan());
        println!();
        println!("  Evaluation dir: {}", report.eval_dir.display());
        println!("  Created: {}", report.created_at);
        println!("  Total runs: {}", report.total_runs);
        println!();

        self.print_algorithm_table(report);
        println!();
        self.print_attribute_stats(report);
        println!();
    }

    fn print_algorithm_table(&self, report: &ComparisonReport) {
        println!("{}", "PER-ALGORITHM RESULTS".bold().yellow());

        if report.algorithms.is_empty() {
            println!("  No runs to aggregate.");
            return;
        }

        println!(
            "  {:<24} {:>6} {:>9} {:>7} {:>9} {:>9} {:>6}",
            "Algorithm", "Runs", "Finished", "Valid", "Invalid", "Timeouts", "OOMs"
        );
        println!("  {}", "-".repeat(76));

        for summary in &report.algorithms {
            let valid = if summary.valid_certificates > 0 {
                summary.valid_certificates.to_string().green().to_string()
            } else {
                summary.valid_certificates.to_string()
            };
            let invalid = if summary.invalid_certificates > 0 {
                summary.invalid_certificates.to_string().red().bold().to_string()
            } else {
                summary.invalid_certificates.to_string()
            };
            let timeouts = if summary.timeouts > 0 {
                summary.timeouts.to_string().yellow().to_string()
            } else {
                summary.timeouts.to_string()
            };

            println!(
                "  {:<24} {:>6} {:>9} {:>7} {:>9} {:>9} {:>6}",
                summary.algorithm,
                summary.runs,
                summary.finished,
                valid,
                invalid,
                timeouts,
                summary.ooms
            );
        }
    }

    fn print_attribute_stats(&self, report: &ComparisonReport) {
        println!("{}", "ATTRIBUTE STATISTICS".bold().yellow());

        let mut printed = false;
        for summary in &report.algorithms {
            if summary.attribute_stats.is_empty() {
                continue;
            }
            printed = true;
            println!("  {}", summary.algorithm.bold());
            for (attribute, stats) in &summary.attribute_stats {
                println!(
                    "    {:<24} n={:<4} min={:<10.2} max={:<10.2} mean={:.2}",
                    attribute, stats.count, stats.min, stats.max, stats.mean
                );
            }
        }
        if !printed {
            println!("  {}", "No numeric attributes present.".dimmed());
        }
    }

    pub fn save<P: AsRef<Path>>(&self, report: &ComparisonReport, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path.as_ref(), json)?;
        println!("Report saved to: {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
