// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report aggregation logic

use crate::types::{AlgorithmSummary, AttributeStats, ComparisonReport, RunRecord};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Attributes summarized when the caller does not pick their own.
pub const DEFAULT_ATTRIBUTES: &[&str] = &[
    "unsolv_total_time",
    "unsolv_memory",
    "search_time",
    "search_time_wo_cert",
    "write_cert_time",
    "certificate_size_kb",
    "total_time",
    "expansions",
];

pub struct ReportGenerator {
    attributes: Vec<String>,
}

impl ReportGenerator {
    pub fn new(attributes: Vec<String>) -> Self {
        let attributes = if attributes.is_empty() {
            DEFAULT_ATTRIBUTES.iter().map(|a| a.to_string()).collect()
        } else {
            attributes
        };
        Self { attributes }
    }

    /// Group records by their `algorithm` attribute and summarize each
    /// group. Records without an algorithm land in an `unknown` group
    /// rather than being dropped.
    pub fn generate(&self, eval_dir: &Path, records: &[&RunRecord]) -> Result<ComparisonReport> {
        let mut groups: BTreeMap<String, Vec<&RunRecord>> = BTreeMap::new();
        for record in records {
            let algorithm = record
                .get_str("algorithm")
                .unwrap_or("unknown")
                .to_string();
            groups.entry(algorithm).or_default().push(record);
        }

        let algorithms = groups
            .into_iter()
            .map(|(algorithm, group)| self.summarize(algorithm, &group))
            .collect();

        Ok(ComparisonReport {
            created_at: chrono::Utc::now().to_rfc3339(),
            eval_dir: eval_dir.to_path_buf(),
            total_runs: records.len(),
            attributes: self.attributes.clone(),
            algorithms,
        })
    }

    fn summarize(&self, algorithm: String, group: &[&RunRecord]) -> AlgorithmSummary {
        let sum_flag = |key: &str| -> u64 {
            group
                .iter()
                .filter_map(|r| r.get_int(key))
                .filter(|&v| v == 1)
                .count() as u64
        };

        let mut attribute_stats = BTreeMap::new();
        for attribute in &self.attributes {
            let values: Vec<f64> = group
                .iter()
                .filter_map(|r| r.get_float(attribute))
                .collect();
            if let Some(stats) = aggregate(&values) {
                attribute_stats.insert(attribute.clone(), stats);
            }
        }

        AlgorithmSummary {
            algorithm,
            runs: group.len(),
            finished: sum_flag("verify_finished"),
            valid_certificates: sum_flag("valid_certificate"),
            invalid_certificates: sum_flag("invalid_certificate"),
            timeouts: sum_flag("verify_timeout"),
            ooms: sum_flag("verify_oom"),
            attribute_stats,
        }
    }
}

fn aggregate(values: &[f64]) -> Option<AttributeStats> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some(AttributeStats {
        count: values.len(),
        min,
        max,
        sum,
        mean: sum / values.len() as f64,
    })
}
