// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for cert-lab
//!
//! A run record is the key-value result set of one executed trial
//! (one solver configuration x one benchmark instance). Records are
//! produced by the experiment driver, enriched in place by the parser
//! and derivation functions, and aggregated into comparison reports.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Scalar property value stored in a run record.
///
/// Untagged so a lab-style `properties` JSON file deserializes directly.
/// Variant order matters: whole numbers must land on `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Int(v) => write!(f, "{}", v),
            PropValue::Float(v) => write!(f, "{}", v),
            PropValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

/// Key-value result set for one executed benchmark trial.
///
/// Backed by an ordered map so serialized `properties` files are stable
/// across runs. Records carry no identity beyond their key set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunRecord {
    props: BTreeMap<String, PropValue>,
}

impl RunRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.props.get(key) {
            Some(PropValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.props.get(key) {
            Some(PropValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Numeric read widening `Int` to `f64`, matching how timing and
    /// memory attributes are consumed regardless of how they parsed.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.props.get(key) {
            Some(PropValue::Float(v)) => Some(*v),
            Some(PropValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.props.insert(key.into(), value.into());
    }

    /// Companion to optional extraction: only writes when the key is absent.
    pub fn set_default(&mut self, key: &str, value: impl Into<PropValue>) {
        if !self.props.contains_key(key) {
            self.props.insert(key.to_string(), value.into());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.props.remove(key)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.props.iter()
    }
}

/// Conversion target declared by a pattern rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Str,
    Int,
    Float,
}

/// Declarative extraction rule: the first match of `regex` in the run log
/// is converted to `kind` and stored under `attribute`. Declared once at
/// parser construction, read-only afterwards.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub attribute: String,
    pub regex: Regex,
    pub kind: ValueKind,
    pub required: bool,
}

/// Per-attribute numeric statistics within one algorithm group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub mean: f64,
}

/// Aggregated results for one algorithm across a benchmark suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmSummary {
    pub algorithm: String,
    pub runs: usize,
    pub finished: u64,
    pub valid_certificates: u64,
    pub invalid_certificates: u64,
    pub timeouts: u64,
    pub ooms: u64,
    pub attribute_stats: BTreeMap<String, AttributeStats>,
}

/// Complete comparison report over an evaluation directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub created_at: String,
    pub eval_dir: PathBuf,
    pub total_runs: usize,
    pub attributes: Vec<String>,
    pub algorithms: Vec<AlgorithmSummary>,
}
