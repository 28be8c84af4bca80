// SPDX-License-Identifier: PMPL-1.0-or-later

//! Typed regex extraction over raw solver and verifier output
//!
//! A `LogParser` evaluates an ordered list of pattern rules against the
//! text of one run log, converts each first match to its declared type,
//! and stores it in the run record. Derivation functions registered on
//! the parser run after extraction, so extracted attributes are visible
//! to them.

pub mod rules;

use crate::types::{PatternRule, PropValue, RunRecord, ValueKind};
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Post-extraction derivation hook. Must be total: missing optional
/// inputs yield a neutral default, never an error.
pub type DeriveFn = fn(&mut RunRecord);

pub struct LogParser {
    rules: Vec<PatternRule>,
    defaults: Vec<(String, PropValue)>,
    functions: Vec<DeriveFn>,
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            defaults: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Register an extraction rule. The pattern must contain a capture
    /// group; group 1 is what gets converted and stored.
    pub fn add_pattern(
        &mut self,
        attribute: &str,
        pattern: &str,
        kind: ValueKind,
        required: bool,
    ) -> Result<()> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("compiling pattern for attribute '{}'", attribute))?;
        if regex.captures_len() < 2 {
            bail!(
                "pattern for attribute '{}' has no capture group: {}",
                attribute,
                pattern
            );
        }
        self.rules.push(PatternRule {
            attribute: attribute.to_string(),
            regex,
            kind,
            required,
        });
        Ok(())
    }

    /// Register a fallback value written after extraction when the
    /// attribute is still absent.
    pub fn add_default(&mut self, attribute: &str, value: impl Into<PropValue>) {
        self.defaults.push((attribute.to_string(), value.into()));
    }

    pub fn add_function(&mut self, f: DeriveFn) {
        self.functions.push(f);
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Extract all rules from `text` into `record`, then apply defaults
    /// and derivation functions in registration order.
    ///
    /// A required rule without a match and a failed numeric conversion
    /// are both fatal for this record; optional misses leave the key
    /// absent.
    pub fn parse_text(&self, text: &str, record: &mut RunRecord) -> Result<()> {
        for rule in &self.rules {
            match rule.regex.captures(text).and_then(|caps| caps.get(1)) {
                Some(m) => {
                    let value = convert(m.as_str(), rule.kind).with_context(|| {
                        format!("converting attribute '{}'", rule.attribute)
                    })?;
                    record.set(rule.attribute.clone(), value);
                }
                None if rule.required => {
                    bail!(
                        "required attribute '{}' not found in output",
                        rule.attribute
                    );
                }
                None => {}
            }
        }

        for (attribute, value) in &self.defaults {
            record.set_default(attribute, value.clone());
        }

        for function in &self.functions {
            function(record);
        }

        Ok(())
    }

    /// Parse one run's output file.
    pub fn parse_file(&self, path: &Path, record: &mut RunRecord) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading run log {}", path.display()))?;
        self.parse_text(&text, record)
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

fn convert(raw: &str, kind: ValueKind) -> Result<PropValue> {
    match kind {
        ValueKind::Str => Ok(PropValue::Str(raw.to_string())),
        ValueKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(PropValue::Int)
            .with_context(|| format!("'{}' is not an integer", raw)),
        ValueKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(PropValue::Float)
            .with_context(|| format!("'{}' is not a number", raw)),
    }
}
