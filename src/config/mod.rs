// SPDX-License-Identifier: PMPL-1.0-or-later

//! Experiment configuration loading
//!
//! Everything the original grid scripts kept in process-wide globals
//! (benchmark suite, revisions, search configurations, target
//! environment) lives in one explicit struct, loaded from a YAML or
//! JSON file. The environment is declared in the file, never inferred
//! from the hostname. Dispatching to the declared environment is the
//! external runner's job; this crate only expands and validates the
//! grid.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Execution target declared by the experiment file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Environment {
    Local {
        #[serde(default = "default_processes")]
        processes: usize,
    },
    Slurm {
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        partition: Option<String>,
    },
}

fn default_processes() -> usize {
    2
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Local {
            processes: default_processes(),
        }
    }
}

/// One named search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub name: String,
    pub search: String,
}

/// Declarative experiment definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub suite: Vec<String>,
    #[serde(default = "default_revisions")]
    pub revisions: Vec<String>,
    pub configs: Vec<SearchConfig>,
    /// Certificate-generation variants to cross with each config.
    #[serde(default = "default_certificate_variants")]
    pub generate_certificates: Vec<bool>,
    pub benchmarks_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_dir: Option<PathBuf>,
    #[serde(default)]
    pub environment: Environment,
}

fn default_revisions() -> Vec<String> {
    vec!["tip".to_string()]
}

fn default_certificate_variants() -> Vec<bool> {
    vec![false, true]
}

/// One cell of the expanded experiment grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Algorithm {
    pub name: String,
    pub revision: String,
    pub search: String,
    pub generate_certificate: bool,
}

impl ExperimentConfig {
    /// Load a config file, dispatching on extension. Explicit dispatch
    /// avoids ambiguous parsing behavior.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading experiment config {}", path.display()))?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json experiment config {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml experiment config {}", path.display()))?,
            _ => {
                return Err(anyhow!(
                    "unsupported experiment config extension for {}",
                    path.display()
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.suite.is_empty() {
            bail!("experiment suite is empty");
        }
        if self.configs.is_empty() {
            bail!("experiment declares no search configurations");
        }
        if self.revisions.is_empty() {
            bail!("experiment declares no revisions");
        }
        if self.generate_certificates.is_empty() {
            bail!("experiment declares no certificate-generation variants");
        }
        Ok(())
    }

    /// Expand the grid: revisions x configs x certificate variants.
    /// Certifying variants get a `-certifying` name suffix. Colliding
    /// algorithm names are an error, since downstream aggregation keys
    /// on the name.
    pub fn expand_algorithms(&self) -> Result<Vec<Algorithm>> {
        let mut algorithms = Vec::new();
        let mut seen = HashSet::new();

        for revision in &self.revisions {
            for config in &self.configs {
                for &generate in &self.generate_certificates {
                    let mut name = config.name.clone();
                    if generate {
                        name.push_str("-certifying");
                    }
                    if self.revisions.len() > 1 {
                        name = format!("{}-{}", name, revision);
                    }
                    if !seen.insert(name.clone()) {
                        bail!("duplicate algorithm name '{}'", name);
                    }
                    algorithms.push(Algorithm {
                        name,
                        revision: revision.clone(),
                        search: config.search.clone(),
                        generate_certificate: generate,
                    });
                }
            }
        }

        Ok(algorithms)
    }
}
