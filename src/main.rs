// SPDX-License-Identifier: PMPL-1.0-or-later

//! cert-lab: post-processing and comparison reports for
//! unsolvability-certificate benchmark experiments.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cert_lab::config::ExperimentConfig;
use cert_lab::report::{self, ReportOutputFormat};
use cert_lab::storage;
use cert_lab::sweep::{self, SweepConfig};

#[derive(Parser)]
#[command(name = "cert-lab")]
#[command(version)]
#[command(about = "Run-log parsing, attribute derivation, and comparison reports for certificate-verification experiments")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and enrich a single run directory
    Parse {
        /// Run directory containing `properties` and `run.log`
        #[arg(value_name = "RUN_DIR")]
        run_dir: PathBuf,

        /// Write the enriched record back to the properties file
        #[arg(short, long)]
        write: bool,
    },

    /// Post-process every run of a completed experiment
    Sweep {
        /// Experiment directory containing the run directories
        #[arg(value_name = "EXP_DIR")]
        exp_dir: PathBuf,

        /// Write enriched records back to the properties files
        #[arg(short, long)]
        write: bool,

        /// Output sweep report to file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress the summary table
        #[arg(short, long)]
        quiet: bool,
    },

    /// Build a per-algorithm comparison report over an experiment
    Report {
        /// Experiment directory containing the run directories
        #[arg(value_name = "EXP_DIR")]
        exp_dir: PathBuf,

        /// Attributes to summarize (comma-separated; default: headline set)
        #[arg(short, long, value_delimiter = ',')]
        attributes: Option<Vec<String>>,

        /// Output format for saved reports
        #[arg(short, long, value_enum, default_value = "json")]
        format: ReportOutputFormat,

        /// Save the report to this exact path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Persist a timestamped copy under this directory
        #[arg(short, long)]
        store: Option<PathBuf>,
    },

    /// Expand and validate an experiment configuration
    Plan {
        /// Experiment config file (YAML or JSON)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { run_dir, write } => {
            println!("Parsing run: {}", run_dir.display());

            let record = sweep::process_run(&run_dir, write)?;
            println!();
            for (key, value) in record.iter() {
                println!("  {}: {}", key, value);
            }
            if write {
                println!("\nEnriched record written back to properties.");
            }
        }

        Commands::Sweep {
            exp_dir,
            write,
            output,
            quiet,
        } => {
            let config = SweepConfig {
                directory: exp_dir,
                write_back: write,
            };

            let report = sweep::run(&config)?;
            sweep::print_summary(&report, quiet);

            if let Some(output_path) = output {
                sweep::write_report(&report, &output_path)?;
                println!("Sweep report saved to: {}", output_path.display());
            }
        }

        Commands::Report {
            exp_dir,
            attributes,
            format,
            output,
            store,
        } => {
            let sweep_config = SweepConfig {
                directory: exp_dir.clone(),
                write_back: false,
            };
            let sweep_report = sweep::run(&sweep_config)?;
            if sweep_report.parse_errors > 0 {
                eprintln!(
                    "Warning: {} of {} runs failed to parse and are excluded",
                    sweep_report.parse_errors, sweep_report.runs_processed
                );
            }

            let comparison = report::generate_comparison_report(
                &exp_dir,
                &sweep_report.records(),
                attributes.unwrap_or_default(),
            )?;

            report::print_report(&comparison);

            if let Some(output_path) = output {
                let content = format.serialize(&comparison)?;
                std::fs::write(&output_path, content)?;
                println!("Report saved to: {}", output_path.display());
            }

            if let Some(store_dir) = store {
                let stored = storage::persist_report(&comparison, Some(&store_dir), &[format])?;
                for path in stored {
                    println!("Report stored at: {}", path.display());
                }
            }
        }

        Commands::Plan { config } => {
            let experiment = ExperimentConfig::load(&config)?;
            let algorithms = experiment.expand_algorithms()?;

            println!("Experiment plan: {}", config.display());
            println!("  Benchmarks: {}", experiment.benchmarks_dir.display());
            println!("  Suite: {} instances", experiment.suite.len());
            println!("  Environment: {:?}", experiment.environment);
            println!();
            println!("  Algorithms ({}):", algorithms.len());
            for algorithm in &algorithms {
                println!(
                    "    {:<28} rev={:<8} generate_certificate={}  {}",
                    algorithm.name,
                    algorithm.revision,
                    algorithm.generate_certificate,
                    algorithm.search
                );
            }
        }
    }

    Ok(())
}
