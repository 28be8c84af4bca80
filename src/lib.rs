// SPDX-License-Identifier: PMPL-1.0-or-later

//! cert-lab — benchmark post-processing for unsolvability-certificate
//! experiments.
//!
//! A planning-system experiment leaves behind one directory per run,
//! holding a key-value `properties` file and the combined solver and
//! verifier output log. This crate turns those into comparable results:
//!
//! 1. **Parser**: declarative, typed regex rules extract verifier facts
//!    (status, times, memory, certificate size) from raw run logs.
//! 2. **Enrich**: pure per-record functions derive boolean flags and
//!    deltas (timeout/OOM, certificate validity, search time without
//!    certificate writing).
//! 3. **Sweep**: the record-at-a-time batch driver over an experiment
//!    directory.
//! 4. **Report**: per-algorithm aggregation with console, JSON, and
//!    YAML output.
//!
//! Grid dispatch and HTML/LaTeX rendering are out of scope; experiment
//! grids are only expanded and validated here (`config`).

pub mod config;
pub mod enrich;
pub mod parser;
pub mod report;
pub mod storage;
pub mod sweep;
pub mod types;
