// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pattern rules for the unsolvability verifier's output
//!
//! The verifier prints one line per fact of interest; every rule below
//! captures one of those lines. Only the exit message is required: a run
//! that produced no `Exiting:` line did not get far enough to be parsed
//! at all, and is surfaced as a parse error.

use super::LogParser;
use crate::enrich;
use crate::types::ValueKind;
use anyhow::Result;

/// Build the parser for verifier run logs.
///
/// Certificate-status normalization is registered as a post-extraction
/// function so the raw `unsolv_is_certificate` string never leaves the
/// parser unnormalized.
pub fn verifier_parser() -> Result<LogParser> {
    let mut parser = LogParser::new();

    parser.add_pattern(
        "unsolv_actions",
        r"Amount of Actions: (.+)",
        ValueKind::Int,
        false,
    )?;
    parser.add_pattern(
        "unsolv_total_time",
        r"Verify total time: (.+)",
        ValueKind::Float,
        false,
    )?;
    parser.add_pattern(
        "unsolv_is_certificate",
        r"Exiting: certificate is (.+)",
        ValueKind::Str,
        false,
    )?;
    parser.add_pattern(
        "unsolv_memory",
        r"Verify memory: (.+)KB",
        ValueKind::Float,
        false,
    )?;
    parser.add_pattern(
        "unsolv_abort_memory",
        r"abort memory (.+)KB",
        ValueKind::Float,
        false,
    )?;
    parser.add_pattern(
        "unsolv_abort_time",
        r"abort time (.+)s",
        ValueKind::Float,
        false,
    )?;
    parser.add_pattern(
        "unsolv_exit_message",
        r"Exiting: (.+)",
        ValueKind::Str,
        true,
    )?;
    parser.add_pattern(
        "write_cert_time",
        r"Time for writing unsolvability certificate: (.+)",
        ValueKind::Float,
        false,
    )?;
    parser.add_pattern(
        "certificate_size_kb",
        r"Certificate size: (.+)",
        ValueKind::Int,
        false,
    )?;

    parser.add_function(enrich::normalize_certificate_status);

    Ok(parser)
}
