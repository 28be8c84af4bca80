// SPDX-License-Identifier: PMPL-1.0-or-later

//! Derived run attributes
//!
//! Each function reads zero or more existing keys of a run record and
//! writes one derived key. All functions are total: a missing optional
//! input means "not applicable" and yields a neutral default (0) or no
//! output key at all, never an error. The only ordering constraint is
//! that certificate-status normalization runs before any flag that
//! reads the status; `apply_all` encodes that order.

use crate::types::RunRecord;

/// Verifier exit code signalling it hit its time limit.
pub const EXIT_TIMEOUT: i64 = 7;
/// Verifier exit code signalling it hit its memory limit.
pub const EXIT_OOM: i64 = 6;

const STATUS_KEY: &str = "unsolv_is_certificate";

/// Normalize the raw certificate status extracted from the verifier log:
/// `"valid"` becomes `"yes"`, `"not valid"` becomes `"no"`, an absent
/// status becomes `"unknown"`. Any other raw string is kept as-is; the
/// passthrough is intentional and pinned by tests.
pub fn normalize_certificate_status(record: &mut RunRecord) {
    let normalized = match record.get_str(STATUS_KEY) {
        None => Some("unknown"),
        Some("valid") => Some("yes"),
        Some("not valid") => Some("no"),
        Some(_) => None,
    };
    if let Some(status) = normalized {
        record.set(STATUS_KEY, status);
    }
}

/// `fd_finished` = 1 iff the search driver reported it exhausted the
/// state space without finding a plan.
pub fn flag_search_finished(record: &mut RunRecord) {
    let finished = record.get_str("error") == Some("incomplete-search-found-no-plan");
    record.set("fd_finished", finished as i64);
}

/// `verify_timeout` = 1 iff the verifier exited with the timeout code.
pub fn flag_verify_timeout(record: &mut RunRecord) {
    let timeout = record.get_int("verify_returncode") == Some(EXIT_TIMEOUT);
    record.set("verify_timeout", timeout as i64);
}

/// `verify_oom` = 1 iff the verifier exited with the out-of-memory code.
pub fn flag_verify_oom(record: &mut RunRecord) {
    let oom = record.get_int("verify_returncode") == Some(EXIT_OOM);
    record.set("verify_oom", oom as i64);
}

/// `verify_finished` = 1 iff the verifier reached a verdict. An absent
/// status counts as unknown.
pub fn flag_verify_finished(record: &mut RunRecord) {
    let finished = matches!(record.get_str(STATUS_KEY), Some(s) if s != "unknown");
    record.set("verify_finished", finished as i64);
}

/// `valid_certificate` = 1 iff the normalized status is `"yes"`.
pub fn flag_valid_certificate(record: &mut RunRecord) {
    let valid = record.get_str(STATUS_KEY) == Some("yes");
    record.set("valid_certificate", valid as i64);
}

/// `invalid_certificate` = 1 iff the normalized status is `"no"`.
pub fn flag_invalid_certificate(record: &mut RunRecord) {
    let invalid = record.get_str(STATUS_KEY) == Some("no");
    record.set("invalid_certificate", invalid as i64);
}

/// `search_time_wo_cert` = search time minus certificate-writing time.
/// Written only when both source attributes are present.
pub fn search_time_without_certificate(record: &mut RunRecord) {
    if let (Some(search), Some(write)) = (
        record.get_float("search_time"),
        record.get_float("write_cert_time"),
    ) {
        record.set("search_time_wo_cert", search - write);
    }
}

/// Full derivation pipeline in dependency order.
pub fn apply_all(record: &mut RunRecord) {
    normalize_certificate_status(record);
    flag_search_finished(record);
    flag_verify_timeout(record);
    flag_verify_oom(record);
    flag_verify_finished(record);
    flag_invalid_certificate(record);
    flag_valid_certificate(record);
    search_time_without_certificate(record);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_status(status: &str) -> RunRecord {
        let mut record = RunRecord::new();
        record.set(STATUS_KEY, status);
        record
    }

    #[test]
    fn normalizes_valid_and_not_valid() {
        let mut record = record_with_status("valid");
        normalize_certificate_status(&mut record);
        assert_eq!(record.get_str(STATUS_KEY), Some("yes"));

        let mut record = record_with_status("not valid");
        normalize_certificate_status(&mut record);
        assert_eq!(record.get_str(STATUS_KEY), Some("no"));
    }

    #[test]
    fn absent_status_becomes_unknown() {
        let mut record = RunRecord::new();
        normalize_certificate_status(&mut record);
        assert_eq!(record.get_str(STATUS_KEY), Some("unknown"));
    }

    #[test]
    fn passes_through_unrecognized_status() {
        // Deliberate: raw values other than "valid"/"not valid" are kept
        // verbatim rather than coerced to "unknown".
        let mut record = record_with_status("possibly valid");
        normalize_certificate_status(&mut record);
        assert_eq!(record.get_str(STATUS_KEY), Some("possibly valid"));
    }

    #[test]
    fn timeout_and_oom_are_mutually_exclusive() {
        for code in [0, 1, 6, 7, 8, 127] {
            let mut record = RunRecord::new();
            record.set("verify_returncode", code);
            flag_verify_timeout(&mut record);
            flag_verify_oom(&mut record);

            let timeout = record.get_int("verify_timeout").unwrap();
            let oom = record.get_int("verify_oom").unwrap();
            assert!(timeout == 0 || oom == 0, "code {} set both flags", code);
            assert_eq!(timeout, (code == EXIT_TIMEOUT) as i64);
            assert_eq!(oom, (code == EXIT_OOM) as i64);
        }
    }

    #[test]
    fn missing_returncode_defaults_flags_to_zero() {
        let mut record = RunRecord::new();
        flag_verify_timeout(&mut record);
        flag_verify_oom(&mut record);
        assert_eq!(record.get_int("verify_timeout"), Some(0));
        assert_eq!(record.get_int("verify_oom"), Some(0));
    }

    #[test]
    fn status_flags_partition_records() {
        for (raw, finished, valid, invalid) in [
            ("valid", 1, 1, 0),
            ("not valid", 1, 0, 1),
        ] {
            let mut record = record_with_status(raw);
            normalize_certificate_status(&mut record);
            flag_verify_finished(&mut record);
            flag_valid_certificate(&mut record);
            flag_invalid_certificate(&mut record);

            assert_eq!(record.get_int("verify_finished"), Some(finished));
            assert_eq!(record.get_int("valid_certificate"), Some(valid));
            assert_eq!(record.get_int("invalid_certificate"), Some(invalid));
        }

        let mut record = RunRecord::new();
        normalize_certificate_status(&mut record);
        flag_verify_finished(&mut record);
        flag_valid_certificate(&mut record);
        flag_invalid_certificate(&mut record);
        assert_eq!(record.get_int("verify_finished"), Some(0));
        assert_eq!(record.get_int("valid_certificate"), Some(0));
        assert_eq!(record.get_int("invalid_certificate"), Some(0));
    }

    #[test]
    fn search_finished_requires_exact_error_string() {
        let mut record = RunRecord::new();
        record.set("error", "incomplete-search-found-no-plan");
        flag_search_finished(&mut record);
        assert_eq!(record.get_int("fd_finished"), Some(1));

        let mut record = RunRecord::new();
        record.set("error", "search-out-of-time");
        flag_search_finished(&mut record);
        assert_eq!(record.get_int("fd_finished"), Some(0));

        let mut record = RunRecord::new();
        flag_search_finished(&mut record);
        assert_eq!(record.get_int("fd_finished"), Some(0));
    }

    #[test]
    fn time_delta_needs_both_inputs() {
        let mut record = RunRecord::new();
        record.set("search_time", 100.0);
        record.set("write_cert_time", 5.0);
        search_time_without_certificate(&mut record);
        assert_eq!(record.get_float("search_time_wo_cert"), Some(95.0));

        let mut record = RunRecord::new();
        record.set("search_time", 100.0);
        search_time_without_certificate(&mut record);
        assert!(!record.contains("search_time_wo_cert"));

        let mut record = RunRecord::new();
        record.set("write_cert_time", 5.0);
        search_time_without_certificate(&mut record);
        assert!(!record.contains("search_time_wo_cert"));
    }

    #[test]
    fn apply_all_on_timed_out_verifier_run() {
        let mut record = RunRecord::new();
        record.set("verify_returncode", EXIT_TIMEOUT);
        apply_all(&mut record);

        assert_eq!(record.get_int("verify_timeout"), Some(1));
        assert_eq!(record.get_int("verify_oom"), Some(0));
        assert_eq!(record.get_str(STATUS_KEY), Some("unknown"));
        assert_eq!(record.get_int("verify_finished"), Some(0));
        assert_eq!(record.get_int("valid_certificate"), Some(0));
        assert_eq!(record.get_int("invalid_certificate"), Some(0));
    }
}
