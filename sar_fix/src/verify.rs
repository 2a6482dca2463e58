//! Verification gate
//!
//! Compares a source file against its re-encoded candidate: the candidate
//! must exist, keep the source duration at the policy resolution, and carry
//! the requested SAR. One probe pass per file, no retries; a probe error is a
//! hard verification failure for that file.

use crate::errors::Result;
use crate::ffprobe::Prober;
use crate::sar::Sar;
use std::path::Path;

/// Duration comparison policy. The whole-second default tolerates encoder
/// rounding drift; operators can tighten it per run.
#[derive(Debug, Clone, Copy)]
pub struct VerifyPolicy {
    /// Resolution bucket for duration comparison, in seconds. Must be
    /// positive; both durations are truncated to multiples of this value
    /// before the exact-equality check.
    pub duration_resolution_secs: f64,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self {
            duration_resolution_secs: 1.0,
        }
    }
}

impl VerifyPolicy {
    pub fn truncate(&self, secs: f64) -> i64 {
        (secs / self.duration_resolution_secs) as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    Pass,
    MissingOutput,
    DurationMismatch { expected: i64, actual: i64 },
    SarMismatch { expected: Sar, actual: Sar },
}

impl VerifyOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, VerifyOutcome::Pass)
    }

    pub fn describe(&self) -> String {
        match self {
            VerifyOutcome::Pass => "verified".to_string(),
            VerifyOutcome::MissingOutput => "candidate file missing".to_string(),
            VerifyOutcome::DurationMismatch { expected, actual } => {
                format!("duration mismatch (expected {}s, got {}s)", expected, actual)
            }
            VerifyOutcome::SarMismatch { expected, actual } => {
                format!("SAR mismatch (expected {}, got {})", expected, actual)
            }
        }
    }
}

pub fn verify<P: Prober>(
    prober: &P,
    source: &Path,
    candidate: &Path,
    expected_sar: Sar,
    policy: &VerifyPolicy,
) -> Result<VerifyOutcome> {
    if !candidate.exists() {
        return Ok(VerifyOutcome::MissingOutput);
    }

    let source_report = prober.probe(source)?;
    let candidate_report = prober.probe(candidate)?;

    let expected = policy.truncate(source_report.duration_secs);
    let actual = policy.truncate(candidate_report.duration_secs);
    if expected != actual {
        return Ok(VerifyOutcome::DurationMismatch { expected, actual });
    }

    if candidate_report.sar != expected_sar {
        return Ok(VerifyOutcome::SarMismatch {
            expected: expected_sar,
            actual: candidate_report.sar,
        });
    }

    Ok(VerifyOutcome::Pass)
}
