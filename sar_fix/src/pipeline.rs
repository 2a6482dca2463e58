//! Pipeline controller
//!
//! Drives each discovered file through classify → transcode → verify →
//! promote-or-discard, strictly one file at a time (the operator prompt makes
//! interleaving ambiguous). A candidate only replaces its source via an
//! atomic rename after the verification gate passes; every failure leaves the
//! original exactly as found and the run continues to the next file.

use crate::batch;
use crate::classify::classify;
use crate::errors::Result;
use crate::ffprobe::Prober;
use crate::sar::{AspectChoice, Sar};
use crate::transcode::{discard_candidate, Transcoder};
use crate::verify::{verify, VerifyOutcome, VerifyPolicy};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Terminal state for one file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Replaced,
    TranscodeFailed(String),
    MissingOutput,
    DurationMismatch { expected: i64, actual: i64 },
    SarMismatch { expected: Sar, actual: Sar },
    /// Probing failed during verification; the candidate is discarded.
    ProbeFailed(String),
    /// Verification passed but the promotion rename failed (e.g. the
    /// candidate landed on another device). Fatal for this file only.
    ReplaceFailed(String),
}

impl FileOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, FileOutcome::Replaced)
    }

    pub fn reason(&self) -> String {
        match self {
            FileOutcome::Replaced => "replaced".to_string(),
            FileOutcome::TranscodeFailed(msg) => format!("transcode failed: {}", msg),
            FileOutcome::MissingOutput => "candidate file missing".to_string(),
            FileOutcome::DurationMismatch { expected, actual } => {
                format!("duration mismatch (expected {}s, got {}s)", expected, actual)
            }
            FileOutcome::SarMismatch { expected, actual } => {
                format!("SAR mismatch (expected {}, got {})", expected, actual)
            }
            FileOutcome::ProbeFailed(msg) => format!("verification probe failed: {}", msg),
            FileOutcome::ReplaceFailed(msg) => format!("replace failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub choice: AspectChoice,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub records: Vec<FileRecord>,
}

impl RunReport {
    pub fn replaced(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_replaced())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.replaced()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| !r.outcome.is_replaced())
    }
}

pub struct Pipeline<P: Prober, T: Transcoder> {
    prober: P,
    transcoder: T,
    policy: VerifyPolicy,
}

impl<P: Prober, T: Transcoder> Pipeline<P, T> {
    pub fn new(prober: P, transcoder: T, policy: VerifyPolicy) -> Self {
        Self {
            prober,
            transcoder,
            policy,
        }
    }

    /// Process every `extension` file at the top level of `dir`. Only
    /// setup-class errors propagate; per-file failures land in the report.
    pub fn run<R: BufRead, W: Write>(
        &self,
        dir: &Path,
        extension: &str,
        operator_in: &mut R,
        operator_out: &mut W,
    ) -> Result<RunReport> {
        let files = batch::collect_files(dir, extension)?;
        if files.is_empty() {
            info!(
                "ℹ️  No .{} files found in {}",
                extension,
                dir.display()
            );
            return Ok(RunReport::default());
        }

        info!("📂 Found {} .{} files to process", files.len(), extension);

        let mut report = RunReport::default();
        for file in &files {
            let record = self.process_file(file, operator_in, operator_out)?;
            match &record.outcome {
                FileOutcome::Replaced => {
                    info!(
                        "✅ {} → replaced (SAR {})",
                        file.file_name().unwrap_or_default().to_string_lossy(),
                        record.choice.sar()
                    );
                }
                outcome => {
                    warn!(
                        "❌ {} → FAILED ({})",
                        file.file_name().unwrap_or_default().to_string_lossy(),
                        outcome.reason()
                    );
                }
            }
            report.records.push(record);
        }

        Ok(report)
    }

    fn process_file<R: BufRead, W: Write>(
        &self,
        file: &Path,
        operator_in: &mut R,
        operator_out: &mut W,
    ) -> Result<FileRecord> {
        // Classified: a broken operator channel aborts the whole run.
        let choice = classify(operator_in, operator_out, file)?;

        // Transcoded: the external encode may fail, the run must not.
        let candidate = match self.transcoder.transcode(file, choice) {
            Ok(candidate) => candidate,
            Err(e) => {
                return Ok(FileRecord {
                    path: file.to_path_buf(),
                    choice,
                    outcome: FileOutcome::TranscodeFailed(e.to_string()),
                });
            }
        };

        // Verified: gate before anything touches the original.
        let outcome = match verify(&self.prober, file, &candidate, choice.sar(), &self.policy) {
            Ok(VerifyOutcome::Pass) => self.promote(file, &candidate),
            Ok(mismatch) => {
                discard_candidate(&candidate);
                match mismatch {
                    VerifyOutcome::MissingOutput => FileOutcome::MissingOutput,
                    VerifyOutcome::DurationMismatch { expected, actual } => {
                        FileOutcome::DurationMismatch { expected, actual }
                    }
                    VerifyOutcome::SarMismatch { expected, actual } => {
                        FileOutcome::SarMismatch { expected, actual }
                    }
                    VerifyOutcome::Pass => unreachable!(),
                }
            }
            Err(e) => {
                discard_candidate(&candidate);
                FileOutcome::ProbeFailed(e.to_string())
            }
        };

        Ok(FileRecord {
            path: file.to_path_buf(),
            choice,
            outcome,
        })
    }

    /// Replaced: atomic rename of the verified candidate over the original.
    /// Candidate and original share a directory, so this never crosses a
    /// filesystem boundary under normal operation.
    fn promote(&self, file: &Path, candidate: &Path) -> FileOutcome {
        match std::fs::rename(candidate, file) {
            Ok(()) => FileOutcome::Replaced,
            Err(e) => {
                discard_candidate(candidate);
                FileOutcome::ReplaceFailed(e.to_string())
            }
        }
    }
}
