//! sar-fix - Batch sample-aspect-ratio repair
//!
//! Orchestrates external ffmpeg/ffprobe processes to correct the SAR of
//! every video file in a directory. Each file is classified by the operator,
//! re-encoded to a candidate path, then verified (duration preserved to
//! whole-second resolution, requested SAR present) before the original is
//! atomically replaced. The original is never touched until verification
//! passes.
//!
//! ```rust,ignore
//! use sar_fix::{FfmpegTranscoder, FfprobeProber, Pipeline, VerifyPolicy};
//!
//! let pipeline = Pipeline::new(FfprobeProber, FfmpegTranscoder, VerifyPolicy::default());
//! let stdin = std::io::stdin();
//! let report = pipeline.run(
//!     std::path::Path::new("captures/"),
//!     "mov",
//!     &mut stdin.lock(),
//!     &mut std::io::stdout(),
//! )?;
//! ```

pub mod batch;
pub mod classify;
pub mod errors;
pub mod ffmpeg_process;
pub mod ffprobe;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod safety;
pub mod sar;
pub mod transcode;
pub mod verify;

// Re-exports
pub use errors::{Result, SarFixError};
pub use ffprobe::{is_ffmpeg_available, is_ffprobe_available, FfprobeProber, ProbeReport, Prober};
pub use pipeline::{FileOutcome, FileRecord, Pipeline, RunReport};
pub use sar::{AspectChoice, Sar};
pub use transcode::{candidate_path, FfmpegTranscoder, Transcoder};
pub use verify::{verify, VerifyOutcome, VerifyPolicy};
