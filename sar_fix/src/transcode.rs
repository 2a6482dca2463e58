//! FFmpeg transcode invocation
//!
//! The single delegated, slow step: re-encode the video stream with the
//! chosen SAR stamped in via `setsar`, ProRes HQ as the production-tier
//! profile, audio copied bit-for-bit. No verification happens here; the
//! verifier owns all checks on the produced candidate.

use crate::errors::{Result, SarFixError};
use crate::ffmpeg_process::FfmpegProcess;
use crate::ffprobe;
use crate::sar::AspectChoice;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Seam over the external re-encode capability.
pub trait Transcoder {
    /// Produce a candidate file for `source` with the chosen SAR. Returns
    /// the candidate path on success; the candidate never overwrites the
    /// source.
    fn transcode(&self, source: &Path, choice: AspectChoice) -> Result<PathBuf>;
}

/// Marker embedded in every candidate file name. Enumeration filters on it
/// so a candidate left behind by an interrupted run is never picked up as a
/// source on the next run.
pub const CANDIDATE_MARKER: &str = ".sarfix-";

/// Candidate path derived deterministically from the source and the choice
/// label: `clip.mov` + 4x3 → `clip.sarfix-4x3.mov`. Same directory, so the
/// later promotion rename stays on one filesystem; label in the name keeps
/// concurrent candidates collision-free.
pub fn candidate_path(source: &Path, choice: AspectChoice) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mov".to_string());
    source.with_file_name(format!(
        "{}{}{}.{}",
        stem,
        CANDIDATE_MARKER,
        choice.label(),
        ext
    ))
}

/// True for any path carrying the candidate marker, whatever its label.
pub fn is_candidate_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.contains(CANDIDATE_MARKER))
        .unwrap_or(false)
}

/// Transcodes via the external `ffmpeg` binary.
pub struct FfmpegTranscoder;

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, source: &Path, choice: AspectChoice) -> Result<PathBuf> {
        let output = candidate_path(source, choice);
        let sar = choice.sar();

        // Bar length only; a failed probe here just degrades the bar, the
        // encode itself decides success.
        let duration_secs = ffprobe::probe_media(source)
            .map(|r| r.duration_secs)
            .unwrap_or(0.0);

        info!("🎞️  Transcoding {} → SAR {}", source.display(), sar);

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-hide_banner")
            .arg("-nostats")
            .arg("-loglevel")
            .arg("error")
            .arg("-progress")
            .arg("pipe:1")
            .arg("-i")
            .arg(source)
            .arg("-vf")
            .arg(format!("setsar={}", sar.as_filter()))
            .arg("-c:v")
            .arg("prores_ks")
            .arg("-profile:v")
            .arg("3")
            .arg("-c:a")
            .arg("copy")
            .arg(&output);

        let mut process = FfmpegProcess::spawn(&mut cmd)
            .map_err(|e| SarFixError::FFmpegError(e.to_string()))?;

        let file_label = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        process.track_progress(&file_label, duration_secs);

        let (status, stderr) = process
            .wait_with_output()
            .map_err(|e| SarFixError::FFmpegError(e.to_string()))?;

        if !status.success() {
            discard_candidate(&output);
            let detail = stderr.lines().last().unwrap_or("").trim();
            return Err(SarFixError::FFmpegError(format!(
                "ffmpeg exited with {:?} for '{}': {}",
                status.code(),
                source.display(),
                detail
            )));
        }

        if !output.exists() {
            return Err(SarFixError::FFmpegError(format!(
                "ffmpeg reported success but produced no output: {}",
                output.display()
            )));
        }

        Ok(output)
    }
}

/// Remove a candidate, ignoring errors: the file may never have been created.
pub fn discard_candidate(candidate: &Path) {
    let _ = std::fs::remove_file(candidate);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_path_embeds_label() {
        let src = Path::new("/videos/clip.mov");
        assert_eq!(
            candidate_path(src, AspectChoice::FourByThree),
            PathBuf::from("/videos/clip.sarfix-4x3.mov")
        );
        assert_eq!(
            candidate_path(src, AspectChoice::SixteenByNine),
            PathBuf::from("/videos/clip.sarfix-16x9.mov")
        );
    }

    #[test]
    fn test_candidate_path_is_deterministic_and_distinct() {
        let a = candidate_path(Path::new("a.mov"), AspectChoice::FourByThree);
        let b = candidate_path(Path::new("b.mov"), AspectChoice::FourByThree);
        assert_eq!(
            a,
            candidate_path(Path::new("a.mov"), AspectChoice::FourByThree)
        );
        assert_ne!(a, b);
        assert_ne!(a, PathBuf::from("a.mov"));
    }

    #[test]
    fn test_candidate_path_keeps_source_extension() {
        let src = Path::new("tape_03.MOV");
        let cand = candidate_path(src, AspectChoice::SixteenByNine);
        assert_eq!(cand, PathBuf::from("tape_03.sarfix-16x9.MOV"));
    }

    #[test]
    fn test_is_candidate_path_matches_any_label() {
        assert!(is_candidate_path(Path::new("clip.sarfix-4x3.mov")));
        assert!(is_candidate_path(Path::new("/videos/clip.sarfix-16x9.MOV")));
        assert!(!is_candidate_path(Path::new("clip.mov")));
        assert!(!is_candidate_path(Path::new("sarfix-notes.mov")));
    }

    #[test]
    fn test_discard_candidate_is_quiet_on_missing_file() {
        discard_candidate(Path::new("/nonexistent/candidate.mov"));
    }

    #[test]
    fn test_discard_candidate_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.sarfix-4x3.mov");
        std::fs::write(&path, b"x").unwrap();
        discard_candidate(&path);
        assert!(!path.exists());
    }
}
