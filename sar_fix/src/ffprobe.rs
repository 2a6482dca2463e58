//! FFprobe wrapper module
//!
//! Runs the external `ffprobe` binary and extracts the two fields the
//! verification gate cares about: container duration and the sample aspect
//! ratio of the first video stream.

use crate::errors::{Result, SarFixError};
use crate::sar::Sar;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Probe output for one file, limited to what the pipeline compares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbeReport {
    pub duration_secs: f64,
    pub sar: Sar,
}

/// Seam over the external probing capability so the verifier and pipeline
/// are testable without an ffprobe binary on PATH.
pub trait Prober {
    fn probe(&self, path: &Path) -> Result<ProbeReport>;
}

impl<P: Prober> Prober for &P {
    fn probe(&self, path: &Path) -> Result<ProbeReport> {
        (*self).probe(path)
    }
}

pub fn is_ffprobe_available() -> bool {
    which::which("ffprobe").is_ok()
}

pub fn is_ffmpeg_available() -> bool {
    which::which("ffmpeg").is_ok()
}

/// Probes via `ffprobe -print_format json`.
pub struct FfprobeProber;

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<ProbeReport> {
        probe_media(path)
    }
}

pub fn probe_media(path: &Path) -> Result<ProbeReport> {
    if !path.exists() {
        return Err(SarFixError::FFprobeError(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let path_str = path.to_str().ok_or_else(|| {
        SarFixError::FFprobeError(format!("Invalid path encoding: {}", path.display()))
    })?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            "--",
            path_str,
        ])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_msg = if stderr.trim().is_empty() {
            format!(
                "ffprobe failed to analyze file: {} (exit code: {:?})",
                path.display(),
                output.status.code()
            )
        } else {
            format!("ffprobe error for '{}': {}", path.display(), stderr.trim())
        };
        return Err(SarFixError::FFprobeError(error_msg));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| SarFixError::FFprobeError(format!("Parse error: {}", e)))?;

    parse_probe_json(&json)
        .map_err(|e| SarFixError::FFprobeError(format!("{} ({})", e, path.display())))
}

/// Pulled out of `probe_media` so the JSON extraction is testable without
/// spawning ffprobe.
fn parse_probe_json(json: &serde_json::Value) -> std::result::Result<ProbeReport, String> {
    let duration_secs = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| "No duration in format section".to_string())?;

    let streams = json["streams"]
        .as_array()
        .ok_or_else(|| "No streams found".to_string())?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .ok_or_else(|| "No video stream found".to_string())?;

    // Square pixels unless the stream says otherwise, matching ffprobe's own
    // convention when the field is absent.
    let sar_str = video_stream["sample_aspect_ratio"]
        .as_str()
        .unwrap_or("1:1");
    let sar = sar_str
        .parse::<Sar>()
        .map_err(|e| format!("Bad sample_aspect_ratio: {}", e))?;

    Ok(ProbeReport { duration_secs, sar })
}
