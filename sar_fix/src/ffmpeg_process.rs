//! FFmpeg process wrapper
//!
//! Pipes both stdout and stderr, but drains stderr on its own thread: OS pipe
//! buffers are ~64KB, and an ffmpeg that fills its stderr buffer while we only
//! read stdout deadlocks both sides. Stdout carries `-progress pipe:1`
//! key=value lines, which feed the per-file progress bar.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

pub struct FfmpegProcess {
    child: Child,
    stderr_thread: Option<JoinHandle<String>>,
}

impl FfmpegProcess {
    pub fn spawn(cmd: &mut Command) -> Result<Self> {
        info!(command = ?cmd, "Executing FFmpeg command");

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().context("Failed to spawn FFmpeg process")?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture FFmpeg stderr"))?;

        let stderr_thread = thread::spawn(move || {
            let mut buf = String::new();
            let reader = BufReader::new(stderr);
            for line in reader.lines().map_while(|l| l.ok()) {
                buf.push_str(&line);
                buf.push('\n');
            }
            buf
        });

        Ok(Self {
            child,
            stderr_thread: Some(stderr_thread),
        })
    }

    /// Consume `-progress pipe:1` output on stdout, driving a bar scaled by
    /// the source duration, until ffmpeg closes the pipe.
    pub fn track_progress(&mut self, file_label: &str, total_duration_secs: f64) {
        let Some(stdout) = self.child.stdout.take() else {
            return;
        };

        let bar = encode_progress_bar(file_label, total_duration_secs);
        let reader = BufReader::new(stdout);
        for line in reader.lines().map_while(|l| l.ok()) {
            if let Some(secs) = parse_progress_secs(&line) {
                bar.set_position((secs.min(total_duration_secs) * 1000.0) as u64);
            }
        }
        bar.finish_and_clear();
    }

    pub fn wait_with_output(mut self) -> Result<(ExitStatus, String)> {
        let status = self.child.wait().context("Failed to wait for FFmpeg")?;
        let stderr = self
            .stderr_thread
            .take()
            .map(|t| t.join().unwrap_or_default())
            .unwrap_or_default();

        if status.success() {
            info!(
                exit_code = status.code(),
                "FFmpeg process completed successfully"
            );
            debug!(stderr_output = %stderr, "FFmpeg stderr output");
        } else {
            error!(
                exit_code = status.code(),
                stderr_output = %stderr,
                "FFmpeg process failed"
            );
        }

        Ok((status, stderr))
    }
}

fn encode_progress_bar(file_label: &str, total_duration_secs: f64) -> ProgressBar {
    // Millisecond positions keep the bar smooth on short clips.
    let bar = ProgressBar::new((total_duration_secs.max(0.001) * 1000.0) as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} 🎞️  {prefix:.cyan.bold} ▕{bar:25.green/black}▏ {percent:>3}% • ⏱️ {elapsed_precise}")
            .expect("Invalid template")
            .progress_chars("━━─"),
    );
    bar.set_prefix(file_label.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Parse one `-progress pipe:1` line into encoded seconds.
///
/// ffmpeg emits both `out_time_us=1234567` and `out_time=00:00:01.234567`
/// depending on version; accept either.
pub fn parse_progress_secs(line: &str) -> Option<f64> {
    if let Some(us) = line.strip_prefix("out_time_us=") {
        return us.trim().parse::<f64>().ok().map(|v| v / 1_000_000.0);
    }
    if let Some(hms) = line.strip_prefix("out_time=") {
        let parts: Vec<&str> = hms.trim().split(':').collect();
        if parts.len() == 3 {
            let h = parts[0].parse::<f64>().ok()?;
            let m = parts[1].parse::<f64>().ok()?;
            let s = parts[2].parse::<f64>().ok()?;
            return Some(h * 3600.0 + m * 60.0 + s);
        }
    }
    None
}
