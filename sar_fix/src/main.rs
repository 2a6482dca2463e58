use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use sar_fix::{
    is_ffmpeg_available, is_ffprobe_available, FfmpegTranscoder, FfprobeProber, Pipeline,
    SarFixError, VerifyPolicy,
};

#[derive(Parser)]
#[command(name = "sar-fix")]
#[command(version, about = "Batch sample-aspect-ratio repair with verified in-place replacement", long_about = None)]
struct Cli {
    /// Directory containing the video files to repair (top level only)
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// File extension to process
    #[arg(long, default_value = "mov")]
    ext: String,

    /// Duration comparison resolution in seconds. The default tolerates
    /// sub-second encoder rounding drift; lower it to tighten the gate.
    #[arg(long, default_value_t = 1.0, value_parser = parse_resolution)]
    duration_resolution: f64,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_resolution(s: &str) -> Result<f64, String> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("not a number: {}", e))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err("duration resolution must be a positive number of seconds".to_string())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = sar_fix::logging::init_logging(
        "sar_fix",
        sar_fix::logging::LogConfig::default().with_level(level),
    );

    if let Err(e) = sar_fix::safety::check_dangerous_directory(&cli.dir) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if !is_ffmpeg_available() {
        return Err(SarFixError::ToolNotFound(
            "ffmpeg not found on PATH. Install with: brew install ffmpeg".to_string(),
        )
        .into());
    }
    if !is_ffprobe_available() {
        return Err(SarFixError::ToolNotFound(
            "ffprobe not found on PATH. Install with: brew install ffmpeg".to_string(),
        )
        .into());
    }

    let policy = VerifyPolicy {
        duration_resolution_secs: cli.duration_resolution,
    };

    info!("🎬 SAR Repair Run");
    info!("   📂 Directory: {}", cli.dir.display());
    info!("   🎞️  Extension: .{}", cli.ext);
    info!(
        "   ⏱️  Duration gate resolution: {}s",
        cli.duration_resolution
    );
    info!("");

    let pipeline = Pipeline::new(FfprobeProber, FfmpegTranscoder, policy);

    let start_time = Instant::now();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let report = pipeline.run(&cli.dir, &cli.ext, &mut stdin.lock(), &mut stdout)?;

    sar_fix::report::print_summary_report(&report, start_time.elapsed());

    // Per-file failures never change the exit status; only setup failures
    // (handled above via `?`) make the run exit non-zero.
    Ok(())
}
