//! End-of-run summary report

use crate::pipeline::RunReport;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

pub fn print_summary_report(report: &RunReport, duration: Duration) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 📊 SAR Repair Summary Report                 ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!(
        "║  📁 Files Processed:    {:>10}                           ║",
        report.records.len()
    );
    println!(
        "║  ✅ Replaced:           {:>10}                           ║",
        report.replaced()
    );
    println!(
        "║  ❌ Failed:             {:>10}                           ║",
        report.failed()
    );
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!(
        "║  ⏱️  Total Time:         {:>10}                           ║",
        format_duration(duration)
    );
    println!("╚══════════════════════════════════════════════════════════════╝");

    if report.failed() > 0 {
        println!();
        println!("❌ Failures:");
        for record in report.failures() {
            println!(
                "   {} [{}] — {}",
                record.path.display(),
                record.choice.label(),
                record.outcome.reason()
            );
        }
    }
}
