//! Sync run reporting.

use console::style;

use crate::sync::SyncReport;

/// Print the end-of-run summary.
pub fn print_sync_summary(report: &SyncReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Sync Summary:").bold());
    println!("  Downloaded: {}", style(report.downloaded).green());
    println!("  Skipped:    {} (already synced)", report.skipped);
    if report.has_failures() {
        println!(
            "  Failed:     {}",
            style(report.failed.len()).red()
        );
        for key in &report.failed {
            println!("    {}", style(key).red());
        }
    }
    println!("  Total:      {} item(s)", report.total_processed());
    println!("{}", style("═".repeat(50)).dim());
}
