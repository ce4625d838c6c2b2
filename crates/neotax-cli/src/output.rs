//! Terminal output formatting.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use neotax_core::LoadReport;

/// `<tax_id>\t<name;name;...>`
pub fn format_lineage_line(tax_id: i64, lineage: &[String]) -> String {
    format!("{tax_id}\t{}", lineage.join(";"))
}

/// Spinner for a load step of unknown length.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_load_report(what: &str, report: &LoadReport) {
    println!(
        "  {} {}: {} records, {} relationships",
        "✓".green(),
        what.bold(),
        report.records.to_string().cyan(),
        report.relationships.to_string().cyan()
    );
}
