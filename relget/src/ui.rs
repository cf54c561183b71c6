//! Coloured report lines, emitted as `tracing` events so they share the progress bar output.

use crate::outcome::RunReport;
use colored::*;

pub fn success(msg: &str) {
    tracing::info!("{} {}", "✓".green(), msg.green());
}

pub fn error(msg: &str) {
    tracing::error!("{} {}", "Error:".red(), msg.red());
}

pub fn warning(msg: &str) {
    tracing::warn!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    tracing::info!("{}", msg);
}

/// One closing line: how many of the requested assets made it to disk.
pub fn summary(report: &RunReport) {
    let total = report.outcomes.len();
    let downloaded = report.succeeded().count();
    let msg = format!("{downloaded} of {total} requested assets downloaded");
    if report.all_succeeded() {
        success(&msg);
    } else {
        warning(&msg);
    }
}
