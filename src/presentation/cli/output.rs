//! Terminal output

use crate::application::dto::VerificationOutcome;
use crate::domain::entities::{ReputationVerdict, SessionStats};
use anyhow::Result;
use console::style;

/// Prints an outcome, either styled or as JSON
pub fn print_outcome(outcome: &VerificationOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
        return Ok(());
    }

    let headline = match &outcome.verdict {
        Ok(ReputationVerdict::Suspicious) => style(outcome.headline()).red().bold(),
        Ok(ReputationVerdict::Safe) => style(outcome.headline()).green().bold(),
        _ => style(outcome.headline()).yellow().bold(),
    };

    println!();
    println!("{}: {}", headline, outcome.payload);
    if let Some(detail) = outcome.detail() {
        println!("  {}", style(detail).dim());
    }
    if outcome.is_alarming() {
        println!(
            "  {}",
            style("This URL is a verified phishing site. Do not open it.").red()
        );
    }
    println!();

    Ok(())
}

/// Prints per-session counters
pub fn print_stats(stats: &SessionStats) {
    println!(
        "Frames analyzed: {} (noise: {}, errors: {}, dropped: {})",
        stats.frames_analyzed, stats.noise_suppressed, stats.decode_errors, stats.payloads_dropped
    );
}
