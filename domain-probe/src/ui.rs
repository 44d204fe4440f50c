//! Display logic for the domain-probe CLI.
//!
//! This module handles all text output: the run header, one colored line per
//! probe result as it arrives, and the final summary with the status-code
//! histogram and per-category table. Uses only the `console` crate.

use console::{pad_str, style, Alignment};
use domain_probe_lib::{ProbeResult, RunStats};
use std::time::Duration;

const DOMAIN_WIDTH: usize = 30;

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(loaded: usize, probed: usize, concurrency: usize) {
    println!(
        "{} {} {}",
        style("domain-probe").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— Loaded {} domain{} from CSV",
            loaded,
            if loaded == 1 { "" } else { "s" }
        ))
        .dim(),
    );

    let mut meta_parts: Vec<String> = Vec::new();
    if probed != loaded {
        meta_parts.push(format!("Probing first {}", probed));
    }
    meta_parts.push(format!("Workers: {}", concurrency));

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single probe result with colors and alignment.
///
/// The mark distinguishes three outcomes: a response below 400, a 4xx/5xx
/// response, and a transport failure.
pub fn print_result(result: &ProbeResult) {
    let padded_domain = pad_str(&result.domain.name, DOMAIN_WIDTH, Alignment::Left, Some(".."));
    let duration = format_duration(result.duration);

    match result.status {
        Some(code) if code < 400 => {
            println!(
                "  {} {}  {}  Status: {}  {}",
                style("✓").green().bold(),
                style(&padded_domain).white(),
                style(format!("({})", result.domain.category)).dim(),
                style(code).green(),
                style(format!("[{}]", duration)).dim(),
            );
        }
        Some(code) => {
            println!(
                "  {} {}  {}  Status: {}  {}",
                style("!").yellow().bold(),
                style(&padded_domain).white(),
                style(format!("({})", result.domain.category)).dim(),
                style(code).yellow(),
                style(format!("[{}]", duration)).dim(),
            );
        }
        None => {
            let message = result.error.as_deref().unwrap_or("unknown error");
            println!(
                "  {} {}  {}  Error: {}  {}",
                style("✗").red().bold(),
                style(&padded_domain).white(),
                style(format!("({})", result.domain.category)).dim(),
                style(message).red(),
                style(format!("[{}]", duration)).dim(),
            );
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary: totals, status-code histogram, category table.
pub fn print_summary(stats: &RunStats) {
    println!();
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!("  {}", style("Summary").bold());
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!("  Total domains checked: {}", style(stats.total).bold());
    println!(
        "  Successful: {}",
        style(stats.successful).green().bold()
    );
    println!("  Failed: {}", style(stats.failed).red().bold());

    if !stats.status_codes.is_empty() {
        println!();
        println!("  {}", style("Status Code Distribution:").bold());
        for (code, count) in stats.status_codes_sorted() {
            println!(
                "    {}: {} domain{}",
                style(code).cyan(),
                count,
                if count == 1 { "" } else { "s" }
            );
        }
    }

    if !stats.categories.is_empty() {
        println!();
        println!("  {}", style("Category Statistics:").bold());
        for (category, tallies) in stats.categories_sorted() {
            println!(
                "    {}: Total={}, Success={}, Failed={}",
                style(category).cyan(),
                tallies.total,
                tallies.success,
                tallies.failed,
            );
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Render a duration compactly: milliseconds below one second, otherwise
/// fractional seconds.
fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use domain_probe_lib::Domain;

    fn make_result(status: Option<u16>) -> ProbeResult {
        ProbeResult {
            domain: Domain::new("example.com", "tech"),
            status,
            error: if status.is_none() {
                Some("dns error".to_string())
            } else {
                None
            },
            duration: Duration::from_millis(120),
        }
    }

    #[test]
    fn test_format_duration_millis() {
        assert_eq!(format_duration(Duration::from_millis(482)), "482ms");
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_millis(1250)), "1.2s");
        assert_eq!(format_duration(Duration::from_secs(10)), "10.0s");
    }

    #[test]
    fn test_print_result_does_not_panic() {
        // Smoke tests for all three outcome shapes
        print_result(&make_result(Some(200)));
        print_result(&make_result(Some(301)));
        print_result(&make_result(Some(404)));
        print_result(&make_result(None));
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        let mut stats = RunStats::new();
        stats.record(&make_result(Some(200)));
        stats.record(&make_result(Some(404)));
        stats.record(&make_result(None));
        print_summary(&stats);

        // Empty summary is also printable
        print_summary(&RunStats::new());
    }
}
