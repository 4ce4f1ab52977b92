//! Output formatting utilities for the CLI
//!
//! Tables for probe results and pool counters, plus colored status messages.

use std::time::Duration;

use tabled::{settings::Style, Table, Tabled};

use crate::commands::ProbeOutcome;
use tp_pool::PoolStats;

/// Format probe outcomes as an ASCII table
///
/// Returns "No probes run" for an empty slice.
pub fn format_probe_results(probes: &[ProbeOutcome]) -> String {
    if probes.is_empty() {
        return "No probes run".to_string();
    }

    #[derive(Tabled)]
    struct ProbeRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "CONNECTION")]
        connection: String,
        #[tabled(rename = "RESULT")]
        result: String,
        #[tabled(rename = "LATENCY")]
        latency: String,
    }

    let rows: Vec<ProbeRow> = probes
        .iter()
        .map(|p| ProbeRow {
            index: p.index,
            connection: p.connection.clone().unwrap_or_else(|| "-".to_string()),
            result: match &p.error {
                None => "ok".to_string(),
                Some(e) => truncate(e, 48),
            },
            latency: format_latency(p.elapsed),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format pool counters as a two-column table
pub fn format_pool_stats(stats: &PoolStats) -> String {
    #[derive(Tabled)]
    struct StatRow {
        #[tabled(rename = "POOL")]
        name: &'static str,
        #[tabled(rename = "VALUE")]
        value: String,
    }

    fn row(name: &'static str, value: impl ToString) -> StatRow {
        StatRow {
            name,
            value: value.to_string(),
        }
    }

    let rows = vec![
        row("idle", format!("{}/{}", stats.idle, stats.capacity)),
        row("created", stats.created),
        row("create failures", stats.create_failures),
        row("checked out", stats.checked_out),
        row("checked in", stats.checked_in),
        row("dropped", stats.dropped),
        row("health probes", stats.probes),
        row("probe failures", stats.probe_failures),
        row("sweeps", stats.sweeps),
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format a latency in the most readable unit
fn format_latency(elapsed: Duration) -> String {
    let micros = elapsed.as_micros();
    if micros < 1_000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Truncate a string with ellipsis if too long
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix to stderr
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow to stderr
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan.
///
/// Goes to stderr so machine-readable stdout stays clean.
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
