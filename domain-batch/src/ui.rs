//! Pretty-mode display logic for domain-batch CLI.
//!
//! This module handles all `--pretty` output: colored result lines,
//! grouped batch output, spinner animation, progress counters,
//! headers, and summaries. Uses only the `console` crate (already a dependency).

use console::{pad_str, style, Alignment, Term};
use domain_batch_lib::QueryResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message (e.g. "Querying 100 domains...").
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a pretty run.
pub fn print_header(candidate_count: usize, concurrency: usize, filter: Option<&str>) {
    println!(
        "{} {} {}",
        style("domain-batch").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— Querying {} domain{}",
            candidate_count,
            if candidate_count == 1 { "" } else { "s" }
        ))
        .dim(),
    );

    let mut meta_parts: Vec<String> = Vec::new();
    if let Some(name) = filter {
        meta_parts.push(format!("Filter: {}", name));
    }
    meta_parts.push(format!("Concurrency: {}", concurrency));

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single query result with colors and alignment.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]` is shown.
pub fn print_result(result: &QueryResult, debug: bool, counter: Option<(usize, usize)>) {
    let domain_width = 30;
    let padded_domain = pad_str(&result.domain, domain_width, Alignment::Left, Some(".."));

    let prefix = match counter {
        Some((cur, total)) => {
            format!("{} ", style(format!("[{}/{}]", cur, total)).dim())
        }
        None => String::new(),
    };

    if result.error.is_some() {
        let reason = brief_error(result);
        println!(
            "  {}{}  {}  {}",
            prefix,
            style(&padded_domain).white(),
            style("ERROR").yellow(),
            style(reason).dim(),
        );
    } else if result.is_registered {
        println!(
            "  {}{}  {}",
            prefix,
            style(&padded_domain).white(),
            style("TAKEN").red().bold(),
        );
    } else {
        println!(
            "  {}{}  {}",
            prefix,
            style(&padded_domain).white(),
            style("AVAILABLE").green().bold(),
        );
    }

    if debug {
        if let Some(error) = &result.error {
            println!("    {} {}", style("└─").dim(), style(error).dim());
        }
    }
}

// ── Grouped batch output ─────────────────────────────────────────────────────

/// Print results grouped by status: Available, Taken, Error.
/// Empty sections are omitted entirely.
pub fn print_grouped_results(results: &[QueryResult], debug: bool) {
    let mut available: Vec<&QueryResult> = Vec::new();
    let mut taken: Vec<&QueryResult> = Vec::new();
    let mut errored: Vec<&QueryResult> = Vec::new();

    for r in results {
        if r.error.is_some() {
            errored.push(r);
        } else if r.is_registered {
            taken.push(r);
        } else {
            available.push(r);
        }
    }

    if !available.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Available ({}) ", available.len()))
                .green()
                .bold(),
            style("─".repeat(40)).green().dim(),
        );
        for r in &available {
            print_grouped_line(r, debug);
        }
        println!();
    }

    if !taken.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Taken ({}) ", taken.len())).red().bold(),
            style("─".repeat(44)).red().dim(),
        );
        for r in &taken {
            print_grouped_line(r, debug);
        }
        println!();
    }

    if !errored.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Errors ({}) ", errored.len()))
                .yellow()
                .bold(),
            style("─".repeat(42)).yellow().dim(),
        );
        for r in &errored {
            print_grouped_line(r, debug);
        }
        println!();
    }
}

/// Print a single line inside a grouped section.
fn print_grouped_line(result: &QueryResult, debug: bool) {
    let domain_width = 30;
    let padded = pad_str(&result.domain, domain_width, Alignment::Left, Some(".."));

    if result.error.is_some() {
        let reason = brief_error(result);
        println!("    {}  {}", style(&padded).white(), style(reason).dim());
    } else {
        println!("    {}", style(&padded).white());
    }

    if debug {
        if let Some(error) = &result.error {
            println!("      {} {}", style("└─").dim(), style(error).dim());
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(
    total: usize,
    available: usize,
    taken: usize,
    errors: usize,
    stopped: bool,
    duration: Duration,
) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}{}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} taken", taken)).red(),
        style("|").dim(),
        style(format!("{} errors", errors)).yellow(),
        if stopped {
            format!("  {}", style("(stopped early)").yellow())
        } else {
            String::new()
        },
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Extract a brief error reason from a failed query result.
fn brief_error(result: &QueryResult) -> &str {
    match &result.error {
        Some(msg) => {
            let m = msg.to_lowercase();
            if m.contains("timeout") || m.contains("timed out") {
                "(timeout)"
            } else if m.contains("network") || m.contains("dns") || m.contains("connect") {
                "(network error)"
            } else if m.contains("parse") || m.contains("json") {
                "(parsing error)"
            } else {
                "(error)"
            }
        }
        None => "(unknown status)",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
