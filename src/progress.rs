//! Progress reporting for the rename walk
//!
//! Provides the live spinner, the per-item event printer and the header
//! and summary shown around a run.

use crate::engine::RunSummary;
use crate::events::{EventOutcome, RenameEvent};
use crate::transform::Transformation;
use crate::walker::{CountersSnapshot, RunCounters};
use console::style;
use crossbeam_channel::Receiver;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Refresh interval of the spinner message
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Progress reporter that displays live counters
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,

    /// Stop signal for the ticker
    stop: Arc<AtomicBool>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(TICK_INTERVAL);

        Self {
            bar,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle to the bar, for printing above it
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }

    /// Update the progress display
    pub fn update(&self, snapshot: &CountersSnapshot) {
        self.bar.set_message(progress_message(snapshot));
    }

    /// Refresh from `counters` until [`finish_and_clear`](Self::finish_and_clear) is called
    pub fn follow(&self, counters: &RunCounters) {
        while !self.stop.load(Ordering::SeqCst) {
            self.update(&counters.snapshot());
            thread::sleep(TICK_INTERVAL);
        }
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn progress_message(snapshot: &CountersSnapshot) -> String {
    format!(
        "Dirs: {} | Renamed: {} | Skipped: {} | Errors: {}",
        format_number(snapshot.dirs_scanned),
        format_number(snapshot.renamed()),
        format_number(snapshot.skipped()),
        format_number(snapshot.errors),
    )
}

/// Prints rename events on its own thread
pub struct EventPrinter {
    /// Spinner to keep out of the way of printed lines
    bar: Option<ProgressBar>,
}

impl EventPrinter {
    pub fn new(bar: Option<ProgressBar>) -> Self {
        Self { bar }
    }

    /// Drain `events` until every sender is dropped; the thread returns
    /// the number of lines printed
    pub fn spawn(self, events: Receiver<RenameEvent>) -> io::Result<JoinHandle<u64>> {
        thread::Builder::new().name("events".into()).spawn(move || {
            let mut printed = 0u64;
            for event in events {
                let line = format_event(&event);
                let print = || {
                    if event.outcome == EventOutcome::Error {
                        eprintln!("{}", line);
                    } else {
                        println!("{}", line);
                    }
                };
                match &self.bar {
                    Some(bar) => bar.suspend(print),
                    None => print(),
                }
                printed += 1;
            }
            printed
        })
    }
}

/// One display line for an event
pub fn format_event(event: &RenameEvent) -> String {
    let old = event.old_path.display();
    let reason = event.reason.as_deref().unwrap_or("");

    match event.outcome {
        EventOutcome::Renamed => match &event.new_path {
            Some(new) => format!("{} {} -> {}", style("renamed").green(), old, new.display()),
            None => format!("{} {}", style("renamed").green(), old),
        },
        EventOutcome::Skipped => {
            format!("{} {} ({})", style("skipped").dim(), old, reason)
        }
        EventOutcome::Error => match &event.new_path {
            Some(new) => format!(
                "{} {} -> {}: {}",
                style("error").red().bold(),
                old,
                new.display(),
                reason
            ),
            None => format!("{} {}: {}", style("error").red().bold(), old, reason),
        },
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of the run
pub fn print_summary(summary: &RunSummary) {
    let duration_secs = summary.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        summary.renamed() as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    println!("{}", style("Rename Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {} renamed, {} skipped",
        style("Files:").bold(),
        format_number(summary.files_renamed),
        format_number(summary.files_skipped)
    );
    println!(
        "  {} {} renamed, {} skipped",
        style("Directories:").bold(),
        format_number(summary.dirs_renamed),
        format_number(summary.dirs_skipped)
    );
    println!(
        "  {} {:.1}s ({:.0} renames/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if summary.has_errors() {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(summary.errors)
        );
    }
    println!();
}

/// Print a header at the start of the run
pub fn print_header(roots: &[PathBuf], mode: Transformation, workers: usize) {
    println!();
    println!(
        "{} {}",
        style("bulk-rename").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    for root in roots {
        println!("  {} {}", style("Root:").bold(), root.display());
    }
    println!("  {} {}", style("Mode:").bold(), mode);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!();
}
