//! bulk-rename - Parallel Recursive Rename Engine
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use bulk_rename::config::{CliArgs, RunConfig};
use bulk_rename::engine::Renamer;
use bulk_rename::progress::{print_header, print_summary, EventPrinter, ProgressReporter};
use clap::Parser;
use crossbeam_channel::unbounded;
use std::process::ExitCode;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.debug)?;

    // Validate and create config
    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    if config.show_progress {
        print_header(&config.roots, config.mode, config.worker_count);
    }

    let renamer = Renamer::new(config);
    let progress = renamer.config().show_progress.then(ProgressReporter::new);

    // Events are printed on their own thread, above the spinner
    let (tx, rx) = unbounded();
    let printer = EventPrinter::new(progress.as_ref().map(ProgressReporter::bar))
        .spawn(rx)
        .context("Failed to start event printer")?;

    let result = thread::scope(|scope| {
        if let Some(p) = &progress {
            let counters = renamer.counters();
            scope.spawn(move || p.follow(counters));
        }

        let result = renamer.run(&tx);

        // Stops the ticker before the scope joins it
        if let Some(p) = &progress {
            p.finish_and_clear();
        }
        result
    });

    // Closing the channel lets the printer drain and exit
    drop(tx);
    let _ = printer.join();

    let summary = result.context("Rename failed")?;

    if renamer.config().show_progress {
        print_summary(&summary);
    }

    if summary.has_errors() {
        info!(errors = summary.errors, "Rename completed with errors");
    }

    Ok(())
}

fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("bulk_rename=debug,warn")
    } else {
        EnvFilter::new("bulk_rename=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
