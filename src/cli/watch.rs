//! Watch command implementation.
//!
//! Builds once, then rebuilds after every burst of source changes. Runs are
//! strictly sequential; a failed run is reported and the loop keeps going.

use std::time::Duration;

use clap::Args;
use tracing::info;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::watch::{ChangeSubscription, DEFAULT_QUIET};

use super::build::run_once;
use super::{open_pipeline, ProjectArgs};

/// Rebuild whenever a source changes
#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Quiet period in milliseconds that ends a burst of changes
    #[arg(long, default_value_t = DEFAULT_QUIET.as_millis() as u64)]
    pub quiet_ms: u64,
}

pub fn run(args: WatchArgs, printer: &Printer) -> Result<()> {
    let mut project = args.project.load_project()?;
    let pipeline = open_pipeline(&project, false)?;
    let quiet = Duration::from_millis(args.quiet_ms);

    if let Err(e) = run_once(&project, &pipeline, printer) {
        printer.error("Failed", &e.to_string());
    }

    let subscription = ChangeSubscription::new(&project.texdir)?;
    printer.info("Watching", &display_path(&project.texdir));

    while let Some(batch) = subscription.next_batch(quiet) {
        info!(files = batch.len(), "rebuilding after changes");
        printer.info(
            "Changed",
            &plural(batch.len(), "source", "sources"),
        );

        project.rescan();
        if let Err(e) = run_once(&project, &pipeline, printer) {
            printer.error("Failed", &e.to_string());
        }
    }

    Ok(())
}
