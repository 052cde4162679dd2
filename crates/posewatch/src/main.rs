//! posewatch - Main Entry Point

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use posewatch::{init_logging, run, Cli, Settings};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?.apply_cli(&cli);
    init_logging(&settings.log)?;

    info!("=== posewatch v{} ===", env!("CARGO_PKG_VERSION"));

    // The frame loop is blocking; Ctrl-C only asks it to stop so the
    // record still gets its final save.
    let stop = Arc::new(AtomicBool::new(false));
    let mut worker = tokio::task::spawn_blocking({
        let stop = stop.clone();
        move || run(settings, stop)
    });

    let summary = tokio::select! {
        joined = &mut worker => joined.context("monitor thread panicked")??,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, finishing the current frame");
            stop.store(true, Ordering::Relaxed);
            worker.await.context("monitor thread panicked")??
        }
    };

    info!(
        "Done: {} frames, {} with a subject",
        summary.frames, summary.frames_with_subject
    );
    Ok(())
}
