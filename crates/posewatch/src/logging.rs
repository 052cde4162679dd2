//! Logging setup

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::LogFormat;
use crate::settings::LogSettings;

/// Initialize logging
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    let level: Level = settings
        .level
        .parse()
        .with_context(|| format!("unknown log level {:?}", settings.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = match settings.format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    installed.context("Failed to set tracing subscriber")
}
