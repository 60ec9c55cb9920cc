//! Obescan: obesity category prediction from lifestyle data.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use obescan::adapters::sanitize::SanitizingMakeWriter;
use obescan::tui::App;
use obescan::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Logs written to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if config.log_mode.uses_file(interactive) {
        if let Some(parent) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Obescan...");
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let mut app = App::new(config)?;
    app.run()?;

    tracing::info!("Obescan shutdown complete.");
    Ok(())
}
