//! RS-232 Monitor - Main Entry Point
//!
//! Opens the monitor window. An optional TOML config path may be given as the
//! first argument or through `RS232MON_CONFIG`.

use anyhow::Context;
use rs232mon::{
    backend::SourceOpener,
    config::MonitorConfig,
    frontend::MonitorApp,
    session::Monitor,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Config path from the command line; `RS232MON_CONFIG` is the fallback
fn config_path() -> Option<PathBuf> {
    std::env::args().nth(1).map(PathBuf::from)
}

/// Install the global subscriber
///
/// The returned guard must stay alive for file logging to flush.
fn init_logging(config: &MonitorConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let (file_layer, guard) = if config.logging.file_logging {
        let log_dir = config.capture.output_dir.join("logs");
        let appender = tracing_appender::rolling::daily(log_dir, "rs232mon.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn source_opener() -> Box<dyn SourceOpener> {
    #[cfg(feature = "mock-source")]
    {
        Box::new(rs232mon::backend::DemoOpener::default())
    }
    #[cfg(not(feature = "mock-source"))]
    {
        Box::new(rs232mon::backend::SerialOpener)
    }
}

fn main() -> anyhow::Result<()> {
    let config = MonitorConfig::load_or_default(config_path()).context("Failed to load config")?;
    let _log_guard = init_logging(&config);

    tracing::info!("Starting RS-232 Monitor");
    tracing::debug!("Configuration: {:?}", config);

    let (monitor, events) = Monitor::new(config, source_opener());
    let mut app = MonitorApp::new(monitor, events);
    app.refresh_ports();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("RS-232 Monitor"),
        ..Default::default()
    };

    // on_exit disconnects and closes any open file; dropping the monitor is the fallback
    eframe::run_native(
        "RS-232 Monitor",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("Shutting down...");
    Ok(())
}
