use tracing_subscriber::EnvFilter;

use crate::config::StartupConfig;
use crate::create_app;

/// Install the fmt subscriber; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    init_tracing();

    let config = StartupConfig::from_env();
    let store = config.open_store();
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Flow Editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(create_app(cc, store)))),
    )
}
