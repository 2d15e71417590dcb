use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod content;
mod input;
mod loop_runner;
mod ui;

use loop_runner::{run_app, LoopConfig};

fn main() {
    init_tracing();
    info!("=== Llewdor Escape Startup ===");

    if let Err(err) = run_app(LoopConfig::default()) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout belongs to the alternate-screen UI.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
