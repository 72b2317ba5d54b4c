//! Eulerdraw CLI - Lay out Euler diagrams as circles and render them

mod cli;

use clap::Parser;
use eulerdraw::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Early logging; the app re-initializes from its own flags.
    if let Err(e) = init_logging(None, None) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::EulerdrawApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
