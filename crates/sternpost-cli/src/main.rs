//! Sternpost CLI - Render and post-process Mermaid.js diagrams

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    // Logging is initialized in run() once the flags are known
    let cli_args = cli::Cli::parse();

    let mut app = cli::SternpostApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
