mod catalog;
mod cli;
mod clock;
mod config;
mod deploy;
mod export;
mod logging;
mod model;
mod panel;
mod progress;
mod session;
mod synthesize;
mod transcript;

use std::process;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    logging::init(&config.log_level, cli.verbose);

    if let Err(e) = cli::run(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
