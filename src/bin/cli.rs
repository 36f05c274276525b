// src/bin/cli.rs
use std::path::Path;

use clap::Parser;
use gc_scrape::cli::{self, Cli};
use gc_scrape::config::consts::LOG_FILE;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    if args.debug_log {
        gc_scrape::log::init(Path::new(LOG_FILE))?;
    } else {
        gc_scrape::log::init_stderr();
    }

    cli::run(args)?;
    Ok(())
}
