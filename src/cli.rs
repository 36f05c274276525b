// src/cli.rs
use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand};

use crate::config::consts::CREDENTIALS_FILE;
use crate::csv::{write_row, CACHE_HEADERS};
use crate::{Cache, ClientOptions, Geocaching, Point, Rectangle, Result};

#[derive(Parser, Debug)]
#[command(name = "gc_scrape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account name; falls back to the credentials file.
    #[arg(short, long, env = "GC_USERNAME")]
    pub username: Option<String>,

    #[arg(short, long, env = "GC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Credentials file looked up in the working and home directory.
    #[arg(long, default_value = CREDENTIALS_FILE)]
    pub credentials: String,

    /// Separate output columns with tabs instead of commas.
    #[arg(long)]
    pub tsv: bool,

    #[arg(long)]
    pub include_headers: bool,

    /// Write logs to .store/debug.log instead of stderr.
    #[arg(long)]
    pub debug_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the user the site considers logged in after login.
    Whoami,

    /// Classic search around a point.
    Search {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Stop after this many caches.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Map-tile search inside a rectangle.
    Quick {
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        /// Drop caches outside the rectangle.
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        zoom: Option<u8>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let options = ClientOptions::default().with_credentials_file(&cli.credentials);
    let mut gc = Geocaching::with_options(options)?;
    gc.login(cli.username.as_deref(), cli.password.as_deref())?;

    let sep = if cli.tsv { '\t' } else { ',' };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.include_headers && !matches!(cli.command, Command::Whoami) {
        let headers: Vec<String> = CACHE_HEADERS.iter().map(|h| s!(*h)).collect();
        write_row(&mut out, &headers, sep)?;
    }

    match cli.command {
        Command::Whoami => {
            let who = gc.get_logged_user(None)?;
            writeln!(out, "{}", who.unwrap_or_default())?;
        }
        Command::Search { lat, lon, limit } => {
            let point = Point::new(lat, lon);
            write_caches(&mut out, gc.search(&point, limit)?, sep)?;
        }
        Command::Quick { south, west, north, east, strict, zoom } => {
            let area = Rectangle::new(Point::new(south, west), Point::new(north, east));
            write_caches(&mut out, gc.search_quick(&area, strict, zoom)?, sep)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn write_caches<W: Write>(out: &mut W, caches: impl Iterator<Item = Result<Cache>>, sep: char) -> Result<()> {
    let mut count = 0usize;
    for cache in caches {
        write_row(&mut *out, &cache?.to_row(), sep)?;
        count += 1;
    }
    logf!("Wrote {count} caches");
    Ok(())
}
