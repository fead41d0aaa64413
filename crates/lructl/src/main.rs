//! lructl - line-oriented command shell over an in-memory LRU cache

mod command;
mod error;
mod logging;
mod shell;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::{LruCache, SharedLru};
use tracing::info;

use crate::logging::LogConfig;
use crate::shell::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Command script to replay (reads stdin when omitted)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// JSON logging configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Console log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// File log level (trace, debug, info, warn, error)
    #[arg(long)]
    file_level: Option<String>,

    /// Emit console logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print each command before its output
    #[arg(short, long)]
    echo: bool,

    /// Preallocate room for this many entries (not a size limit)
    #[arg(long, default_value_t = 0)]
    reserve: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = match &args.config {
        Some(path) => LogConfig::load(path)
            .with_context(|| format!("Failed to load logging config {}", path.display()))?,
        None => LogConfig::default(),
    }
    .with_overrides(
        args.log_level.as_deref(),
        args.file_level.as_deref(),
        args.log_file.clone(),
        args.json_logs,
    );
    logging::init(&log_config).context("Failed to initialize logging")?;

    info!("Starting lructl v{}", env!("CARGO_PKG_VERSION"));

    let shell = Shell::new(
        SharedLru::from_cache(LruCache::with_capacity(args.reserve)),
        args.echo,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let executed = match &args.script {
        Some(path) => {
            info!("Replaying script {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            shell.run(BufReader::new(file), &mut out)?
        }
        None => shell.run(io::stdin().lock(), &mut out)?,
    };

    info!(
        executed,
        remaining = shell.cache().len(),
        "Session finished"
    );
    Ok(())
}
