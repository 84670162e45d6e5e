//! amity: friendship recommendations and network analysis from the command line.
//!
//! Loads the friendship and tag files (see [`config::Config`]), runs one
//! command, and saves the files again if the command changed the network.
//!
//! ```bash
//! amity stats
//! amity recommend 42 -k 5 --method influence
//! amity path 1 17 --events trace.json
//! AMITY_LOG_LEVEL=debug amity communities --seed 7
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};

use amity_graph::{io, EventLog, SocialGraph};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(path) = cli.edges.clone() {
        config.edge_file = path;
    }
    if let Some(path) = cli.tags.clone() {
        config.tag_file = path;
    }

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        edges = %config.edge_file.display(),
        tags = %config.tag_file.display(),
        "amity starting"
    );

    let mut graph = SocialGraph::new();
    let outcome = io::load_files(&mut graph, &config.edge_file, &config.tag_file);
    if !outcome.is_ok() {
        warn!("continuing with a partially loaded network");
    }

    let mut log = EventLog::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(cli.command, &mut graph, &config, &mut log, &mut out)?;
    out.flush()?;

    if let Some(path) = cli.events {
        let file = File::create(&path)
            .with_context(|| format!("creating event file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &log)
            .with_context(|| format!("writing event file {}", path.display()))?;
        writer.flush()?;
        info!(events = log.len(), path = %path.display(), "trace written");
    }

    Ok(())
}
