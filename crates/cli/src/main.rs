//! `zyflo-docs`: build, check and query the Zyflo docs from the terminal.

mod cli;
mod commands;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::{self, Write};
use zyflo_site::{DocsSite, SiteConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let site = DocsSite::new(load_config(&cli)?);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Build { out: dir, jobs } => commands::build(&site, dir, *jobs, &mut out),
        Commands::Check => commands::check(&site, &mut out),
        Commands::Paths { json } => commands::paths(&site, *json, &mut out),
        Commands::Toc { segments, json } => commands::toc(&site, segments, *json, &mut out),
        Commands::Search { query } => commands::search(&site, query, &mut out),
    }?;
    out.flush()?;
    Ok(())
}

/// Reads the config file, falling back to built-in defaults when the default
/// file name is absent.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    if !cli.config.exists() && cli.uses_default_config() {
        log::debug!("no {} found, using defaults", cli.config.display());
        return Ok(SiteConfig::default());
    }
    SiteConfig::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))
}
