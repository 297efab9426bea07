use std::io;

use anyhow::Context;

use crate::aggregate;
use crate::config::Config;
use crate::error::ScrapeError;
use crate::fetch::{DocumentSource, HttpSource};
use crate::navigate;
use crate::report;
use crate::types::OutputFormat;

/// Entry point called by `main` once the configuration is validated.
pub fn run(config: &Config) -> anyhow::Result<()> {
    let source = HttpSource::new(config).context("building HTTP client")?;
    run_with_source(config, &source)
}

/// Same as `run` but accepts a document source for test injection.
pub fn run_with_source<S: DocumentSource + Sync>(
    config: &Config,
    source: &S,
) -> anyhow::Result<()> {
    let races = navigate::gather_races(source, config)?;

    if config.show {
        for (i, name) in races.keys().enumerate() {
            println!("{}: {}", i + 1, name);
        }
        return Ok(());
    }

    // Validated non-None by Config when --show is absent.
    let selection = config
        .election
        .ok_or_else(|| ScrapeError::Selection("no election selected".to_string()))?;
    let race = races.values().nth(selection - 1).ok_or_else(|| {
        ScrapeError::Selection(format!(
            "--election {selection} is out of range (1..={})",
            races.len()
        ))
    })?;

    vprintln!(config.verbose, 1, "aggregating race: {}", race.name);
    let result = aggregate::assemble(source, race, config)?;

    let stdout = io::stdout().lock();
    match config.format {
        OutputFormat::Csv => report::write_csv(&result, stdout),
        OutputFormat::Json => report::write_json(&result, stdout),
    }
}
