use serde::Serialize;

use crate::cli::Cli;
use crate::types::OutputFormat;

/// Validated runtime configuration. Built from the CLI surface before any
/// network activity so user-input errors never cost a page fetch.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub show: bool,
    pub election: Option<usize>,
    pub format: OutputFormat,
    pub base_url: String,
    pub timeout_secs: u64,
    pub fetch_threads: usize,
    pub verbose: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            show: false,
            election: None,
            format: OutputFormat::Csv,
            base_url: crate::cli::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            fetch_threads: 1,
            verbose: 0,
        }
    }
}

impl Config {
    fn validate_selection(&self) -> anyhow::Result<()> {
        if !self.show && self.election.is_none() {
            anyhow::bail!("either --show or --election <N> must be provided");
        }

        if let Some(n) = self.election {
            if n == 0 {
                anyhow::bail!("--election is a 1-based index; 0 is out of range");
            }
        }

        Ok(())
    }

    fn validate_network(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("--base-url must not be empty");
        }

        if self.timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be at least 1");
        }

        if self.fetch_threads == 0 {
            anyhow::bail!("--fetch-threads must be at least 1");
        }

        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Self {
            show: cli.show,
            election: cli.election,
            format: cli.format,
            base_url: cli.base_url,
            timeout_secs: cli.timeout_secs,
            fetch_threads: cli.fetch_threads,
            verbose: cli.verbose,
        };

        config.validate_selection()?;
        config.validate_network()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn errors_when_no_selection_mode_given() {
        let cli = Cli::parse_from(["boe-scrape"]);
        let err = Config::try_from(cli).unwrap_err();
        assert!(err.to_string().contains("either --show or --election"));
    }

    #[test]
    fn errors_when_election_is_zero() {
        let cli = Cli::parse_from(["boe-scrape", "--election", "0"]);
        let err = Config::try_from(cli).unwrap_err();
        assert!(err.to_string().contains("1-based index"));
    }

    #[test]
    fn errors_when_fetch_threads_is_zero() {
        let cli = Cli::parse_from(["boe-scrape", "--show", "--fetch-threads", "0"]);
        let err = Config::try_from(cli).unwrap_err();
        assert!(err.to_string().contains("--fetch-threads"));
    }

    #[test]
    fn show_alone_is_a_valid_invocation() {
        let cli = Cli::parse_from(["boe-scrape", "--show"]);
        let config = Config::try_from(cli).expect("config should parse");
        assert!(config.show);
        assert_eq!(config.election, None);
        assert_eq!(config.format, OutputFormat::Csv);
    }

    #[test]
    fn format_flag_selects_json() {
        let cli = Cli::parse_from(["boe-scrape", "--election", "3", "--format", "json"]);
        let config = Config::try_from(cli).expect("config should parse");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.election, Some(3));
    }
}
