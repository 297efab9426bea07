use clap::{ArgAction, Parser};

use crate::types::OutputFormat;

pub const DEFAULT_BASE_URL: &str = "https://web.enrboenyc.us/";

#[derive(Parser, Debug, serde::Serialize)]
#[command(
    name = "boe-scrape",
    version,
    about = "Scrape NYC BOE election-night results into a normalized per-district tally"
)]
pub struct Cli {
    // race selection options
    /// List all available races with their selection numbers and exit
    #[arg(long = "show")]
    pub show: bool,

    /// 1-based index into the race list printed by --show
    #[arg(short = 'e', long = "election", value_name = "N")]
    pub election: Option<usize>,

    // output options
    /// Output format written to stdout
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    // network options
    /// Base URL of the results site (override for testing against a mirror)
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP timeout for each page fetch, in seconds
    #[arg(long = "timeout-secs", value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Number of threads used to fetch assembly-district pages (1 = sequential)
    #[arg(long = "fetch-threads", value_name = "N", default_value_t = 1)]
    pub fetch_threads: usize,

    // logging options
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}
