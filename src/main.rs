use clap::Parser;

use boe_scrape::actions;
use boe_scrape::cli::Cli;
use boe_scrape::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::try_from(cli)?;
    actions::run(&config)
}
