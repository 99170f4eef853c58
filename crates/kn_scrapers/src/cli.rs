use chrono::NaiveDate;
use clap::{Args, Subcommand};
use kn_core::{parse_date, Result};
use serde::Serialize;
use crate::manager::NewsManager;
use crate::scrapers::{self, Scraper};

#[derive(Args, Clone, Debug)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ScraperCommands {
    /// Fetch today's listing
    Today,
    /// Fetch yesterday's listing
    Yesterday,
    /// Fetch the listing of a specific date
    Date {
        /// Calendar date in YYYY-MM-DD form
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
    },
    /// Fetch today and yesterday together and cache both
    Recent,
    /// List available scrapers
    List,
}

fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

pub async fn handle_command(args: ScraperArgs, manager: &NewsManager) -> Result<()> {
    let fetcher = manager.fetcher();
    match args.command {
        ScraperCommands::Today => print_json(&fetcher.fetch_today().await)?,
        ScraperCommands::Yesterday => print_json(&fetcher.fetch_yesterday().await)?,
        ScraperCommands::Date { date } => print_json(&fetcher.fetch_news(date).await)?,
        ScraperCommands::Recent => print_json(&manager.refresh().await)?,
        ScraperCommands::List => {
            println!("Available scrapers:");
            for scraper in scrapers::kyrgyzstan::get_scrapers() {
                println!("  {}", describe(scraper.as_ref()));
            }
        }
    }
    Ok(())
}

fn describe(scraper: &dyn Scraper) -> String {
    let meta = scraper.source_metadata();
    format!(
        "{} {}/{} ({})",
        meta.emoji,
        meta.region,
        scraper.cli_names().first().copied().unwrap_or(meta.name),
        meta.origin
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
