use chrono::FixedOffset;
use clap::Parser;
use kn_core::{Error, Result};
use kn_scrapers::cli::{handle_command, ScraperArgs};
use kn_scrapers::fetcher::DEFAULT_UTC_OFFSET_HOURS;
use kn_scrapers::logging::{init_logging, parse_level};
use kn_scrapers::{KaktusScraper, NewsFetcher, NewsManager, ReqwestClient};
use kn_storage::TtlPolicy;
use kn_web::{create_app, AppState};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        let overflow = || format!("Duration too large: {}", s);

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let num = current_number.parse::<u64>().map_err(|_| overflow())?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(overflow)?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            let num = current_number.parse::<u64>().map_err(|_| overflow())?;
            total_seconds = total_seconds.checked_add(num).ok_or_else(overflow)?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Kaktus Media news aggregator", long_about = None)]
struct Cli {
    /// Base URL of the news listing
    #[arg(long, env = "KAKTUS_BASE_URL", default_value = KaktusScraper::BASE_URL)]
    base_url: String,
    /// Request timeout for listing fetches (e.g. 10s, 1m)
    #[arg(long, env = "KN_TIMEOUT", default_value = "10s")]
    timeout: HumanDuration,
    /// Offset from UTC used to decide which calendar day is "today"
    #[arg(long, env = "KN_UTC_OFFSET_HOURS", default_value_t = DEFAULT_UTC_OFFSET_HOURS, allow_hyphen_values = true)]
    utc_offset_hours: i32,
    /// Cache backend
    #[arg(long, env = "KN_STORAGE", default_value = "memory")]
    storage: String,
    /// Time-to-live of the "today" bucket
    #[arg(long, default_value = "10m")]
    today_ttl: HumanDuration,
    /// Time-to-live of the "yesterday" bucket
    #[arg(long, default_value = "1d")]
    yesterday_ttl: HumanDuration,
    /// Time-to-live of latest-page snapshots
    #[arg(long, default_value = "5m")]
    latest_ttl: HumanDuration,
    /// error, warn, info, debug or trace
    #[arg(long, env = "KN_LOG_LEVEL", default_value = "info", value_parser = parse_level)]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch listings and print them as JSON
    Scrape(ScraperArgs),
    /// Serve the news API
    Serve {
        #[arg(long, env = "KN_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
        /// Refresh today and yesterday periodically (e.g. 10m, 1h)
        #[arg(long)]
        refresh_interval: Option<HumanDuration>,
    },
}

impl Cli {
    fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            today: self.today_ttl.0,
            yesterday: self.yesterday_ttl.0,
            latest: self.latest_ttl.0,
        }
    }

    /// Rejects values that parse but cannot drive the fetcher or the refresh loop.
    fn validate(&self) -> Result<()> {
        if self.timeout.0.is_zero() {
            return Err(Error::Config("Timeout must be greater than zero".to_string()));
        }
        if let Commands::Serve {
            refresh_interval: Some(interval),
            ..
        } = &self.command
        {
            if interval.0.is_zero() {
                return Err(Error::Config("Refresh interval must be greater than zero".to_string()));
            }
        }
        Ok(())
    }

    fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| Error::Config(format!("UTC offset out of range: {}h", self.utc_offset_hours)))
    }
}

/// Builds every collaborator up front so misconfiguration stops the process
/// before any request is served.
async fn build_manager(cli: &Cli) -> Result<NewsManager> {
    cli.validate()?;
    let scraper = KaktusScraper::new(&cli.base_url)?;
    let client = ReqwestClient::new(cli.timeout.0)?;
    let storage = kn_storage::create_storage(&cli.storage).await?;
    let fetcher = NewsFetcher::new(Arc::new(client), Arc::new(scraper)).with_utc_offset(cli.utc_offset()?);

    info!(
        base_url = %cli.base_url,
        storage = %cli.storage,
        timeout_secs = cli.timeout.0.as_secs(),
        "🦗 Scraper initialized"
    );
    Ok(NewsManager::new(fetcher, storage, cli.ttl_policy()))
}

async fn serve(manager: Arc<NewsManager>, addr: SocketAddr, refresh_interval: Option<HumanDuration>) -> Result<()> {
    if let Some(interval) = refresh_interval {
        let manager = Arc::clone(&manager);
        info!("Running periodic refresh every {}s", interval.0.as_secs());
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.0);
            loop {
                ticker.tick().await;
                let recent = manager.refresh().await;
                if let Some(e) = recent.today.error.as_ref().or(recent.yesterday.error.as_ref()) {
                    warn!(error = %e, "refresh cycle finished with errors");
                }
            }
        });
    }

    let app = create_app(AppState::new(manager)).await;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("📰 Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let manager = build_manager(&cli).await?;

    match cli.command {
        Commands::Scrape(args) => handle_command(args, &manager).await?,
        Commands::Serve {
            addr,
            refresh_interval,
        } => serve(Arc::new(manager), addr, refresh_interval).await?,
    }

    Ok(())
}
