//! Pulse Bot - price and TVL monitoring daemon.
//!
//! Polls the price and TVL APIs on fixed cadences and pushes all-time-high
//! and daily-digest notifications decided against durable state.

mod config;

use clap::Parser;
use config::AppConfig;
use pulse_alerts::{AthTracker, DailyGate, DigestEngine, LogSink, TvlKeeper};
use pulse_feeds::{PollScheduler, PriceFetcher, TvlFetcher};
use pulse_store::{KeyValueStore, SqliteStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Pulse Bot CLI
#[derive(Parser, Debug)]
#[command(name = "pulse-bot")]
#[command(about = "Price and TVL monitoring notification bot", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Log level override: trace, debug, info, warn, error
    #[arg(short, long)]
    log_level: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = AppConfig::load(&args.config);
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    init_logging(&config.log_level);
    info!(config = %args.config, "Starting pulse-bot");

    let store: Arc<dyn KeyValueStore> = match SqliteStore::connect(&config.database_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(url = %config.database_url, error = %e, "Failed to open the store");
            return;
        }
    };

    // TVL source: fetch -> keeper.
    let keeper = Arc::new(TvlKeeper::new(
        store.clone(),
        config.tvl.protocol_name.clone(),
    ));
    let mut tvl_scheduler = PollScheduler::new(
        TvlFetcher::new(config.tvl.api_key.clone()),
        Duration::from_secs(config.tvl.fetch_period_secs),
    );
    tvl_scheduler.subscribe(keeper.clone());

    // Price source: fetch -> digest decision -> sink.
    let engine = DigestEngine::new(
        AthTracker::new(store.clone(), "ath:usd", config.ath_baseline()),
        DailyGate::new(store.clone(), "digest"),
        config.schedule(),
        keeper,
        Arc::new(LogSink),
        config.recipients.clone(),
    );
    let mut price_scheduler = PollScheduler::new(
        PriceFetcher::new(config.price.coin_id.clone()),
        Duration::from_secs(config.price.fetch_period_secs),
    )
    .with_startup_delay(Duration::from_secs(config.price.startup_delay_secs));
    price_scheduler.subscribe(Arc::new(engine));

    let tvl_handle = tokio::spawn(tvl_scheduler.run());
    let price_handle = tokio::spawn(price_scheduler.run());

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");

    // Dropping the tasks abandons any in-flight cycle cleanly; every store
    // write is a single statement, so there are no partial records.
    info!("Shutting down");
    tvl_handle.abort();
    price_handle.abort();
}
