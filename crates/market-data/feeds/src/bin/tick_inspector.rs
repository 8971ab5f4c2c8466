//! Tick inspector binary
//!
//! Imports the instrument master into the snapshot cache, browses the
//! cached directory, and decodes captured tick frames against it.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use feeds::{
    DirectoryConfig, InstrumentStore, QuoteBook, SnapshotCache, load_master_csv, resolve_all,
};
use market_proto::decode_ticks;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tick-inspector")]
#[command(about = "Instrument directory and tick frame inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cache directory (overrides TICKMAP_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Kite instrument master CSV into the cache
    Import {
        /// Instrument master CSV
        csv: PathBuf,
    },

    /// Show cached instruments
    Show {
        /// Trading symbol to look up
        #[arg(long)]
        symbol: Option<String>,

        /// Exchange for --symbol
        #[arg(long, default_value = "NSE")]
        exchange: String,

        /// Case-insensitive search on symbol, type and name
        #[arg(long)]
        search: Option<String>,

        /// Maximum results for --search
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Underlying to list expiries or an option chain for
        #[arg(long)]
        underlying: Option<String>,

        /// Expiry (YYYY-MM-DD) for the option chain of --underlying
        #[arg(long)]
        expiry: Option<NaiveDate>,

        /// Underlying last price, marks in-the-money strikes in the chain
        #[arg(long)]
        spot: Option<f64>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a captured tick frame and join it with the cached directory
    Ticks {
        /// File holding one encoded `Data` frame
        file: PathBuf,
    },

    /// Validate the cache
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables before the filter reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize logging
    let level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("tick_inspector={level}").parse()?)
        .add_directive(format!("feeds={level}").parse()?)
        .add_directive(format!("market_proto={level}").parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    let mut config = DirectoryConfig::from_env().context("Invalid directory configuration")?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    let cache = SnapshotCache::new(config.cache_dir.clone());

    match cli.command {
        Commands::Import { csv } => {
            let import = load_master_csv(&csv)
                .with_context(|| format!("Failed to read instrument master {}", csv.display()))?;
            if import.skipped > 0 {
                warn!("Skipped {} unparseable rows", import.skipped);
            }
            let meta = cache.save(&import.directory).await?;
            info!(
                "✅ Imported {} instruments ({} bytes) into {}",
                meta.instrument_count,
                meta.bytes,
                cache.dir().display()
            );
        }

        Commands::Show {
            symbol,
            exchange,
            search,
            limit,
            underlying,
            expiry,
            spot,
            json,
        } => {
            let Some(store) = load_store(&cache).await? else {
                return Ok(());
            };

            if let Some(symbol) = symbol {
                match store.get_by_symbol(&exchange, &symbol).await {
                    Some(inst) if json => println!("{}", serde_json::to_string_pretty(&inst)?),
                    Some(inst) => {
                        info!(
                            "  {} - {} ({}, {})",
                            inst.token, inst.trading_symbol, inst.exchange, inst.segment
                        );
                        info!(
                            "    Type: {:?}, Tick: {}, Lot: {}, Scale: {}",
                            inst.kind(),
                            inst.tick_size,
                            inst.lot_size,
                            inst.price_scale()
                        );
                    }
                    None => info!("No instrument {}:{}", exchange, symbol),
                }
            } else if let Some(term) = search {
                let found = store.search(&term, limit).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&found)?);
                } else {
                    info!("\n🔍 Matches for '{}' ({}):", term, found.len());
                    for inst in found {
                        info!(
                            "  {} - {} ({}, {}, {})",
                            inst.token,
                            inst.trading_symbol,
                            inst.exchange,
                            inst.instrument_type,
                            inst.name
                        );
                    }
                }
            } else if let Some(underlying) = underlying {
                match expiry {
                    Some(expiry) => {
                        let chain = store.option_chain(&underlying, expiry).await;
                        if json {
                            println!("{}", serde_json::to_string_pretty(&chain)?);
                        } else {
                            info!(
                                "\n📈 Option chain {} {} ({}):",
                                underlying,
                                expiry,
                                chain.len()
                            );
                            for inst in chain {
                                let itm = spot.is_some_and(|ltp| inst.is_itm(ltp));
                                info!(
                                    "  {:>10.2} {} - {} ({}){}",
                                    inst.strike,
                                    inst.instrument_type,
                                    inst.trading_symbol,
                                    inst.token,
                                    if itm { " ITM" } else { "" }
                                );
                            }
                        }
                    }
                    None => {
                        let today = Local::now().date_naive();
                        let expiries = store.expiries_from(&underlying, today).await;
                        info!("\n📅 Expiries for {} ({}):", underlying, expiries.len());
                        for expiry in expiries {
                            info!("  {}", expiry);
                        }
                    }
                }
            } else {
                info!("\n📊 Instrument Summary:");
                info!("Total instruments: {}", store.count().await);
                info!("\nUse --symbol, --search or --underlying to see specific instruments");
            }
        }

        Commands::Ticks { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let ticks = decode_ticks(&bytes)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            info!("Decoded {} ticks from {}", ticks.len(), file.display());

            let store = load_store(&cache).await?.unwrap_or_default();
            let book = QuoteBook::new();
            book.apply_all(ticks);

            let (quotes, unresolved) = resolve_all(&book, &store).await;
            for quote in &quotes {
                info!(
                    "  {:<24} ltp {:>12.4}  chg {:>+10.4}  bid {:>12}  ask {:>12}  vol {}",
                    quote.instrument.trading_symbol,
                    quote.last_price,
                    quote.change(),
                    fmt_price(quote.best_bid()),
                    fmt_price(quote.best_ask()),
                    quote.tick.volume_traded
                );
            }
            for token in unresolved {
                if let Some(tick) = book.get(token) {
                    info!(
                        "  {:<24} ltp {:>12} (raw, no directory entry)",
                        token, tick.last_price
                    );
                }
            }
            if book.stale_count() > 0 {
                warn!("{} stale ticks ignored", book.stale_count());
            }
        }

        Commands::Validate => {
            info!("Validating cache in {}", cache.dir().display());

            let directory = match cache.load().await {
                Ok(Some(directory)) => directory,
                Ok(None) => {
                    error!("❌ No snapshot found. Run 'import' first.");
                    return Ok(());
                }
                Err(e) => {
                    error!("❌ Snapshot unreadable: {}", e);
                    return Ok(());
                }
            };
            info!("✅ Snapshot valid: {} instruments", directory.len());

            match cache.metadata().await {
                Ok(Some(meta)) => {
                    info!("✅ Metadata valid, saved at {}", meta.saved_at);
                    if meta.instrument_count != directory.len() {
                        warn!(
                            "⚠️ Metadata count {} differs from snapshot {}",
                            meta.instrument_count,
                            directory.len()
                        );
                    }
                }
                Ok(None) => info!("⚠️ Metadata file not found"),
                Err(e) => error!("❌ Metadata unreadable: {}", e),
            }

            if config.should_refresh_at(Local::now().time()) {
                info!("Directory refresh is due now");
            }
        }
    }

    Ok(())
}

/// Load the cached directory into a store, `None` when nothing is cached
async fn load_store(cache: &SnapshotCache) -> Result<Option<InstrumentStore>> {
    match cache.load().await? {
        Some(directory) => {
            let store = InstrumentStore::new();
            store.replace(directory).await;
            Ok(Some(store))
        }
        None => {
            error!("No cached instruments found. Run 'import' first.");
            Ok(None)
        }
    }
}

fn fmt_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{p:.4}"))
}
