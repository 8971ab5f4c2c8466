//! Directory and tick flow integration tests
//!
//! Master CSV -> snapshot cache -> store reload -> tick frame -> resolved quotes

use common::{Depth, Order, Tick};
use feeds::{FeedError, InstrumentStore, QuoteBook, SnapshotCache, parse_master_csv, resolve_all};
use market_proto::{decode_ticks, encode_ticks};
use pretty_assertions::assert_eq;

const MASTER: &str = "\
instrument_token,exchange_token,tradingsymbol,name,last_price,expiry,strike,tick_size,lot_size,instrument_type,segment,exchange
408065,1594,INFY,INFOSYS,0,,0,0.05,1,EQ,NSE,NSE
256265,1001,NIFTY 50,NIFTY 50,0,,0,0,0,EQ,INDICES,NSE
12345602,48225,NIFTY24DEC24000CE,NIFTY,0,2024-12-26,24000,0.05,25,CE,NFO-OPT,NFO
12345858,48226,NIFTY24DEC24000PE,NIFTY,0,2024-12-26,24000,0.05,25,PE,NFO-OPT,NFO
268041476,1047010,USDINR24DECFUT,USDINR,0,2024-12-27,0,0.0025,1,FUT,CDS-FUT,CDS
";

fn frame() -> Vec<u8> {
    encode_ticks(&[
        Tick {
            token: 408_065,
            last_price: 187_540,
            close: 185_000,
            volume_traded: 4_200_000,
            exchange_timestamp: 1_734_500_000,
            depth: Depth {
                buy: vec![Order { price: 187_535, quantity: 120, orders: 4 }],
                sell: vec![Order { price: 187_545, quantity: 80, orders: 2 }],
            },
            ..Tick::default()
        },
        Tick {
            token: 268_041_476,
            last_price: 849_250_000,
            exchange_timestamp: 1_734_500_000,
            ..Tick::default()
        },
        Tick {
            token: 999_999,
            last_price: 1_000,
            ..Tick::default()
        },
    ])
}

#[tokio::test]
async fn test_master_to_quotes() -> Result<(), FeedError> {
    let tmp = tempfile::tempdir()?;
    let cache = SnapshotCache::new(tmp.path().join("instruments"));

    let import = parse_master_csv(MASTER.as_bytes())?;
    assert_eq!(import.skipped, 0);
    assert_eq!(import.directory.len(), 5);
    cache.save(&import.directory).await?;

    // New session: reload from the snapshot only
    let directory = cache.load().await?.unwrap_or_default();
    assert_eq!(directory, import.directory);

    let store = InstrumentStore::new();
    store.replace(directory).await;

    let book = QuoteBook::new();
    assert_eq!(book.apply_all(decode_ticks(&frame())?), 3);

    let (quotes, unresolved) = resolve_all(&book, &store).await;
    assert_eq!(unresolved, vec![999_999]);
    assert_eq!(quotes.len(), 2);

    let infy = &quotes[0];
    assert_eq!(infy.instrument.trading_symbol, "INFY");
    assert!((infy.last_price - 1875.40).abs() < 1e-9);
    assert!((infy.change() - 25.40).abs() < 1e-9);
    assert_eq!(infy.best_bid(), Some(1875.35));

    let usdinr = &quotes[1];
    assert_eq!(usdinr.instrument.segment, "CDS-FUT");
    assert!((usdinr.last_price - 84.925).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_reload_replaces_wholesale() -> Result<(), FeedError> {
    let store = InstrumentStore::new();
    store
        .replace(parse_master_csv(MASTER.as_bytes())?.directory)
        .await;
    assert!(store.resolve(408_065).await.is_ok());

    let next_day = "\
instrument_token,exchange_token,tradingsymbol,name,last_price,expiry,strike,tick_size,lot_size,instrument_type,segment,exchange
500001,1953,INFY,INFOSYS,0,,0,0.05,1,EQ,NSE,NSE
";
    store
        .replace(parse_master_csv(next_day.as_bytes())?.directory)
        .await;

    assert!(store.resolve(408_065).await.is_err_and(|e| e.is_unresolved()));
    assert_eq!(
        store.get_by_symbol("NSE", "INFY").await.map(|i| i.token),
        Some(500_001)
    );
    assert_eq!(store.count().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_option_chain_from_master() -> Result<(), FeedError> {
    let store = InstrumentStore::new();
    store
        .replace(parse_master_csv(MASTER.as_bytes())?.directory)
        .await;

    let expiries = store.expiries("NIFTY").await;
    assert_eq!(expiries.len(), 1);

    let chain = store.option_chain("NIFTY", expiries[0]).await;
    let symbols: Vec<&str> = chain.iter().map(|i| i.trading_symbol.as_str()).collect();
    assert_eq!(symbols, vec!["NIFTY24DEC24000CE", "NIFTY24DEC24000PE"]);

    // Futures carry expiries but never appear in an option chain
    assert_eq!(store.expiries("USDINR").await.len(), 1);
    assert!(store.option_chain("USDINR", store.expiries("USDINR").await[0]).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_truncated_frame_rejected() {
    let bytes = frame();
    let result = decode_ticks(&bytes[..bytes.len() - 1]);
    assert!(result.is_err_and(|e| e.is_malformed()));
}
