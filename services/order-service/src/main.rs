use anyhow::Context;
use matching_engine::SubmitResult;
use order_service::{PlaceOrderRequest, ServiceConfig, ServiceRuntime};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use types::ids::{Symbol, UserId};
use types::order::Side;

/// (user, side, price, quantity) replayed against one instrument on startup
const DEMO_FLOW: &[(u64, Side, u64, u64)] = &[
    (1, Side::BUY, 100, 10),
    (2, Side::BUY, 101, 4),
    (3, Side::SELL, 103, 6),
    (4, Side::SELL, 100, 12),
    (5, Side::BUY, 104, 3),
];

const DEMO_SYMBOL: &str = "XYZ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("reading configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("parsing log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(?config, "Starting order service");

    let runtime = ServiceRuntime::start(&config);
    let service = runtime.service();

    for &(user, side, price, quantity) in DEMO_FLOW {
        let request = PlaceOrderRequest::new(
            DEMO_SYMBOL,
            Decimal::from(price),
            Decimal::from(quantity),
            side,
        );
        let result = service.submit_request(UserId::new(user), request)?;
        let status = match &result {
            SubmitResult::Resting(_) => "resting",
            SubmitResult::PartiallyFilled { .. } => "partially filled",
            SubmitResult::Filled { .. } => "filled",
        };
        info!(
            order_id = ?result.order().id.map(|id| id.value()),
            status,
            trades = result.trades().len(),
            "Demo order processed"
        );
    }

    if let Some(snapshot) = service.snapshot(&Symbol::new(DEMO_SYMBOL), config.snapshot_depth) {
        info!(
            symbol = %snapshot.symbol,
            bids = ?snapshot.bids,
            asks = ?snapshot.asks,
            "Book snapshot"
        );
    }

    drop(service);
    runtime.shutdown().await;

    Ok(())
}
