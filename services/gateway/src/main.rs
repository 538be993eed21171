mod config;
mod error;
mod exchange;
mod handlers;
mod models;
mod router;
mod state;

use config::Config;
use exchange::Exchange;
use router::create_router;
use rust_decimal::Decimal;
use settlement::{Settler, UserRegistry, VaultSettler};
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use types::ids::{MarketId, UserId};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    tracing::info!("starting exchange gateway");

    let config = Config::default();
    let registry = Arc::new(UserRegistry::new());
    let settler = Arc::new(VaultSettler::default());

    let mut exchange = Exchange::new(registry, settler.clone() as Arc<dyn Settler>);
    for market in &config.markets {
        exchange.add_market(MarketId::new(market.as_str()));
    }
    for seed in &config.seed_users {
        let user = exchange.add_user(UserId::from_i64(seed.id), &seed.private_key_hex)?;
        settler.credit(&user.address, Decimal::from(config.seed_balance))?;
        tracing::info!(user_id = seed.id, address = %user.address, "seeded user");
    }

    let app = create_router(AppState::new(exchange));

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
