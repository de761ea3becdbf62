//! Player wallet HTTP server.
//!
//! Serves the wallet API over a durable store (PostgreSQL or in-process) with
//! a snapshot cache (Redis or in-process).

use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use player_wallet::{
    cache::{MemoryWalletCache, RedisWalletCache, WalletCache},
    db::{Database, MemoryWalletRepository, WalletRepository},
    wallet::WalletManager,
};
use pw_server::{
    api::{self, AppState, auth::TokenService},
    config::{CacheBackend, CliOverrides, ServerConfig, StoreBackend},
    logging, metrics,
};
use tracing::{info, warn};

const HELP: &str = "\
Run the player wallet server

USAGE:
  pw_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --redis-url  URL         Redis connection string     [default: env REDIS_URL or redis://127.0.0.1:6379]
  --store      BACKEND     postgres | memory           [default: env WALLET_STORE or postgres]
  --cache      BACKEND     redis | memory              [default: env WALLET_CACHE or redis]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  JWT_SECRET               JWT signing secret, at least 32 characters (required)
  METRICS_BIND             Prometheus listener address (optional)
  DEFAULT_WALLET_BALANCE   Opening balance of new wallets
  RUST_LOG                 Log filter [default: info,sqlx=warn]
  (See .env.example for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = CliOverrides {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        redis_url: pargs.opt_value_from_str("--redis-url")?,
        store: pargs.opt_value_from_str("--store")?,
        cache: pargs.opt_value_from_str("--cache")?,
    };

    logging::init();

    let config = ServerConfig::from_env(overrides)?;
    info!(
        "Starting wallet server at {} (store: {}, cache: {})",
        config.bind, config.store, config.cache_backend
    );

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics exposed at http://{addr}/metrics");
    }

    let repository: Arc<dyn WalletRepository> = match config.store {
        StoreBackend::Postgres => {
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            let repository = db.wallets();
            repository
                .ensure_schema()
                .await
                .context("Failed to prepare wallets table")?;
            info!("Database connected successfully");
            Arc::new(repository)
        }
        StoreBackend::Memory => {
            warn!("Using in-process store; balances are lost on restart");
            Arc::new(MemoryWalletRepository::new())
        }
    };

    let cache: Arc<dyn WalletCache> = match config.cache_backend {
        CacheBackend::Redis => {
            let cache = RedisWalletCache::connect(&config.cache)
                .await
                .context("Failed to connect to redis")?;
            info!("Redis connected successfully");
            Arc::new(cache)
        }
        CacheBackend::Memory => Arc::new(MemoryWalletCache::new()),
    };

    let wallet_manager = WalletManager::with_config(repository, cache, config.wallet.clone());

    let state = AppState {
        wallet_manager: Arc::new(wallet_manager),
        tokens: Arc::new(TokenService::new(&config.security.jwt_secret)),
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
