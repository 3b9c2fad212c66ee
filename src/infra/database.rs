//! For interacting with the database.

use super::config::DatabaseConfig;
use sqlx::{pool::PoolOptions, postgres::PgConnectOptions, ConnectOptions, PgPool, Postgres, Transaction};
use std::str::FromStr;
use tracing::log::LevelFilter;

/// A common transaction type.
/// Use this for the business and persistence layer.
pub type Tx = Transaction<'static, Postgres>;

/// A common database pool type.
pub type DbPool = PgPool;

/// Connects to the database based on some configuration.
pub fn init_db(config: &DatabaseConfig) -> color_eyre::eyre::Result<PgPool> {
    let db_options = PgConnectOptions::from_str(&config.url)?
        .username(&config.username)
        .password(&config.password)
        .log_statements(LevelFilter::Debug);
    let db: PgPool = PoolOptions::default()
        .min_connections(config.min_idle)
        .max_connections(config.max_pool_size)
        .acquire_timeout(config.connection_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_lazy_with(db_options);
    Ok(db)
}
