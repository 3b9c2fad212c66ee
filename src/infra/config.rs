//! For reading application configuration.

use serde::Deserialize;
use std::time::Duration;

/// Application configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Server address.
    pub address: String,
    /// Server http port.
    pub http_port: u16,
}

/// Database configuration.
///
/// The password is taken literally; a value consisting entirely of
/// whitespace is a valid password, not an unset one.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    /// The database connection URL, e.g. `postgres://localhost:5432/inventory`.
    pub url: String,
    /// The database username.
    pub username: String,
    /// The database password.
    pub password: String,
    /// The number of connections kept idle and ready.
    #[serde(default = "default_min_idle")]
    pub min_idle: u32,
    /// The maximum number of pooled connections.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    /// How long to wait for a connection from the pool.
    #[serde(with = "humantime_serde", default = "default_connection_timeout")]
    pub connection_timeout: Duration,
    /// How long a connection may sit idle before being closed.
    #[serde(with = "humantime_serde", default = "default_idle_timeout")]
    pub idle_timeout: Duration,
    /// The maximum lifetime of a single connection.
    #[serde(with = "humantime_serde", default = "default_max_lifetime")]
    pub max_lifetime: Duration,
}

fn default_min_idle() -> u32 {
    5
}

fn default_max_pool_size() -> u32 {
    20
}

fn default_connection_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_max_lifetime() -> Duration {
    Duration::from_secs(1800)
}

/// Retrieve [`Config`] from the default configuration file.
#[tracing::instrument]
pub fn load_config() -> color_eyre::eyre::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config"))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(config)
}
