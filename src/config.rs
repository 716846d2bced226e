//! Process configuration, read from the environment

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;

const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration of the service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Address to listen on
    pub address: SocketAddr,

    /// Postgres connection string, notes are kept in memory without it
    pub database_url: Option<String>,

    /// Size of the connection pool
    pub max_connections: u32,

    /// Time a single request may take
    pub request_timeout: Duration,
}

impl Config {
    /// Read the configuration from the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` when a variable is set to an invalid value
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration with a custom lookup
    ///
    /// Empty values are treated as not set
    fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mut address = var("ADDRESS")
            .as_deref()
            .unwrap_or(DEFAULT_ADDRESS)
            .parse::<SocketAddr>()
            .context("Invalid `ADDRESS`")?;

        // optional override of just the port
        if let Some(port) = var("PORT") {
            address.set_port(port.parse::<u16>().context("Invalid `PORT`")?);
        }

        let max_connections = var("DATABASE_MAX_CONNECTIONS")
            .map(|value| value.parse::<u32>())
            .transpose()
            .context("Invalid `DATABASE_MAX_CONNECTIONS`")?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .map(|value| value.parse::<u64>())
            .transpose()
            .context("Invalid `REQUEST_TIMEOUT_SECS`")?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            address,
            database_url: var("DATABASE_URL"),
            max_connections,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}
