//! RPC server configuration

use clap::{Args, Parser};

use catalog_app::config::{DatabaseConfig, LoggingConfig};

/// RPC listener network settings.
#[derive(Debug, Args)]
pub struct RpcRuntimeConfig {
    /// Listener host address
    #[arg(long = "host", env = "RPC_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listener port
    #[arg(long = "port", env = "RPC_PORT", default_value = "3001")]
    pub port: u16,
}

/// Catalog RPC Server configuration
#[derive(Debug, Parser)]
#[command(name = "catalog-rpc", about = "Product Catalog RPC Server", long_about = None)]
pub struct RpcConfig {
    /// Listener settings.
    #[command(flatten)]
    pub server: RpcRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Product store settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}

impl RpcConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
