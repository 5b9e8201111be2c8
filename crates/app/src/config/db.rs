//! Database Config

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `SQLite` connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://catalog.db",
        hide_env_values = true
    )]
    pub database_url: String,
}
