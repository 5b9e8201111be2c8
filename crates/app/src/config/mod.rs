//! Configuration shared by every catalog binary.

mod db;
mod logging;

pub use db::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
