//! Product catalog domain, persistence and shared configuration.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod logging;
pub mod shutdown;

#[cfg(test)]
mod test;
