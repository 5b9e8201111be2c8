//! Product Catalog RPC Server

use std::{future, process};

use tokio::net::TcpListener;
use tracing::{error, info};

use catalog_app::{context::AppContext, logging::init_subscriber, shutdown::wait_for_signal};

use crate::{config::RpcConfig, handler::RpcHandler};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod handler;
mod message;
mod payloads;
mod server;

/// Catalog RPC Server entry point
#[tokio::main]
pub async fn main() {
    let config = RpcConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(e) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "subscriber installation failed, nothing else can report it"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        process::exit(1);
    }

    let addr = config.socket_addr();

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(bind_error) => {
            error!("failed to bind {addr}: {bind_error}");

            process::exit(1);
        }
    };

    let app = match AppContext::from_database_url(&config.database.database_url).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    info!("Starting rpc server on {addr}");

    let shutdown = async {
        if let Err(error) = wait_for_signal().await {
            error!("failed to listen for shutdown signal: {error}");

            // Without a signal handler the server runs until killed
            future::pending::<()>().await;
        }
    };

    server::serve(listener, RpcHandler::new(app.products.clone()), shutdown).await;

    app.close().await;

    info!("rpc server stopped");
}
