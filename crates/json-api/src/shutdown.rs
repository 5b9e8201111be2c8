//! Graceful shutdown of the HTTP server

use catalog_app::shutdown::{ShutdownSignalError, wait_for_signal};
use salvo::server::ServerHandle;

pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    wait_for_signal().await?;

    // Stop accepting connections and let in-flight requests finish
    handle.stop_graceful(None);

    Ok(())
}
