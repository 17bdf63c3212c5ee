// Server module entry
// Accept loop, connection handling and request dispatch

pub mod connection;
pub mod dispatch;
pub mod listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use listener::create_reusable_listener;

/// Accept connections until the listener fails fatally
///
/// Must run inside a `tokio::task::LocalSet`; connections are served with
/// `spawn_local`.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::accept_connection(stream, peer_addr, &state, &active_connections);
            }
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
