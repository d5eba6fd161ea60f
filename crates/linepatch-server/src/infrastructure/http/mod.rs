//! HTTP API and static UI hosting.
//!
//! # How requests flow (for beginners)
//!
//! ```text
//! browser ──HTTP──► axum Router ──► handler (routes.rs)
//!                                      │  spawn_blocking
//!                                      ▼
//!                         application use case / adapter
//!                         (template store, locator, applier)
//! ```
//!
//! `axum` matches the method and path against the route table in
//! [`routes::router`] and calls the handler with the extracted pieces (path
//! parameters, JSON body, shared [`ApiState`]).  Template and file work is
//! plain blocking `std::fs` code, so handlers move it onto Tokio's blocking
//! thread pool instead of stalling the async workers.
//!
//! Anything not under `/api` is served from the static UI directory.

pub mod dto;
pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, ApiState};

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Serves `app` on `listener` until `shutdown` resolves, then lets in-flight
/// requests finish.
///
/// # Errors
///
/// Returns the I/O error that stopped the accept loop.
pub async fn run_server(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{addr}");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
