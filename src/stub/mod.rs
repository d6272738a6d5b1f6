//! In-memory jobs API used as a test double for the suite itself.
//!
//! It speaks the same contract the suite checks and starts with the
//! baseline jobs seeded, so `job-api-suite stub` followed by
//! `job-api-suite run` passes without any external deployment.

pub mod error;
pub mod handlers;
pub mod store;

use std::net::{SocketAddr, ToSocketAddrs};

use actix_web::{dev::Server, web::Data, App, HttpServer};
use tracing::info;

use crate::shutdown::ShutdownCoordinator;

pub use error::ApiError;
pub use handlers::stub_config;
pub use store::JobStore;

/// Bind the stub and return the not-yet-polled server with its bound addresses
///
/// Binding port 0 picks a free port; read it back from the returned addresses.
pub fn bind(store: Data<JobStore>, addr: impl ToSocketAddrs) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let server = HttpServer::new(move || App::new().app_data(store.clone()).configure(stub_config))
        .workers(1)
        .disable_signals()
        .bind(addr)?;

    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

/// Serve a seeded stub until CTRL+C or SIGTERM
pub async fn serve(host: &str, port: u16) -> std::io::Result<()> {
    let store = Data::new(JobStore::seeded());
    let (server, addrs) = bind(store, (host, port))?;

    for addr in &addrs {
        info!("Stub jobs API listening on http://{}", addr);
    }

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task)
        .wait_for_shutdown()
        .await
}
