#![allow(dead_code)]

use std::time::Duration;

use actix_web::{dev::ServerHandle, web::Data};
use job_api_suite::{client::JobsClient, config::parse_base_url, stub};

/// A stub API bound to a free local port
pub struct StubServer {
    pub store: Data<stub::JobStore>,
    pub client: JobsClient,
    handle: ServerHandle,
}

impl StubServer {
    pub async fn start(store: stub::JobStore) -> Self {
        let store = Data::new(store);
        let (server, addrs) = stub::bind(store.clone(), ("127.0.0.1", 0)).expect("bind stub");
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let base_url = parse_base_url(&format!("http://{}", addrs[0])).expect("base url");
        let client = JobsClient::new(base_url, Duration::from_secs(5)).expect("client");

        Self { store, client, handle }
    }

    pub async fn seeded() -> Self {
        Self::start(stub::JobStore::seeded()).await
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
