//! Runs the suite against a real deployment.
//!
//! Ignored by default. Start the service, then run
//! `JOBS_API_BASE_URL=http://127.0.0.1:8080 cargo test --test live_server -- --ignored`.

use job_api_suite::{
    client::JobsClient,
    config::Config,
    suite::{FixtureMode, Suite},
};

#[actix_web::test]
#[ignore = "needs a running jobs API at JOBS_API_BASE_URL"]
async fn live_server_passes_every_case() {
    let config = Config::from_env().expect("configuration");
    let client = JobsClient::from_config(&config).expect("client");

    let report = Suite::new().run(&client, FixtureMode::Managed).await;

    for outcome in report.failures() {
        if let Err(failure) = &outcome.result {
            eprintln!("{}: {}", outcome.name, failure);
        }
    }
    assert!(report.is_success(), "{} of {} cases failed", report.failed(), report.outcomes.len());
}
