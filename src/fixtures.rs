//! Server-side state the suite relies on.
//!
//! Jobs `1` and `2` must exist before a case runs, `0` must never exist and
//! `10` is reserved for the create case. [`prepare`] establishes that state
//! before every case, [`teardown`] removes what a run created and puts the
//! baseline jobs back with their seeded contents.

use std::fmt;

use rand::Rng;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::client::{ApiResponse, ClientError, JobsClient};
use crate::models::{timestamp_now, Job};

/// Jobs every case may assume exist
pub const BASELINE_IDS: [i64; 2] = [1, 2];

/// Identifier that never exists
pub const MISSING_ID: i64 = 0;

/// Identifier the create case inserts
pub const CREATED_ID: i64 = 10;

/// Path segment that is not an integer
pub const MALFORMED_ID: &str = "string";

const FRESH_ID_ATTEMPTS: usize = 5;

#[derive(Debug)]
pub enum FixtureError {
    Client(ClientError),

    /// The server answered a setup request with an unexpected status
    Unexpected { step: String, response: Box<ApiResponse> },

    /// No unused identifier was found for a fresh job
    NoFreshId,
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Client(e) => write!(f, "{}", e),
            FixtureError::Unexpected { step, response } => {
                write!(f, "{}: {} body={}", step, response.describe(), response.text)
            }
            FixtureError::NoFreshId => {
                write!(f, "no unused job id found after {} attempts", FRESH_ID_ATTEMPTS)
            }
        }
    }
}

impl std::error::Error for FixtureError {}

impl From<ClientError> for FixtureError {
    fn from(e: ClientError) -> Self {
        FixtureError::Client(e)
    }
}

/// Payload used by the create and edit cases
pub fn sample_job(id: i64) -> Job {
    Job {
        id,
        team_leader_id: 4,
        job: "Working hard".to_string(),
        work_size: 100,
        collaborators: "1, 2, 3".to_string(),
        start_date: timestamp_now(),
        end_date: None,
        is_finished: false,
    }
}

/// Record seeded for a baseline identifier
pub fn baseline_job(id: i64) -> Job {
    match id {
        1 => Job {
            id,
            team_leader_id: 1,
            job: "Deployment of residential modules 1 and 2".to_string(),
            work_size: 15,
            collaborators: "2, 3".to_string(),
            start_date: "2024-03-01T08:00:00".to_string(),
            end_date: None,
            is_finished: false,
        },
        2 => Job {
            id,
            team_leader_id: 2,
            job: "Exploration of mineral resources".to_string(),
            work_size: 15,
            collaborators: "4, 3".to_string(),
            start_date: "2024-03-01T08:00:00".to_string(),
            end_date: Some("2024-03-16T18:00:00".to_string()),
            is_finished: true,
        },
        _ => Job {
            job: format!("Baseline job {}", id),
            ..sample_job(id)
        },
    }
}

/// Bring the server to the state every case assumes
pub async fn prepare(client: &JobsClient) -> Result<(), FixtureError> {
    for id in BASELINE_IDS {
        ensure_present(client, &baseline_job(id)).await?;
    }
    ensure_absent(client, CREATED_ID).await?;
    ensure_absent(client, MISSING_ID).await?;
    Ok(())
}

/// Remove every job a run created and restore the baseline jobs, contents included
pub async fn teardown(client: &JobsClient, created: &[i64]) -> Result<(), FixtureError> {
    for &id in created {
        ensure_absent(client, id).await?;
    }
    for id in BASELINE_IDS {
        restore(client, &baseline_job(id)).await?;
    }
    info!("Fixture teardown removed {} created jobs", created.len());
    Ok(())
}

/// Pick a random identifier the server does not know yet
pub async fn fresh_id(client: &JobsClient) -> Result<i64, FixtureError> {
    for _ in 0..FRESH_ID_ATTEMPTS {
        let id: i64 = rand::thread_rng().gen_range(1_000..1_000_000);
        let resp = client.get_job(id).await?;
        if resp.status == StatusCode::NOT_FOUND {
            debug!("Fresh job id {}", id);
            return Ok(id);
        }
    }
    Err(FixtureError::NoFreshId)
}

async fn ensure_present(client: &JobsClient, job: &Job) -> Result<(), FixtureError> {
    let resp = client.get_job(job.id).await?;
    if resp.is_success() {
        return Ok(());
    }
    if resp.status != StatusCode::NOT_FOUND {
        return Err(FixtureError::Unexpected {
            step: format!("look up baseline job {}", job.id),
            response: Box::new(resp),
        });
    }

    let resp = client.create_job(job).await?;
    if !resp.is_success() {
        return Err(FixtureError::Unexpected {
            step: format!("seed baseline job {}", job.id),
            response: Box::new(resp),
        });
    }
    info!("Seeded baseline job {}", job.id);
    Ok(())
}

/// Put a baseline job back exactly as seeded, creating it when missing
async fn restore(client: &JobsClient, job: &Job) -> Result<(), FixtureError> {
    let resp = client.update_job(job.id, job).await?;
    if resp.is_success() {
        return Ok(());
    }
    if resp.status == StatusCode::NOT_FOUND {
        return ensure_present(client, job).await;
    }
    Err(FixtureError::Unexpected {
        step: format!("restore baseline job {}", job.id),
        response: Box::new(resp),
    })
}

async fn ensure_absent(client: &JobsClient, id: i64) -> Result<(), FixtureError> {
    let resp = client.delete_job(id).await?;
    if resp.is_success() {
        debug!("Removed leftover job {}", id);
        return Ok(());
    }
    if resp.status == StatusCode::NOT_FOUND {
        return Ok(());
    }
    Err(FixtureError::Unexpected {
        step: format!("remove job {}", id),
        response: Box::new(resp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_jobs_keep_their_ids() {
        for id in BASELINE_IDS {
            assert_eq!(baseline_job(id).id, id);
        }
        assert_eq!(baseline_job(7).id, 7);
    }

    #[test]
    fn sample_job_is_unfinished_work() {
        let job = sample_job(CREATED_ID);
        assert_eq!(job.job, "Working hard");
        assert_eq!(job.end_date, None);
        assert!(!job.is_finished);
    }
}
