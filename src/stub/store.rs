use std::collections::BTreeMap;
use std::fmt;

use tokio::sync::RwLock;
use tracing::debug;

use crate::fixtures::{baseline_job, BASELINE_IDS};
use crate::models::Job;

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    NotFound(i64),
    DuplicateId(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Job not found: {}", id),
            StoreError::DuplicateId(id) => write!(f, "Job already exists: {}", id),
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory job table keyed by id
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<BTreeMap<i64, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the baseline jobs
    pub fn seeded() -> Self {
        let jobs = BASELINE_IDS
            .iter()
            .map(|&id| (id, baseline_job(id)))
            .collect();
        Self {
            jobs: RwLock::new(jobs),
        }
    }

    /// All jobs ordered by id
    pub async fn list(&self) -> Vec<Job> {
        self.jobs.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.jobs.read().await.contains_key(&id)
    }

    pub async fn insert(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::DuplicateId(job.id));
        }
        debug!("Stub: inserting job {}", job.id);
        jobs.insert(job.id, job);
        Ok(())
    }

    /// Replace job `id`; the stored record always keeps `id`
    pub async fn replace(&self, id: i64, mut job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let slot = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        job.id = id;
        *slot = job;
        debug!("Stub: replaced job {}", id);
        Ok(())
    }

    pub async fn remove(&self, id: i64) -> Result<Job, StoreError> {
        let removed = self.jobs.write().await.remove(&id);
        removed.ok_or(StoreError::NotFound(id))
    }
}
