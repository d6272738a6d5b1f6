pub mod cases;
pub mod expect;
pub mod failure;

use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use tracing::{error, info, warn};

use crate::client::JobsClient;
use crate::fixtures;

pub use failure::{ExpectedStatus, Failure};

pub type CaseResult = Result<(), Failure>;

type CaseFn = for<'a> fn(&'a mut RunContext) -> BoxFuture<'a, CaseResult>;

/// State shared by the cases of one run
pub struct RunContext {
    pub client: JobsClient,
    created: Vec<i64>,
}

impl RunContext {
    pub fn new(client: JobsClient) -> Self {
        Self {
            client,
            created: Vec::new(),
        }
    }

    /// Remember a job this run created so teardown can remove it
    pub fn track(&mut self, id: i64) {
        if !self.created.contains(&id) {
            self.created.push(id);
        }
    }

    pub fn created(&self) -> &[i64] {
        &self.created
    }
}

/// One named request/assert sequence
#[derive(Clone, Copy)]
pub struct Case {
    pub name: &'static str,
    pub description: &'static str,
    run: CaseFn,
}

impl Case {
    pub const fn new(name: &'static str, description: &'static str, run: CaseFn) -> Self {
        Self { name, description, run }
    }
}

impl std::fmt::Debug for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// How a run treats server-side fixture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureMode {
    /// Seed the baseline before every case and clean up after the run
    Managed,
    /// Assume the server already holds the baseline
    Ambient,
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub name: &'static str,
    pub description: &'static str,
    pub result: CaseResult,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn outcome(&self, name: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Ordered collection of cases
#[derive(Debug, Clone)]
pub struct Suite {
    cases: Vec<Case>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    pub fn new() -> Self {
        Self { cases: cases::all() }
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Keep only the named cases, preserving run order
    ///
    /// An empty filter keeps everything. Unknown names are an error.
    pub fn filtered(self, only: &[String]) -> Result<Self, String> {
        if only.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = only.iter().find(|name| !self.cases.iter().any(|c| c.name == name.as_str())) {
            return Err(format!("unknown case `{}`; use `list` to see all cases", unknown));
        }

        let cases = self
            .cases
            .into_iter()
            .filter(|c| only.iter().any(|name| name == c.name))
            .collect();
        Ok(Self { cases })
    }

    /// Run every case in order, one request at a time
    ///
    /// A failed expectation ends its case; the run moves on to the next case
    /// so the report covers all of them.
    pub async fn run(&self, client: &JobsClient, mode: FixtureMode) -> SuiteReport {
        info!("Running {} cases against {}", self.cases.len(), client.base_url());

        let mut ctx = RunContext::new(client.clone());
        let mut report = SuiteReport::default();

        for case in &self.cases {
            let started = Instant::now();

            let result = match mode {
                FixtureMode::Managed => match fixtures::prepare(&ctx.client).await {
                    Ok(()) => (case.run)(&mut ctx).await,
                    Err(e) => Err(Failure::from(e)),
                },
                FixtureMode::Ambient => (case.run)(&mut ctx).await,
            };
            let elapsed = started.elapsed();

            match &result {
                Ok(()) => info!("PASS {} ({:?})", case.name, elapsed),
                Err(failure) => error!("FAIL {}: {}", case.name, failure),
            }

            report.outcomes.push(CaseOutcome {
                name: case.name,
                description: case.description,
                result,
                elapsed,
            });
        }

        if mode == FixtureMode::Managed {
            if let Err(e) = fixtures::teardown(&ctx.client, ctx.created()).await {
                warn!("Fixture teardown failed: {}", e);
            }
        }

        info!("{} passed, {} failed", report.passed(), report.failed());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_names_are_unique() {
        let suite = Suite::new();
        let mut names: Vec<_> = suite.cases().iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), suite.cases().len());
    }

    #[test]
    fn filter_keeps_run_order() {
        let only = vec!["edit_job".to_string(), "list_jobs".to_string()];
        let suite = Suite::new().filtered(&only).unwrap();
        let names: Vec<_> = suite.cases().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["list_jobs", "edit_job"]);
    }

    #[test]
    fn filter_rejects_unknown_names() {
        let err = Suite::new().filtered(&["nope".to_string()]).unwrap_err();
        assert!(err.contains("nope"));
    }

    #[test]
    fn track_records_each_id_once() {
        let client = JobsClient::new(
            crate::config::parse_base_url("http://127.0.0.1:1").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        let mut ctx = RunContext::new(client);
        ctx.track(10);
        ctx.track(10);
        ctx.track(4242);
        assert_eq!(ctx.created(), &[10, 4242]);
    }
}
