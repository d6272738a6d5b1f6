use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Keys every create or update payload must carry
pub const REQUIRED_FIELDS: [&str; 8] = [
    "id",
    "team_leader_id",
    "job",
    "work_size",
    "collaborators",
    "start_date",
    "end_date",
    "is_finished",
];

/// A work item as exchanged with the jobs API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub team_leader_id: i64,
    pub job: String,
    pub work_size: i64,
    /// Comma-separated collaborator ids, e.g. "1, 2, 3"
    pub collaborators: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_finished: bool,
}

/// Success envelope for reads
#[derive(Debug, Serialize, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

/// Error envelope returned with 4xx responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

/// One field that differs between a submitted job and the one read back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl Job {
    /// Compare a job read back from the server against the submitted one.
    ///
    /// Timestamps are compared as points in time, so `2024-01-01T10:00:00`
    /// and `2024-01-01 10:00:00` match, and a server that drops fractional
    /// seconds still matches the whole second it kept.
    pub fn diff(&self, actual: &Job) -> Vec<FieldDiff> {
        let mut diffs = Vec::new();

        let mut check = |field: &'static str, expected: String, got: String, same: bool| {
            if !same {
                diffs.push(FieldDiff {
                    field,
                    expected,
                    actual: got,
                });
            }
        };

        check("id", self.id.to_string(), actual.id.to_string(), self.id == actual.id);
        check(
            "team_leader_id",
            self.team_leader_id.to_string(),
            actual.team_leader_id.to_string(),
            self.team_leader_id == actual.team_leader_id,
        );
        check("job", self.job.clone(), actual.job.clone(), self.job == actual.job);
        check(
            "work_size",
            self.work_size.to_string(),
            actual.work_size.to_string(),
            self.work_size == actual.work_size,
        );
        check(
            "collaborators",
            self.collaborators.clone(),
            actual.collaborators.clone(),
            self.collaborators == actual.collaborators,
        );
        check(
            "start_date",
            self.start_date.clone(),
            actual.start_date.clone(),
            same_timestamp(&self.start_date, &actual.start_date),
        );

        let end_dates_match = match (&self.end_date, &actual.end_date) {
            (None, None) => true,
            (Some(expected), Some(got)) => same_timestamp(expected, got),
            _ => false,
        };
        check(
            "end_date",
            format!("{:?}", self.end_date),
            format!("{:?}", actual.end_date),
            end_dates_match,
        );

        check(
            "is_finished",
            self.is_finished.to_string(),
            actual.is_finished.to_string(),
            self.is_finished == actual.is_finished,
        );

        diffs
    }
}

/// Current local time in the naive ISO-8601 form clients send
pub fn timestamp_now() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Parse the timestamp renderings a jobs server is likely to echo back
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|parsed| parsed.naive_local())
        .ok()
}

fn same_timestamp(expected: &str, actual: &str) -> bool {
    if expected == actual {
        return true;
    }

    match (parse_timestamp(expected), parse_timestamp(actual)) {
        (Some(a), Some(b)) if a == b => true,
        (Some(a), Some(b)) => {
            let truncated = a.nanosecond() == 0 || b.nanosecond() == 0;
            truncated && a.with_nanosecond(0) == b.with_nanosecond(0)
        }
        _ => false,
    }
}
