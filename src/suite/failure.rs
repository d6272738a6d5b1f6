use std::fmt;

use reqwest::StatusCode;

use crate::client::ClientError;
use crate::fixtures::FixtureError;
use crate::models::FieldDiff;

const BODY_PREVIEW: usize = 200;

/// Status a case expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStatus {
    /// Any 2xx
    Success,
    Exact(StatusCode),
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedStatus::Success => write!(f, "2xx"),
            ExpectedStatus::Exact(code) => write!(f, "{}", code),
        }
    }
}

/// Why a case stopped
#[derive(Debug)]
pub enum Failure {
    UnexpectedStatus {
        request: String,
        expected: ExpectedStatus,
        body: String,
    },

    MissingField {
        request: String,
        field: String,
        body: String,
    },

    /// The `error` string did not contain the expected text
    ErrorText {
        request: String,
        expected: &'static str,
        actual: Option<String>,
    },

    FieldMismatch {
        request: String,
        diffs: Vec<FieldDiff>,
    },

    Fixture(FixtureError),

    Client(ClientError),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::UnexpectedStatus { request, expected, body } => {
                write!(f, "{}: expected {}, body={}", request, expected, preview(body))
            }
            Failure::MissingField { request, field, body } => {
                write!(f, "{}: missing `{}` in body={}", request, field, preview(body))
            }
            Failure::ErrorText { request, expected, actual } => match actual {
                Some(actual) => write!(f, "{}: error {:?} does not contain {:?}", request, actual, expected),
                None => write!(f, "{}: no `error` string, expected one containing {:?}", request, expected),
            },
            Failure::FieldMismatch { request, diffs } => {
                write!(f, "{}: ", request)?;
                for (i, diff) in diffs.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "`{}` expected {:?} got {:?}", diff.field, diff.expected, diff.actual)?;
                }
                Ok(())
            }
            Failure::Fixture(e) => write!(f, "fixture setup failed: {}", e),
            Failure::Client(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Failure {}

impl From<ClientError> for Failure {
    fn from(e: ClientError) -> Self {
        Failure::Client(e)
    }
}

impl From<FixtureError> for Failure {
    fn from(e: FixtureError) -> Self {
        Failure::Fixture(e)
    }
}

fn preview(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty>".to_string();
    }
    match body.char_indices().nth(BODY_PREVIEW) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bodies_are_cut() {
        let body = "x".repeat(BODY_PREVIEW + 50);
        let shown = preview(&body);
        assert_eq!(shown.len(), BODY_PREVIEW + 3);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("  "), "<empty>");
    }

    #[test]
    fn lists_every_field_mismatch() {
        let failure = Failure::FieldMismatch {
            request: "GET /api/jobs/2 -> 200 OK".to_string(),
            diffs: vec![
                FieldDiff {
                    field: "job",
                    expected: "Working hard".to_string(),
                    actual: "Resting".to_string(),
                },
                FieldDiff {
                    field: "work_size",
                    expected: "100".to_string(),
                    actual: "15".to_string(),
                },
            ],
        };

        assert_eq!(
            failure.to_string(),
            "GET /api/jobs/2 -> 200 OK: `job` expected \"Working hard\" got \"Resting\"; \
             `work_size` expected \"100\" got \"15\""
        );
    }

    #[test]
    fn names_expected_status() {
        let failure = Failure::UnexpectedStatus {
            request: "DELETE /api/jobs/0 -> 200 OK".to_string(),
            expected: ExpectedStatus::Exact(StatusCode::NOT_FOUND),
            body: String::new(),
        };
        assert_eq!(
            failure.to_string(),
            "DELETE /api/jobs/0 -> 200 OK: expected 404 Not Found, body=<empty>"
        );
    }
}
