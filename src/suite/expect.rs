//! Assertions over an [`ApiResponse`] that fail fast with a [`Failure`].

use reqwest::StatusCode;
use serde_json::Value;

use super::failure::{ExpectedStatus, Failure};
use crate::client::ApiResponse;
use crate::models::{FieldDiff, Job};

pub fn success(resp: &ApiResponse) -> Result<(), Failure> {
    if resp.is_success() {
        Ok(())
    } else {
        Err(Failure::UnexpectedStatus {
            request: resp.describe(),
            expected: ExpectedStatus::Success,
            body: resp.text.clone(),
        })
    }
}

pub fn status(resp: &ApiResponse, expected: StatusCode) -> Result<(), Failure> {
    if resp.status == expected {
        Ok(())
    } else {
        Err(Failure::UnexpectedStatus {
            request: resp.describe(),
            expected: ExpectedStatus::Exact(expected),
            body: resp.text.clone(),
        })
    }
}

/// Status matches and the `error` string contains `text`
pub fn error(resp: &ApiResponse, expected: StatusCode, text: &'static str) -> Result<(), Failure> {
    status(resp, expected)?;
    match resp.error_message() {
        Some(message) if message.contains(text) => Ok(()),
        other => Err(Failure::ErrorText {
            request: resp.describe(),
            expected: text,
            actual: other.map(str::to_string),
        }),
    }
}

pub fn not_found(resp: &ApiResponse) -> Result<(), Failure> {
    error(resp, StatusCode::NOT_FOUND, "Not Found")
}

/// The `jobs` array of a read envelope
pub fn jobs(resp: &ApiResponse) -> Result<&[Value], Failure> {
    resp.jobs().ok_or_else(|| missing(resp, "jobs"))
}

pub fn has_field(resp: &ApiResponse, record: &Value, field: &str) -> Result<(), Failure> {
    if record.get(field).is_some() {
        Ok(())
    } else {
        Err(missing(resp, field))
    }
}

/// A read envelope holding exactly one record, left untyped
///
/// Reads only promise the fields a case inspects, so nothing else is decoded.
pub fn single_record(resp: &ApiResponse) -> Result<&Value, Failure> {
    match jobs(resp)? {
        [record] => Ok(record),
        records => Err(Failure::FieldMismatch {
            request: resp.describe(),
            diffs: vec![FieldDiff {
                field: "jobs",
                expected: "1 record".to_string(),
                actual: format!("{} records", records.len()),
            }],
        }),
    }
}

/// A read envelope holding exactly one typed job
pub fn single_job(resp: &ApiResponse) -> Result<Job, Failure> {
    single_record(resp)?;
    let mut typed = resp.job_records()?;
    Ok(typed.remove(0))
}

/// A string field of `record` equals `expected`
pub fn text_field(resp: &ApiResponse, record: &Value, field: &'static str, expected: &str) -> Result<(), Failure> {
    let actual = record.get(field).ok_or_else(|| missing(resp, field))?;
    if actual.as_str() == Some(expected) {
        Ok(())
    } else {
        Err(Failure::FieldMismatch {
            request: resp.describe(),
            diffs: vec![FieldDiff {
                field,
                expected: expected.to_string(),
                actual: actual.to_string(),
            }],
        })
    }
}

/// Every field of the job read back equals the submitted one
pub fn round_trip(resp: &ApiResponse, sent: &Job) -> Result<(), Failure> {
    let got = single_job(resp)?;
    let diffs = sent.diff(&got);
    if diffs.is_empty() {
        Ok(())
    } else {
        Err(Failure::FieldMismatch {
            request: resp.describe(),
            diffs,
        })
    }
}

fn missing(resp: &ApiResponse, field: &str) -> Failure {
    Failure::MissingField {
        request: resp.describe(),
        field: field.to_string(),
        body: resp.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Method, Url};
    use serde_json::json;

    fn response(body: Value) -> ApiResponse {
        ApiResponse {
            method: Method::GET,
            url: Url::parse("http://127.0.0.1:8080/api/jobs/2").unwrap(),
            status: StatusCode::OK,
            text: body.to_string(),
            body,
        }
    }

    #[test]
    fn single_record_accepts_partial_columns() {
        let resp = response(json!({"jobs": [{"id": 2, "job": "Working hard", "is_finished": false}]}));

        let record = single_record(&resp).unwrap();
        has_field(&resp, record, "is_finished").unwrap();
        text_field(&resp, record, "job", "Working hard").unwrap();
        // the typed view needs every column
        assert!(matches!(single_job(&resp), Err(Failure::Client(_))));
    }

    #[test]
    fn single_record_rejects_other_lengths() {
        for body in [json!({"jobs": []}), json!({"jobs": [{}, {}]})] {
            let resp = response(body);
            assert!(matches!(single_record(&resp), Err(Failure::FieldMismatch { .. })));
        }
    }

    #[test]
    fn text_field_reports_mismatch_and_absence() {
        let resp = response(json!({"jobs": [{"job": "Resting"}]}));
        let record = single_record(&resp).unwrap();

        match text_field(&resp, record, "job", "Working hard") {
            Err(Failure::FieldMismatch { diffs, .. }) => {
                assert_eq!(diffs[0].field, "job");
                assert_eq!(diffs[0].actual, "\"Resting\"");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            text_field(&resp, record, "collaborators", "1, 2, 3"),
            Err(Failure::MissingField { .. })
        ));
    }
}
