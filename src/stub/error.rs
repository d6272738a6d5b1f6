use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use tracing::{debug, warn};

use super::store::StoreError;
use crate::models::ErrorResponse;

/// Errors the stub reports to clients
///
/// `Display` is the exact `error` text of the response envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Unknown or malformed job id, or an unknown route
    NotFound,

    /// Body absent, `null` or `{}`
    EmptyRequest,

    /// Required keys absent from the payload
    MissingFields(Vec<&'static str>),

    /// Body is not a JSON object or a field has the wrong type
    BadRequest(String),

    DuplicateId(i64),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "Not Found"),
            ApiError::EmptyRequest => write!(f, "Empty request"),
            ApiError::MissingFields(_) => write!(f, "Missing fields"),
            ApiError::BadRequest(_) => write!(f, "Bad request"),
            ApiError::DuplicateId(_) => write!(f, "Id already exists"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::DuplicateId(id) => ApiError::DuplicateId(id),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let fields = match self {
            ApiError::NotFound => {
                debug!("Stub: not found");
                None
            }
            ApiError::EmptyRequest => {
                warn!("Stub: empty request");
                None
            }
            ApiError::MissingFields(missing) => {
                warn!("Stub: missing fields {:?}", missing);
                Some(serde_json::json!({ "missing": missing }))
            }
            ApiError::BadRequest(msg) => {
                warn!("Stub: bad request: {}", msg);
                Some(serde_json::json!({ "message": msg }))
            }
            ApiError::DuplicateId(id) => {
                warn!("Stub: id {} already exists", id);
                Some(serde_json::json!({ "id": id }))
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            fields,
        })
    }
}
