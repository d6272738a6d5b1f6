use std::fmt;

use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ClientError;
use crate::config::Config;
use crate::models::{Job, JobsResponse};

/// A fully consumed response from the jobs API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    /// Parsed JSON body, `Value::Null` when the body is empty or not JSON
    pub body: Value,
    /// Raw body text kept for diagnostics
    pub text: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `error` string of an error envelope
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error")?.as_str()
    }

    /// The raw `jobs` array of a read envelope
    pub fn jobs(&self) -> Option<&[Value]> {
        self.body.get("jobs")?.as_array().map(Vec::as_slice)
    }

    /// The `jobs` array decoded into typed records
    pub fn job_records(&self) -> Result<Vec<Job>, ClientError> {
        serde_json::from_value::<JobsResponse>(self.body.clone())
            .map(|envelope| envelope.jobs)
            .map_err(|source| ClientError::Json {
                context: self.describe(),
                source,
            })
    }

    /// Short form used in failure messages, e.g. `GET http://host/api/jobs/0 -> 404 Not Found`
    pub fn describe(&self) -> String {
        format!("{} {} -> {}", self.method, self.url, self.status)
    }
}

/// Thin client over the `/api/jobs` resource
///
/// Each call sends one request and reads the whole body before returning,
/// so callers never have two requests in flight.
#[derive(Clone, Debug)]
pub struct JobsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl JobsClient {
    pub fn new(base_url: Url, timeout: std::time::Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET /api/jobs
    pub async fn list_jobs(&self) -> Result<ApiResponse, ClientError> {
        let url = self.collection_url()?;
        self.send(Method::GET, url, None).await
    }

    /// GET /api/jobs/{id}
    ///
    /// `id` is anything displayable so malformed identifiers can be sent too.
    pub async fn get_job(&self, id: impl fmt::Display) -> Result<ApiResponse, ClientError> {
        let url = self.job_url(id)?;
        self.send(Method::GET, url, None).await
    }

    /// POST /api/jobs with a typed job
    pub async fn create_job(&self, job: &Job) -> Result<ApiResponse, ClientError> {
        let body = encode(job)?;
        self.create_raw(&body).await
    }

    /// POST /api/jobs with an arbitrary JSON body
    pub async fn create_raw(&self, body: &Value) -> Result<ApiResponse, ClientError> {
        let url = self.collection_url()?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// PUT /api/jobs/{id} with a typed job
    pub async fn update_job(&self, id: impl fmt::Display, job: &Job) -> Result<ApiResponse, ClientError> {
        let body = encode(job)?;
        self.update_raw(id, Some(&body)).await
    }

    /// PUT /api/jobs/{id}; `None` sends the request without any body
    pub async fn update_raw(
        &self,
        id: impl fmt::Display,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.job_url(id)?;
        self.send(Method::PUT, url, body).await
    }

    /// DELETE /api/jobs/{id}
    pub async fn delete_job(&self, id: impl fmt::Display) -> Result<ApiResponse, ClientError> {
        let url = self.job_url(id)?;
        self.send(Method::DELETE, url, None).await
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        self.base_url
            .join("api/jobs")
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    fn job_url(&self, id: impl fmt::Display) -> Result<Url, ClientError> {
        let path = format!("api/jobs/{}", id);
        self.base_url
            .join(&path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<ApiResponse, ClientError> {
        debug!("Sending {} {}", method, url);

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &method, &url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &method, &url))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("{} {} returned a non-JSON body: {}", method, url, e);
                Value::Null
            })
        };

        debug!("{} {} -> {}", method, url, status);

        Ok(ApiResponse {
            method,
            url,
            status,
            body,
            text,
        })
    }
}

fn encode(job: &Job) -> Result<Value, ClientError> {
    serde_json::to_value(job).map_err(|source| ClientError::Json {
        context: format!("job {}", job.id),
        source,
    })
}
