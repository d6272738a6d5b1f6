use actix_web::{
    delete, get, post, put,
    web::{self, Bytes, Data, Path, ServiceConfig},
    HttpResponse,
};
use serde_json::{json, Value};
use tracing::info;

use super::error::ApiError;
use super::store::JobStore;
use crate::models::{Job, JobsResponse, REQUIRED_FIELDS};

#[get("")]
async fn list_jobs(store: Data<JobStore>) -> HttpResponse {
    HttpResponse::Ok().json(JobsResponse {
        jobs: store.list().await,
    })
}

#[get("/{id}")]
async fn get_job(store: Data<JobStore>, path: Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let job = store.get(id).await.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(JobsResponse { jobs: vec![job] }))
}

#[post("")]
async fn create_job(store: Data<JobStore>, body: Bytes) -> Result<HttpResponse, ApiError> {
    let job = parse_job(&body)?;
    let id = job.id;
    store.insert(job).await?;

    info!("Stub: created job {}", id);
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

#[put("/{id}")]
async fn update_job(store: Data<JobStore>, path: Path<String>, body: Bytes) -> Result<HttpResponse, ApiError> {
    // unknown ids win over body problems
    let id = parse_id(&path)?;
    if !store.contains(id).await {
        return Err(ApiError::NotFound);
    }

    let job = parse_job(&body)?;
    store.replace(id, job).await?;

    info!("Stub: updated job {}", id);
    Ok(HttpResponse::Ok().json(json!({ "success": "OK" })))
}

#[delete("/{id}")]
async fn delete_job(store: Data<JobStore>, path: Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    store.remove(id).await?;

    info!("Stub: deleted job {}", id);
    Ok(HttpResponse::Ok().json(json!({ "success": "OK" })))
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}

/// Non-integer ids are reported exactly like unknown ones
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

fn parse_job(body: &[u8]) -> Result<Job, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::EmptyRequest);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {}", e)))?;

    let map = match &value {
        Value::Null => return Err(ApiError::EmptyRequest),
        Value::Object(map) if map.is_empty() => return Err(ApiError::EmptyRequest),
        Value::Object(map) => map,
        _ => return Err(ApiError::BadRequest("expected a JSON object".to_string())),
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !map.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn get_scope() -> actix_web::Scope {
    web::scope("/api/jobs")
        .service(list_jobs)
        .service(create_job)
        .service(get_job)
        .service(update_job)
        .service(delete_job)
        .default_service(web::to(not_found))
}

pub fn stub_config(config: &mut ServiceConfig) {
    config
        .service(get_scope())
        .route("/{tail:.*}", web::to(not_found));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use pretty_assertions::assert_eq;

    use crate::fixtures::sample_job;
    use crate::models::ErrorResponse;

    macro_rules! app {
        ($store:expr) => {
            test::init_service(App::new().app_data(Data::new($store)).configure(stub_config)).await
        };
    }

    #[actix_web::test]
    async fn lists_seeded_jobs() {
        let app = app!(JobStore::seeded());

        let resp: JobsResponse = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/jobs").to_request()).await;
        let ids: Vec<_> = resp.jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[actix_web::test]
    async fn malformed_and_unknown_ids_are_not_found() {
        let app = app!(JobStore::seeded());

        for uri in ["/api/jobs/0", "/api/jobs/string"] {
            for req in [
                test::TestRequest::get().uri(uri),
                test::TestRequest::put().uri(uri),
                test::TestRequest::delete().uri(uri),
            ] {
                let resp = test::call_service(&app, req.to_request()).await;
                assert_eq!(resp.status(), StatusCode::NOT_FOUND);
                let body: ErrorResponse = test::read_body_json(resp).await;
                assert_eq!(body.error, "Not Found");
            }
        }
    }

    #[actix_web::test]
    async fn create_validates_payload() {
        let app = app!(JobStore::seeded());

        let cases = [
            (json!({}), "Empty request"),
            (json!({"id": 11, "job": "Working hard"}), "Missing fields"),
            (json!(sample_job(1)), "Id already exists"),
            (json!([1, 2]), "Bad request"),
        ];

        for (payload, expected) in cases {
            let req = test::TestRequest::post().uri("/api/jobs").set_json(&payload).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body.error, expected);
        }
    }

    #[actix_web::test]
    async fn missing_fields_are_named() {
        let app = app!(JobStore::new());

        let mut payload = json!(sample_job(5));
        payload.as_object_mut().unwrap().remove("is_finished");

        let req = test::TestRequest::post().uri("/api/jobs").set_json(&payload).to_request();
        let body: ErrorResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.fields, Some(json!({"missing": ["is_finished"]})));
    }

    #[actix_web::test]
    async fn create_then_read_back() {
        let app = app!(JobStore::new());
        let job = sample_job(10);

        let req = test::TestRequest::post().uri("/api/jobs").set_json(&job).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/jobs/10").to_request();
        let resp: JobsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.jobs, vec![job]);
    }

    #[actix_web::test]
    async fn update_uses_path_id() {
        let app = app!(JobStore::seeded());

        let req = test::TestRequest::put().uri("/api/jobs/2").set_json(sample_job(77)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/jobs/2").to_request();
        let resp: JobsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.jobs[0].id, 2);
        assert_eq!(resp.jobs[0].job, "Working hard");
    }

    #[actix_web::test]
    async fn empty_put_on_existing_job_is_empty_request() {
        let app = app!(JobStore::seeded());

        let resp = test::call_service(&app, test::TestRequest::put().uri("/api/jobs/1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Empty request");
    }

    #[actix_web::test]
    async fn unknown_routes_use_error_envelope() {
        let app = app!(JobStore::seeded());

        for uri in ["/", "/api/other", "/api/jobs/1/extra"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body.error, "Not Found");
        }
    }
}
