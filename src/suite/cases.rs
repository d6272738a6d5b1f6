use futures_util::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::expect;
use super::{Case, CaseResult, Failure, RunContext};
use crate::client::{ApiResponse, ClientError};
use crate::fixtures::{self, CREATED_ID, MALFORMED_ID, MISSING_ID};
use crate::models::Job;

/// Every case, in the order they run
pub(crate) fn all() -> Vec<Case> {
    vec![
        Case::new("list_jobs", "list every job; each record carries is_finished", list_jobs),
        Case::new("get_job", "read job 1 as a one-element list", get_job),
        Case::new("get_missing_job", "read job 0, which never exists", get_missing_job),
        Case::new("get_malformed_id", "read a job by a non-integer id", get_malformed_id),
        Case::new("create_empty", "create with an empty payload", create_empty),
        Case::new("create_missing_fields", "create without end_date and is_finished", create_missing_fields),
        Case::new("create_existing_id", "create with the id of job 1", create_existing_id),
        Case::new("create_job", "create job 10 and read it back", create_job),
        Case::new("delete_missing_job", "delete job 0, which never exists", delete_missing_job),
        Case::new("delete_malformed_id", "delete a job by a non-integer id", delete_malformed_id),
        Case::new("delete_job", "delete job 1 and check it is gone", delete_job),
        Case::new("delete_twice", "deleting a fresh job a second time is not found", delete_twice),
        Case::new("edit_missing_job", "edit job 0 without a body", edit_missing_job),
        Case::new("edit_malformed_id", "edit a job by a non-integer id", edit_malformed_id),
        Case::new("edit_job", "edit job 2 and read the change back", edit_job),
        Case::new("fresh_job_lifecycle", "create, read, delete a random id; it stays gone", fresh_job_lifecycle),
    ]
}

fn list_jobs(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.list_jobs().await?;
        expect::success(&resp)?;

        let records = expect::jobs(&resp)?;
        if records.is_empty() {
            return Err(expect_record(&resp));
        }
        for record in records {
            expect::has_field(&resp, record, "is_finished")?;
        }
        Ok(())
    }
    .boxed()
}

fn get_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.get_job(1).await?;
        expect::success(&resp)?;

        let record = expect::single_record(&resp)?;
        expect::has_field(&resp, record, "is_finished")
    }
    .boxed()
}

fn get_missing_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.get_job(MISSING_ID).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn get_malformed_id(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.get_job(MALFORMED_ID).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn create_empty(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.create_raw(&json!({})).await?;
        expect::error(&resp, StatusCode::BAD_REQUEST, "Empty request")
    }
    .boxed()
}

fn create_missing_fields(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let mut body = job_value(&fixtures::sample_job(1))?;
        if let Value::Object(map) = &mut body {
            map.remove("end_date");
            map.remove("is_finished");
        }

        let resp = ctx.client.create_raw(&body).await?;
        expect::error(&resp, StatusCode::BAD_REQUEST, "Missing fields")
    }
    .boxed()
}

fn create_existing_id(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.create_job(&fixtures::sample_job(1)).await?;
        expect::error(&resp, StatusCode::BAD_REQUEST, "Id already exists")
    }
    .boxed()
}

fn create_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let job = fixtures::sample_job(CREATED_ID);

        let resp = ctx.client.create_job(&job).await?;
        ctx.track(CREATED_ID);
        expect::success(&resp)?;

        let resp = ctx.client.get_job(CREATED_ID).await?;
        expect::success(&resp)?;
        expect::round_trip(&resp, &job)
    }
    .boxed()
}

fn delete_missing_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.delete_job(MISSING_ID).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn delete_malformed_id(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.delete_job(MALFORMED_ID).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn delete_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.delete_job(1).await?;
        expect::success(&resp)?;

        let resp = ctx.client.get_job(1).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn delete_twice(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let id = fixtures::fresh_id(&ctx.client).await?;

        let resp = ctx.client.create_job(&fixtures::sample_job(id)).await?;
        ctx.track(id);
        expect::success(&resp)?;

        let resp = ctx.client.delete_job(id).await?;
        expect::success(&resp)?;

        let resp = ctx.client.delete_job(id).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn edit_missing_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.update_raw(MISSING_ID, None).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn edit_malformed_id(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let resp = ctx.client.update_raw(MALFORMED_ID, None).await?;
        expect::not_found(&resp)
    }
    .boxed()
}

fn edit_job(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let job = fixtures::sample_job(2);

        let resp = ctx.client.update_job(2, &job).await?;
        expect::success(&resp)?;

        let resp = ctx.client.get_job(2).await?;
        expect::success(&resp)?;
        let record = expect::single_record(&resp)?;
        expect::text_field(&resp, record, "job", &job.job)
    }
    .boxed()
}

fn fresh_job_lifecycle(ctx: &mut RunContext) -> BoxFuture<'_, CaseResult> {
    async move {
        let id = fixtures::fresh_id(&ctx.client).await?;
        let job = fixtures::sample_job(id);

        let resp = ctx.client.create_job(&job).await?;
        ctx.track(id);
        expect::success(&resp)?;

        let resp = ctx.client.get_job(id).await?;
        expect::success(&resp)?;
        expect::round_trip(&resp, &job)?;

        let resp = ctx.client.delete_job(id).await?;
        expect::success(&resp)?;

        // once deleted, every verb reports the job as unknown
        expect::not_found(&ctx.client.get_job(id).await?)?;
        expect::not_found(&ctx.client.update_job(id, &job).await?)?;
        expect::not_found(&ctx.client.delete_job(id).await?)
    }
    .boxed()
}

fn expect_record(resp: &ApiResponse) -> Failure {
    Failure::MissingField {
        request: resp.describe(),
        field: "jobs[0]".to_string(),
        body: resp.text.clone(),
    }
}

fn job_value(job: &Job) -> Result<Value, Failure> {
    serde_json::to_value(job).map_err(|source| {
        Failure::Client(ClientError::Json {
            context: format!("job {}", job.id),
            source,
        })
    })
}
