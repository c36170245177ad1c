use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Identity, Job, NewJob};
use crate::error::AppError;
use crate::extract::Json;
use crate::handlers::MessageResponse;
use crate::validation::{sanitize_string, validate_required};
use crate::AppState;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[schema(example = "ABC Corp")]
    pub company_name: String,
    #[schema(example = "Software Engineer")]
    pub job_title: String,
    #[schema(example = "Develop and maintain software applications.")]
    pub description: String,
    #[schema(example = "100000")]
    pub salary: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total_jobs: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

/// Query parameters are taken as strings so that junk values fall back to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number, default 1
    pub page: Option<String>,
    /// Page size, default 6, at most 100
    pub limit: Option<String>,
}

impl PageParams {
    /// Resolves to `(page, limit)`.
    pub fn resolve(&self) -> (i64, i64) {
        let positive = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|value| value.trim().parse::<i64>().ok())
                .filter(|value| *value > 0)
        };

        let page = positive(&self.page).unwrap_or(1);
        let limit = positive(&self.limit)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        (page, limit)
    }
}

fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[utoipa::path(
    post,
    path = "/job/create",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = MessageResponse),
        (status = 400, description = "Missing field", body = crate::handlers::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::handlers::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::handlers::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    let company_name = sanitize_string(&payload.company_name);
    let job_title = sanitize_string(&payload.job_title);
    validate_required("companyName", "Company name", &company_name)?;
    validate_required("jobTitle", "Job title", &job_title)?;
    validate_required("description", "Description", &payload.description)?;
    validate_required("salary", "Salary", &payload.salary)?;

    let job = state
        .jobs
        .insert_job(NewJob {
            company_name,
            job_title,
            description: payload.description.trim().to_string(),
            salary: payload.salary.trim().to_string(),
            created_by: caller.id.clone(),
        })
        .await?;

    tracing::info!(job_id = %job.id, created_by = %caller.id, "Job created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Job created successfully.")),
    ))
}

#[utoipa::path(
    get,
    path = "/job/jobs",
    responses(
        (status = 200, description = "All jobs, newest first", body = JobsResponse),
        (status = 401, description = "Not authenticated", body = crate::handlers::ErrorBody),
        (status = 403, description = "Caller is neither employee nor admin", body = crate::handlers::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<JobsResponse>, AppError> {
    let jobs = state.jobs.list_jobs().await?;
    Ok(Json(JobsResponse { jobs }))
}

#[utoipa::path(
    get,
    path = "/job/test-jobs",
    params(PageParams),
    responses(
        (status = 200, description = "One page of jobs, newest first", body = JobPage),
        (status = 401, description = "Not authenticated", body = crate::handlers::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Jobs"
)]
pub async fn list_jobs_paged(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<JobPage>, AppError> {
    let (page, limit) = params.resolve();
    let offset = (page - 1).saturating_mul(limit);

    let total_jobs = state.jobs.count_jobs().await?;
    let jobs = state.jobs.list_jobs_page(offset, limit).await?;

    Ok(Json(JobPage {
        jobs,
        total_jobs,
        current_page: page,
        total_pages: total_pages(total_jobs, limit),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_page_params_defaults() {
        assert_eq!(params(None, None).resolve(), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(params(Some("abc"), Some("0")).resolve(), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(params(Some("-2"), Some("-5")).resolve(), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_page_params_explicit() {
        assert_eq!(params(Some("3"), Some("10")).resolve(), (3, 10));
        assert_eq!(params(Some("1"), Some("5000")).resolve(), (1, MAX_PAGE_SIZE));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
    }
}
