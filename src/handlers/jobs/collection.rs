use axum::extract::State;

use crate::database::models::{Job, NewJob};
use crate::filter::JobFilter;
use crate::handlers::AppState;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};

/// POST /jobs - admin only
pub async fn job_create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(data): ValidatedJson<NewJob>,
) -> ApiResult<Job> {
    let mut conn = state.pool.acquire().await?;
    let job = Job::create(&mut conn, data).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn job_list(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<JobFilter>,
) -> ApiResult<Vec<Job>> {
    let sql = Job::find_all_sql(&filter);
    let mut conn = state.pool.acquire().await?;
    let jobs = Job::fetch_matching(&mut conn, &sql).await?;
    Ok(ApiResponse::success("jobs", jobs))
}
