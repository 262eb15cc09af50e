use axum::extract::{Path, State};

use crate::database::models::{job, Job, JobUpdate};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, ValidatedJson};

/// Ids that are not integers can never match a row
fn parse_job_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| job::not_found(raw).into())
}

/// GET /jobs/:id
pub async fn job_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let id = parse_job_id(&id)?;
    let mut conn = state.pool.acquire().await?;
    let job = Job::get(&mut conn, id).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id - admin only
pub async fn job_update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ValidatedJson(data): ValidatedJson<JobUpdate>,
) -> ApiResult<Job> {
    let id = parse_job_id(&id)?;
    let sql = Job::update_sql(id, data)?;
    let mut conn = state.pool.acquire().await?;
    let job = Job::apply_update(&mut conn, id, &sql).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id - admin only. Echoes the id as given in the path.
pub async fn job_delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(raw_id): Path<String>,
) -> ApiResult<String> {
    let id = parse_job_id(&raw_id)?;
    let mut conn = state.pool.acquire().await?;
    Job::remove(&mut conn, id).await?;
    Ok(ApiResponse::deleted(raw_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_id_is_not_found() {
        let err = parse_job_id("abc").unwrap_err();
        assert_eq!(err.to_string(), "No job: abc");
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(parse_job_id("12").unwrap(), 12);
    }
}
