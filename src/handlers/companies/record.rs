use axum::extract::{Path, State};

use crate::database::models::{Company, CompanyDetail, CompanyUpdate};
use crate::handlers::AppState;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, ValidatedJson};

/// GET /companies/:handle - company with its jobs
pub async fn company_get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let mut conn = state.pool.acquire().await?;
    let company = Company::get(&mut conn, &handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle - admin only
pub async fn company_update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(handle): Path<String>,
    ValidatedJson(data): ValidatedJson<CompanyUpdate>,
) -> ApiResult<Company> {
    let sql = Company::update_sql(&handle, data)?;
    let mut conn = state.pool.acquire().await?;
    let company = Company::apply_update(&mut conn, &handle, &sql).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle - admin only
pub async fn company_delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(handle): Path<String>,
) -> ApiResult<String> {
    let mut conn = state.pool.acquire().await?;
    Company::remove(&mut conn, &handle).await?;
    Ok(ApiResponse::deleted(handle))
}
