use axum::extract::State;

use crate::database::models::{Company, NewCompany};
use crate::filter::CompanyFilter;
use crate::handlers::AppState;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};

/// POST /companies - admin only
pub async fn company_create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(data): ValidatedJson<NewCompany>,
) -> ApiResult<Company> {
    let mut conn = state.pool.acquire().await?;
    let company = Company::create(&mut conn, data).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies?minEmployees=&maxEmployees=&name=
pub async fn company_list(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<CompanyFilter>,
) -> ApiResult<Vec<Company>> {
    let sql = Company::find_all_sql(&filter)?;
    let mut conn = state.pool.acquire().await?;
    let companies = Company::fetch_matching(&mut conn, &sql).await?;
    Ok(ApiResponse::success("companies", companies))
}
