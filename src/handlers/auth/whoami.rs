use crate::middleware::{ApiResponse, ApiResult, AuthUser, LoggedInUser};

/// GET /auth/whoami - the user named by the bearer token
pub async fn whoami_get(LoggedInUser(user): LoggedInUser) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success("user", user))
}
