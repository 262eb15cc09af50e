pub mod auth;
pub mod response;
pub mod validate;

pub use auth::{authenticate_jwt, AdminUser, AuthUser, LoggedInUser};
pub use response::{ApiResponse, ApiResult};
pub use validate::{ValidatedJson, ValidatedQuery};
