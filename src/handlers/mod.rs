// Route handlers grouped by resource.
//
// Public reads need no token; writes require an admin token (`AdminUser`).
pub mod auth;
pub mod companies;
pub mod jobs;
pub mod public;

use sqlx::PgPool;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
