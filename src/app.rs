use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, SecurityConfig};
use crate::handlers::{self, AppState};

/// Full application router over `pool`
pub fn app(pool: PgPool) -> Router {
    let config = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .route("/auth/whoami", get(handlers::auth::whoami_get))
        .merge(company_routes())
        .merge(job_routes())
        .fallback(handlers::public::not_found)
        .with_state(AppState::new(pool))
        // Global middleware
        .layer(middleware::from_fn(crate::middleware::authenticate_jwt))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn company_routes() -> Router<AppState> {
    use handlers::companies;

    Router::new()
        .route(
            "/companies",
            get(companies::company_list).post(companies::company_create),
        )
        .route(
            "/companies/:handle",
            get(companies::company_get)
                .patch(companies::company_update)
                .delete(companies::company_delete),
        )
}

fn job_routes() -> Router<AppState> {
    use handlers::jobs;

    Router::new()
        .route("/jobs", get(jobs::job_list).post(jobs::job_create))
        .route(
            "/jobs/:id",
            get(jobs::job_get).patch(jobs::job_update).delete(jobs::job_delete),
        )
}

/// Configured origins, or any origin when none parse
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
