pub mod health;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::errors::AppError;
use crate::proposal::handlers;
use crate::state::AppState;

/// CORS preflight. The CORS layer adds the headers; the body stays empty.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Any origin may call the API; only POST with a JSON body is needed.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/analyze",
            post(handlers::handle_analyze)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/generate",
            post(handlers::handle_generate)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/proposal",
            post(handlers::handle_proposal)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(cors())
        .with_state(state)
}
