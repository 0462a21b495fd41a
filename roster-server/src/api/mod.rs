//! HTTP API
//!
//! | Path | Methods | Auth |
//! |------|---------|------|
//! | /health | GET | none |
//! | /v1/auth | POST | none |
//! | /v1/user | GET, PATCH | bearer |
//! | /v1/file | POST | bearer |
//! | /v1/department | POST, GET | bearer |
//! | /v1/department/{department_id} | PATCH, DELETE | bearer |
//! | /v1/employee | POST, GET | bearer |
//! | /v1/employee/{identity_number} | PATCH, DELETE | bearer |

pub mod auth;
pub mod department;
pub mod employee;
pub mod file;
pub mod health;
pub mod profile;
pub mod validation;

use axum::Router;
use axum::middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::tenant_auth_middleware;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no tower middleware, no state)
pub fn build_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(profile::router())
        .merge(file::router())
        .merge(department::router())
        .merge(employee::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_auth_middleware,
        ));

    Router::new()
        // Public routes
        .merge(health::router())
        .merge(auth::router())
        // Bearer token required
        .merge(protected)
}

/// Build the fully configured application
pub fn build_app(state: AppState) -> Router {
    build_router(&state)
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}
