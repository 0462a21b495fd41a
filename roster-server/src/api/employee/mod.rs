//! Employee API
//!
//! Employees are shared by all authenticated accounts.

mod handler;

use axum::{
    Router,
    routing::{patch, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/v1/employee", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route(
            "/{identity_number}",
            patch(handler::update).delete(handler::delete),
        )
}
