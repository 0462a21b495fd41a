//! Department API

mod handler;

use axum::{
    Router,
    routing::{patch, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/v1/department", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route(
            "/{department_id}",
            patch(handler::update).delete(handler::delete),
        )
}
