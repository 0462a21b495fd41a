//! Registration and login

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/auth", post(handler::authenticate))
}
