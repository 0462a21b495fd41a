//! Account profile

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/user", get(handler::get).patch(handler::update))
}
