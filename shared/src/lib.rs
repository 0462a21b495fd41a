//! Shared types for the Roster service
//!
//! Error types, response structures and the API data models used by the
//! server and by anything that talks to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
