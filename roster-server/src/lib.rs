//! roster-server: tenant-scoped department and employee registry
//!
//! - `store`: transactional record store (PostgreSQL or in-memory)
//! - `core`: allocation, uniqueness, ownership and reference guards, and the
//!   lifecycle manager that composes them
//! - `api`: axum routes over the core

pub mod api;
pub mod auth;
pub mod blob;
pub mod config;
pub mod core;
pub mod state;
pub mod store;

pub use config::Config;
pub use state::AppState;
