//! Data models
//!
//! Request payloads and views exchanged over the HTTP API.
//! Field names are camelCase on the wire.

pub mod account;
pub mod department;
pub mod employee;
pub mod file;

// Re-exports
pub use account::*;
pub use department::*;
pub use employee::*;
pub use file::*;
