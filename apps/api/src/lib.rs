//! Dynamic-form service: schema and submission stores, the public intake
//! gate, and the admin API, served with axum over SQLite.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod intake;
pub mod notify;

pub use error::ApiError;
pub use http::{build_router, AdminGate, AppState};
pub use notify::Notifier;
