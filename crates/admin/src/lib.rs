//! OrderDesk console library.
//!
//! This crate provides the console as a library, allowing it to be tested
//! and reused by the CLI.
//!
//! # Architecture
//!
//! - [`api`] - typed client for the REST backend (bearer auth, error classification)
//! - [`services`] - login, logout, and token validation with a verification cache
//! - [`middleware`] - sessions, auth guards, and security headers
//! - [`forms`] - server-side form validation
//! - [`notify`] - toast notifications carried in the session
//! - [`routes`] - askama-rendered pages
//!
//! The backend owns every business rule. The console validates input for
//! friendlier errors and renders whatever the backend returns.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ConsoleConfig;
pub use routes::app;
pub use state::AppState;
