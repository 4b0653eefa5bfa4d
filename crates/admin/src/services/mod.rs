//! Business logic services for the console.
//!
//! # Services
//!
//! - `auth` - login, logout, registration, and token validation against the backend

pub mod auth;

pub use auth::{AuthError, AuthService, TokenCache};
