//! OrderDesk Core - Shared types library.
//!
//! This crate provides common types used across all OrderDesk components:
//! - `admin` - The order-management console (server-rendered)
//! - `cli` - Command-line access to the same backend
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! The REST backend owns every business rule; these types only describe the
//! values the console reads, validates, and displays.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
