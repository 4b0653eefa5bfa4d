//! Types the console keeps in its own session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
