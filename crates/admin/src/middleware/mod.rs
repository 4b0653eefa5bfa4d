//! HTTP middleware and extractors for the console.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (when configured)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers
//! 4. Session layer (tower-sessions, signed cookie)
//! 5. Auth guards ([`RequireAuth`], [`RequireAdmin`]) as handler extractors

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{AuthContext, AuthRejection, RequireAdmin, RequireAuth, safe_return_url};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
