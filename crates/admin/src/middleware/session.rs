//! Session middleware configuration.
//!
//! Sessions live in process memory; the cookie only carries a signed session
//! id. Stricter settings than a public site: `SameSite=Strict`, `HttpOnly`,
//! and a 24 hour inactivity expiry.

use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{ConfigError, ConsoleConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "orderdesk_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the signed-cookie session layer backed by an in-memory store.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the session secret is too short
/// to derive a signing key.
pub fn create_session_layer(
    config: &ConsoleConfig,
) -> Result<SessionManagerLayer<MemoryStore, SignedCookie>, ConfigError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes()).map_err(|e| {
        ConfigError::InsecureSecret("CONSOLE_SESSION_SECRET".to_string(), e.to_string())
    })?;

    Ok(SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
