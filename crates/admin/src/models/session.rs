//! Session-stored authentication state.

use serde::{Deserialize, Serialize};

use orderdesk_core::{UserId, UserRole};

use crate::api::User;

/// Snapshot of the logged-in user, taken at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Session keys for console state.
pub mod keys {
    /// Backend bearer token.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// [`super::CurrentUser`] of the logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Pending toasts, drained by the next rendered page.
    pub const TOASTS: &str = "toasts";
}
