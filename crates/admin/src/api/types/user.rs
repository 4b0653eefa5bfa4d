//! Console users, authentication, and profile records.

use std::collections::BTreeMap;

use orderdesk_core::{UserId, UserRole, UserStatus};
use serde::{Deserialize, Serialize};

use super::common::{bool_or_string, string_or_number};

/// A console account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Accounts without an explicit status are treated as active.
    #[must_use]
    pub fn effective_status(&self) -> UserStatus {
        self.status.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Body of `GET /users/verify`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerifyResponse {
    #[serde(deserialize_with = "bool_or_string")]
    pub valid: bool,
}

/// Used both by self-registration and by admins creating accounts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Lock or unlock an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountStatusRequest {
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub locked_users: u64,
}

/// Action applied to several accounts at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Activate,
    Suspend,
    Delete,
}

impl BulkAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Activate => "Activate",
            Self::Suspend => "Suspend",
            Self::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUserActionRequest {
    pub user_ids: Vec<UserId>,
    pub action: BulkAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkUserActionResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub affected: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_minimal_payload() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "username": "ana", "email": "ana@shop.io", "role": "admin", "createdAt": "2024-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(user.id, UserId::new(7));
        assert!(user.is_admin());
        assert_eq!(user.effective_status(), UserStatus::Active);
        assert!(user.phone_number.is_none());
    }

    #[test]
    fn test_login_request_uses_camel_case() {
        let body = serde_json::to_value(LoginRequest {
            username_or_email: "ana".to_string(),
            password: "hunter22".to_string(),
        })
        .unwrap();
        assert_eq!(body["usernameOrEmail"], "ana");
        assert_eq!(body["password"], "hunter22");
    }

    #[test]
    fn test_create_user_request_omits_absent_fields() {
        let body = serde_json::to_value(CreateUserRequest {
            username: "bob".to_string(),
            email: "bob@shop.io".to_string(),
            password: "secret1".to_string(),
            role: None,
            phone_number: None,
        })
        .unwrap();
        assert!(body.get("role").is_none());
        assert!(body.get("phoneNumber").is_none());
    }

    #[test]
    fn test_bulk_request_shape() {
        let body = serde_json::to_value(BulkUserActionRequest {
            user_ids: vec![UserId::new(1), UserId::new(2)],
            action: BulkAction::Suspend,
            params: None,
        })
        .unwrap();
        assert_eq!(body["userIds"], serde_json::json!([1, 2]));
        assert_eq!(body["action"], "suspend");
    }
}
