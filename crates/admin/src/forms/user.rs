//! User management and profile forms.

use orderdesk_core::{UserRole, UserStatus};
use serde::Deserialize;

use crate::api::{
    AccountStatusRequest, ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest,
    UpdateUserRequest, User,
};

use super::{
    FieldErrors, confirmation, email, non_blank, parsed, password, required, required_min_len,
};

fn default_role() -> String {
    UserRole::User.as_str().to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreateForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub phone_number: String,
}

impl Default for UserCreateForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: default_role(),
            phone_number: String::new(),
        }
    }
}

impl UserCreateForm {
    /// # Errors
    ///
    /// Returns the field errors when the input is invalid.
    pub fn validate(&self) -> Result<CreateUserRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = required_min_len(&mut errors, "username", "Username", &self.username, 3);
        let email = email(&mut errors, "email", &self.email);
        password(&mut errors, "password", "Password", &self.password, 6);
        confirmation(
            &mut errors,
            "confirm_password",
            &self.password,
            &self.confirm_password,
        );
        let role: Option<UserRole> = parsed(&mut errors, "role", "Role", &self.role);

        errors.into_result(CreateUserRequest {
            username,
            email,
            password: self.password.clone(),
            role,
            phone_number: non_blank(&self.phone_number),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEditForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub phone_number: String,
}

impl From<&User> for UserEditForm {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            status: user.effective_status().as_str().to_string(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
        }
    }
}

impl UserEditForm {
    /// # Errors
    ///
    /// Returns the field errors when the input is invalid.
    pub fn validate(&self) -> Result<UpdateUserRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = email(&mut errors, "email", &self.email);
        let role: Option<UserRole> = parsed(&mut errors, "role", "Role", &self.role);
        let status: Option<UserStatus> = parsed(&mut errors, "status", "Status", &self.status);

        errors.into_result(UpdateUserRequest {
            email: Some(email),
            role,
            status,
            phone_number: non_blank(&self.phone_number),
        })
    }
}

/// Lock or unlock an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountStatusForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
}

impl AccountStatusForm {
    /// # Errors
    ///
    /// Returns the field errors when the status is missing or unknown.
    pub fn validate(&self) -> Result<AccountStatusRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let status: Option<UserStatus> = parsed(&mut errors, "status", "Status", &self.status);
        match status {
            Some(status) if errors.is_empty() => Ok(AccountStatusRequest {
                status,
                reason: non_blank(&self.reason),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

impl From<&User> for ProfileForm {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
        }
    }
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns the field errors when the input is invalid.
    pub fn validate(&self) -> Result<UpdateProfileRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = required_min_len(&mut errors, "username", "Username", &self.username, 3);
        let email = email(&mut errors, "email", &self.email);

        errors.into_result(UpdateProfileRequest {
            email: Some(email),
            username: Some(username),
            phone_number: non_blank(&self.phone_number),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl PasswordForm {
    /// # Errors
    ///
    /// Returns the field errors when the input is invalid.
    pub fn validate(&self) -> Result<ChangePasswordRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            required(&mut errors, "current_password", "Current password", "");
        }
        password(&mut errors, "new_password", "New password", &self.new_password, 6);
        confirmation(
            &mut errors,
            "confirm_password",
            &self.new_password,
            &self.confirm_password,
        );

        errors.into_result(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}
