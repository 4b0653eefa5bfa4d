//! Login and signup forms.

use serde::Deserialize;

use crate::api::{CreateUserRequest, LoginRequest};

use super::{FieldErrors, confirmation, email, password, required_min_len};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Page to return to after login.
    #[serde(default, rename = "returnUrl")]
    pub return_url: Option<String>,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the field errors when the input is invalid.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = required_min_len(&mut errors, "username", "Username", &self.username, 3);
        password(&mut errors, "password", "Password", &self.password, 6);

        errors.into_result(LoginRequest {
            username_or_email: username,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl SignupForm {
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

        errors.into_result(CreateUserRequest {
            username,
            email,
            password: self.password.clone(),
            role: None,
            phone_number: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_rules() {
        let form = LoginForm {
            username: "ab".to_string(),
            password: "12345".to_string(),
            return_url: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first("username"), "Username must be at least 3 characters");
        assert_eq!(errors.first("password"), "Password must be at least 6 characters");

        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.first("username"), "Username is required");
        assert_eq!(errors.first("password"), "Password is required");
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            username: " ana ".to_string(),
            password: "secret1".to_string(),
            return_url: Some("/orders".to_string()),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.username_or_email, "ana");
        assert_eq!(request.password, "secret1");
    }

    #[test]
    fn test_signup_password_mismatch() {
        let form = SignupForm {
            username: "ana".to_string(),
            email: "ana@shop.io".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first("confirm_password"), "Passwords do not match");
    }

    #[test]
    fn test_signup_requires_confirmation_and_valid_email() {
        let form = SignupForm {
            username: "ana".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            confirm_password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("email"));
        assert!(errors.has("confirm_password"));
    }
}
