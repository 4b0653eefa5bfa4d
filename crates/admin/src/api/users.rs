//! Authentication, profile, and user management endpoints.

use orderdesk_core::UserId;
use tracing::instrument;

use super::endpoints::users;
use super::{
    AccountStatusRequest, ApiClient, ApiError, BulkUserActionRequest, BulkUserActionResponse,
    ChangePasswordRequest, CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, Page,
    UpdateProfileRequest, UpdateUserRequest, User, UserListResponse, UserSearchRequest,
    UserStatsResponse, VerifyResponse,
};

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidCredentials`] when the backend rejects them.
    #[instrument(skip(self, request), fields(username = %request.username_or_email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post(users::LOGIN, request).await
    }

    /// Invalidate the current token on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.post(users::LOGOUT, &serde_json::json!({})).await
    }

    /// Ask the backend whether the current token is still valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self))]
    pub async fn verify_token(&self) -> Result<VerifyResponse, ApiError> {
        self.get(users::VERIFY).await
    }

    /// Create an account through self-registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        self.post(users::REGISTER, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.get(users::PROFILE).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(users::PROFILE, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the current password is wrong.
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(users::CHANGE_PASSWORD, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self, page: Page) -> Result<Vec<User>, ApiError> {
        self.get_with_query(
            users::BASE,
            &[("offset", page.offset), ("limit", page.limit)],
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.get(&users::by_id(id)).await
    }

    /// Create an account as an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        self.post(users::REGISTER, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn search_users(
        &self,
        request: &UserSearchRequest,
    ) -> Result<UserListResponse, ApiError> {
        self.post(users::SEARCH, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&users::by_id(id), request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        self.delete(&users::by_id(id)).await
    }

    /// Lock or unlock an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(status = %request.status))]
    pub async fn update_account_status(
        &self,
        id: UserId,
        request: &AccountStatusRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&users::status(id), request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn user_stats(&self) -> Result<UserStatsResponse, ApiError> {
        self.get(users::STATS).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(action = ?request.action, count = request.user_ids.len()))]
    pub async fn bulk_user_action(
        &self,
        request: &BulkUserActionRequest,
    ) -> Result<BulkUserActionResponse, ApiError> {
        self.post(users::BULK, request).await
    }
}
