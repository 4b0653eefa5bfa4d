//! Login, signup, and logout.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    api::ApiError,
    error::clear_sentry_user,
    filters,
    forms::{FieldErrors, LoginForm, SignupForm},
    middleware::{auth::LOGIN_PATH, safe_return_url},
    notify,
    services::{AuthError, AuthService},
    state::AppState,
};

use super::layout::{Page, render};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "returnUrl")]
    pub return_url: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub form: LoginForm,
    pub errors: FieldErrors,
    /// Backend rejection shown above the form.
    pub form_error: Option<String>,
    pub return_url: String,
}

#[derive(Template)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub page: Page,
    pub form: SignupForm,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
}

async fn login_page(
    session: &Session,
    mut form: LoginForm,
    errors: FieldErrors,
    form_error: Option<String>,
) -> Response {
    let return_url = form.return_url.take().unwrap_or_default();
    form.password.clear();
    render(&LoginTemplate {
        page: Page::anonymous(session, LOGIN_PATH, "Sign in").await,
        form,
        errors,
        form_error,
        return_url,
    })
    .into_response()
}

/// Login page. Already-authenticated users go straight to their destination.
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Response {
    let auth = AuthService::from_state(&state, &session);
    if auth.validate_token().await {
        return Redirect::to(&safe_return_url(query.return_url.as_deref())).into_response();
    }

    let form = LoginForm {
        return_url: query.return_url,
        ..LoginForm::default()
    };
    login_page(&session, form, FieldErrors::new(), None).await
}

/// Login form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return login_page(&session, form, errors, None).await,
    };

    let auth = AuthService::from_state(&state, &session);
    match auth.login(&request).await {
        Ok(user) => {
            notify::success(
                &session,
                "Welcome",
                format!("Welcome back, {}!", user.username),
            )
            .await;
            Redirect::to(&safe_return_url(form.return_url.as_deref())).into_response()
        }
        Err(AuthError::Api(err @ ApiError::InvalidCredentials { .. })) => {
            tracing::info!("Login rejected");
            login_page(&session, form, FieldErrors::new(), Some(err.toast_message())).await
        }
        Err(AuthError::Api(err)) => {
            if let Some(redirect) = notify::surface_api_error(&session, &err).await {
                return redirect;
            }
            login_page(&session, form, FieldErrors::new(), None).await
        }
        Err(AuthError::Session(e)) => {
            tracing::error!(error = %e, "Failed to store login in session");
            login_page(
                &session,
                form,
                FieldErrors::new(),
                Some("Login failed. Please try again.".to_string()),
            )
            .await
        }
    }
}

async fn signup_page(
    session: &Session,
    mut form: SignupForm,
    errors: FieldErrors,
    form_error: Option<String>,
) -> Response {
    form.password.clear();
    form.confirm_password.clear();
    render(&SignupTemplate {
        page: Page::anonymous(session, "/auth/signup", "Create account").await,
        form,
        errors,
        form_error,
    })
    .into_response()
}

#[instrument(skip(session))]
pub async fn signup(session: Session) -> Response {
    signup_page(&session, SignupForm::default(), FieldErrors::new(), None).await
}

/// Signup submission. Does not log in; the user is sent to the login page.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signup_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return signup_page(&session, form, errors, None).await,
    };

    let auth = AuthService::from_state(&state, &session);
    match auth.register(&request).await {
        Ok(_) => {
            notify::success(
                &session,
                "Account created",
                "Registration successful. Please sign in.",
            )
            .await;
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(AuthError::Api(
            err @ (ApiError::InvalidCredentials { .. } | ApiError::BadRequest { .. }),
        )) => signup_page(&session, form, FieldErrors::new(), Some(err.toast_message())).await,
        Err(AuthError::Api(err)) => {
            if let Some(redirect) = notify::surface_api_error(&session, &err).await {
                return redirect;
            }
            signup_page(&session, form, FieldErrors::new(), None).await
        }
        Err(AuthError::Session(e)) => {
            tracing::error!(error = %e, "Session error during signup");
            signup_page(&session, form, FieldErrors::new(), None).await
        }
    }
}

/// Logout. Always ends on the login page.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    AuthService::from_state(&state, &session).logout().await;
    clear_sentry_user();
    // Toasts queued for the previous user's last page.
    notify::clear(&session).await;
    notify::info(&session, "Signed out", "You have been logged out.").await;
    Redirect::to(LOGIN_PATH)
}
