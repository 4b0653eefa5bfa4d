//! The signed-in user's own profile and password.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use crate::{
    filters,
    forms::{FieldErrors, PasswordForm, ProfileForm},
    middleware::{AuthContext, RequireAuth},
    notify,
    services::AuthService,
    state::AppState,
};

use super::layout::{Page, render};
use super::outcome::{PageResult, after_mutation, require};

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub page: Page,
    pub role_label: &'static str,
    pub member_since: String,
    pub form: ProfileForm,
    pub errors: FieldErrors,
    pub password_form: PasswordForm,
    pub password_errors: FieldErrors,
}

struct ProfileState {
    form: Option<ProfileForm>,
    errors: FieldErrors,
    password_errors: FieldErrors,
}

async fn render_profile(ctx: &AuthContext, state: ProfileState) -> PageResult {
    let user = require(ctx, ctx.api.get_profile().await, "/dashboard").await?;
    let template = ProfileTemplate {
        page: Page::new(ctx, "/profile", "My profile").await,
        role_label: user.role.label(),
        member_since: user.created_at.clone(),
        form: state.form.unwrap_or_else(|| ProfileForm::from(&user)),
        errors: state.errors,
        // Never echo passwords back.
        password_form: PasswordForm::default(),
        password_errors: state.password_errors,
    };
    Ok(render(&template).into_response())
}

#[instrument(skip(ctx))]
pub async fn show(RequireAuth(ctx): RequireAuth) -> PageResult {
    render_profile(
        &ctx,
        ProfileState {
            form: None,
            errors: FieldErrors::new(),
            password_errors: FieldErrors::new(),
        },
    )
    .await
}

/// Save username, email, and phone, then refresh the session's user.
#[instrument(skip(ctx, state, form))]
pub async fn update(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            return render_profile(
                &ctx,
                ProfileState {
                    form: Some(form),
                    errors,
                    password_errors: FieldErrors::new(),
                },
            )
            .await;
        }
    };

    if let Err(err) = ctx.api.update_profile(&request).await {
        if let Some(redirect) = notify::surface_api_error(&ctx.session, &err).await {
            return Ok(redirect);
        }
        return render_profile(
            &ctx,
            ProfileState {
                form: Some(form),
                errors: FieldErrors::new(),
                password_errors: FieldErrors::new(),
            },
        )
        .await;
    }

    match ctx.api.get_profile().await {
        Ok(user) => {
            let auth = AuthService::from_state(&state, &ctx.session);
            if let Err(e) = auth.refresh_user(&user).await {
                tracing::warn!(error = %e, "Could not refresh session user");
            }
        }
        Err(err) => tracing::warn!(error = %err, "Could not reload profile"),
    }

    notify::success(&ctx.session, "Profile updated", "Profile updated successfully!").await;
    Ok(Redirect::to("/profile").into_response())
}

#[instrument(skip(ctx, form))]
pub async fn change_password(
    RequireAuth(ctx): RequireAuth,
    Form(form): Form<PasswordForm>,
) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(password_errors) => {
            return render_profile(
                &ctx,
                ProfileState {
                    form: None,
                    errors: FieldErrors::new(),
                    password_errors,
                },
            )
            .await;
        }
    };

    Ok(after_mutation(
        &ctx,
        ctx.api.change_password(&request).await,
        ("Password changed", "Password changed successfully!"),
        "/profile",
        "/profile",
    )
    .await)
}
