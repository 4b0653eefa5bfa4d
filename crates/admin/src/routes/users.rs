//! User administration route handlers. Every handler requires the admin role.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{UserId, UserRole, UserStatus};

use crate::{
    api::{
        ApiError, BulkAction, BulkUserActionRequest, User, UserSearchRequest, UserStatsResponse,
    },
    filters,
    forms::{AccountStatusForm, FieldErrors, FormPairs, UserCreateForm, UserEditForm},
    middleware::{AuthContext, RequireAdmin},
    notify,
    state::AppState,
};

use super::layout::{Page, Pager, page_from_query, render};
use super::outcome::{PageResult, after_mutation, load, require};

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub query: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// `<option>` for role and status pickers.
#[derive(Debug, Clone)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn role_options(selected: &str) -> Vec<ChoiceOption> {
    UserRole::ALL
        .into_iter()
        .map(|role| ChoiceOption {
            value: role.as_str(),
            label: role.label(),
            selected: role.as_str() == selected,
        })
        .collect()
}

fn status_options(selected: &str) -> Vec<ChoiceOption> {
    UserStatus::ALL
        .into_iter()
        .map(|status| ChoiceOption {
            value: status.as_str(),
            label: status.label(),
            selected: status.as_str() == selected,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role_label: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub phone_number: String,
    pub last_login: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_self: bool,
    pub is_locked: bool,
}

impl UserRowView {
    fn new(user: &User, current: UserId) -> Self {
        let status = user.effective_status();
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role_label: user.role.label(),
            status_label: status.label(),
            status_class: status.badge_class(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            last_login: user.last_login.clone().unwrap_or_default(),
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone().unwrap_or_default(),
            is_self: user.id == current,
            is_locked: status == UserStatus::Locked,
        }
    }
}

#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub page: Page,
    pub users: Vec<UserRowView>,
    pub total: u64,
    pub stats: Option<UserStatsResponse>,
    pub query: String,
    pub role_options: Vec<ChoiceOption>,
    pub status_options: Vec<ChoiceOption>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "users/new.html")]
pub struct UserNewTemplate {
    pub page: Page,
    pub form: UserCreateForm,
    pub errors: FieldErrors,
    pub role_options: Vec<ChoiceOption>,
}

#[derive(Template)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub page: Page,
    pub user: UserRowView,
    pub status_form: AccountStatusForm,
    pub status_options: Vec<ChoiceOption>,
}

#[derive(Template)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub page: Page,
    pub user_id: String,
    pub username: String,
    pub form: UserEditForm,
    pub errors: FieldErrors,
    pub role_options: Vec<ChoiceOption>,
    pub status_options: Vec<ChoiceOption>,
}

/// Search, filters, and account totals.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> PageResult {
    let page = page_from_query(query.offset, query.limit, state.config().page_size);
    let text = query.query.as_deref().map(str::trim).unwrap_or_default();
    let role = query.role.as_deref().and_then(|r| r.parse::<UserRole>().ok());
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<UserStatus>().ok());

    let search = UserSearchRequest {
        query: (!text.is_empty()).then(|| text.to_string()),
        role,
        status,
        offset: Some(page.offset),
        limit: Some(page.limit),
    };
    let result = load(&ctx, ctx.api.search_users(&search).await).await?;
    let stats = load(&ctx, ctx.api.user_stats().await).await?;

    let (users, total) = result.map_or((Vec::new(), 0), |r| (r.users, r.total));
    let role_value = role.map(|r| r.as_str().to_string()).unwrap_or_default();
    let status_value = status.map(|s| s.as_str().to_string()).unwrap_or_default();

    let template = UsersIndexTemplate {
        pager: Pager::new(
            page,
            users.len(),
            "/users",
            &[
                ("query", text.to_string()),
                ("role", role_value.clone()),
                ("status", status_value.clone()),
            ],
        ),
        users: users
            .iter()
            .map(|u| UserRowView::new(u, ctx.user.id))
            .collect(),
        total,
        stats,
        query: text.to_string(),
        role_options: role_options(&role_value),
        status_options: status_options(&status_value),
        page: Page::new(&ctx, "/users", "Users").await,
    };
    Ok(render(&template).into_response())
}

async fn render_new(ctx: &AuthContext, form: UserCreateForm, errors: FieldErrors) -> PageResult {
    let template = UserNewTemplate {
        page: Page::new(ctx, "/users", "New user").await,
        role_options: role_options(&form.role),
        form,
        errors,
    };
    Ok(render(&template).into_response())
}

#[instrument(skip(ctx))]
pub async fn new(RequireAdmin(ctx): RequireAdmin) -> PageResult {
    render_new(&ctx, UserCreateForm::default(), FieldErrors::new()).await
}

/// Create an account.
#[instrument(skip(ctx, form))]
pub async fn create(
    RequireAdmin(ctx): RequireAdmin,
    Form(form): Form<UserCreateForm>,
) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return render_new(&ctx, form, errors).await,
    };

    match ctx.api.create_user(&request).await.map_err(ApiError::signed_in) {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User created");
            notify::success(&ctx.session, "User created", "User created successfully!").await;
            Ok(Redirect::to("/users").into_response())
        }
        Err(err) => match notify::surface_api_error(&ctx.session, &err).await {
            Some(redirect) => Ok(redirect),
            None => render_new(&ctx, form, FieldErrors::new()).await,
        },
    }
}

/// Account detail with the lock/unlock form.
#[instrument(skip(ctx))]
pub async fn show(RequireAdmin(ctx): RequireAdmin, Path(id): Path<UserId>) -> PageResult {
    let user = require(&ctx, ctx.api.get_user(id).await, "/users").await?;
    let view = UserRowView::new(&user, ctx.user.id);
    let next_status = if view.is_locked {
        UserStatus::Active
    } else {
        UserStatus::Locked
    };

    let template = UserShowTemplate {
        page: Page::new(&ctx, "/users", &format!("User {}", user.username)).await,
        status_form: AccountStatusForm {
            status: next_status.as_str().to_string(),
            reason: String::new(),
        },
        status_options: status_options(next_status.as_str()),
        user: view,
    };
    Ok(render(&template).into_response())
}

async fn render_edit(
    ctx: &AuthContext,
    user: &User,
    form: UserEditForm,
    errors: FieldErrors,
) -> PageResult {
    let template = UserEditTemplate {
        page: Page::new(ctx, "/users", &format!("Edit {}", user.username)).await,
        user_id: user.id.to_string(),
        username: user.username.clone(),
        role_options: role_options(&form.role),
        status_options: status_options(&form.status),
        form,
        errors,
    };
    Ok(render(&template).into_response())
}

#[instrument(skip(ctx))]
pub async fn edit(RequireAdmin(ctx): RequireAdmin, Path(id): Path<UserId>) -> PageResult {
    let user = require(&ctx, ctx.api.get_user(id).await, "/users").await?;
    render_edit(&ctx, &user, UserEditForm::from(&user), FieldErrors::new()).await
}

/// Save email, role, status, and phone number.
#[instrument(skip(ctx, form))]
pub async fn update(
    RequireAdmin(ctx): RequireAdmin,
    Path(id): Path<UserId>,
    Form(form): Form<UserEditForm>,
) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let user = require(&ctx, ctx.api.get_user(id).await, "/users").await?;
            return render_edit(&ctx, &user, form, errors).await;
        }
    };

    Ok(after_mutation(
        &ctx,
        ctx.api.update_user(id, &request).await,
        ("User updated", "User updated successfully!"),
        &format!("/users/{id}"),
        &format!("/users/{id}/edit"),
    )
    .await)
}

/// Lock or unlock an account.
#[instrument(skip(ctx, form))]
pub async fn update_status(
    RequireAdmin(ctx): RequireAdmin,
    Path(id): Path<UserId>,
    Form(form): Form<AccountStatusForm>,
) -> PageResult {
    let back = format!("/users/{id}");
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            notify::error(&ctx.session, "Invalid status", errors.first("status")).await;
            return Ok(Redirect::to(&back).into_response());
        }
    };

    let message = match request.status {
        UserStatus::Locked => "Account locked.",
        UserStatus::Active => "Account unlocked.",
    };
    Ok(after_mutation(
        &ctx,
        ctx.api.update_account_status(id, &request).await,
        ("Status updated", message),
        &back,
        &back,
    )
    .await)
}

/// Delete an account. The signed-in administrator cannot delete themselves.
#[instrument(skip(ctx))]
pub async fn delete(RequireAdmin(ctx): RequireAdmin, Path(id): Path<UserId>) -> PageResult {
    if id == ctx.user.id {
        notify::error(&ctx.session, "Not allowed", "You cannot delete your own account.").await;
        return Ok(Redirect::to(&format!("/users/{id}")).into_response());
    }

    Ok(after_mutation(
        &ctx,
        ctx.api.delete_user(id).await,
        ("User deleted", "User deleted successfully!"),
        "/users",
        &format!("/users/{id}"),
    )
    .await)
}

fn parse_bulk_action(raw: &str) -> Option<BulkAction> {
    match raw.trim() {
        "activate" => Some(BulkAction::Activate),
        "suspend" => Some(BulkAction::Suspend),
        "delete" => Some(BulkAction::Delete),
        _ => None,
    }
}

/// Selected ids, de-duplicated. Delete never targets the signed-in user.
fn bulk_targets(raw_ids: &[&str], action: BulkAction, current: UserId) -> Vec<UserId> {
    let mut ids: Vec<UserId> = raw_ids
        .iter()
        .filter_map(|raw| raw.trim().parse::<UserId>().ok())
        .filter(|id| action != BulkAction::Delete || *id != current)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Apply one action to the checked accounts.
#[instrument(skip(ctx, pairs))]
pub async fn bulk(
    RequireAdmin(ctx): RequireAdmin,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let pairs = FormPairs::new(pairs);
    let Some(action) = parse_bulk_action(&pairs.value("action")) else {
        notify::warning(&ctx.session, "Bulk action", "Choose an action to apply.").await;
        return Ok(Redirect::to("/users").into_response());
    };
    let user_ids = bulk_targets(&pairs.values("user_ids"), action, ctx.user.id);
    if user_ids.is_empty() {
        notify::warning(&ctx.session, "Bulk action", "Select at least one user.").await;
        return Ok(Redirect::to("/users").into_response());
    }

    let request = BulkUserActionRequest {
        user_ids,
        action,
        params: None,
    };
    match ctx.api.bulk_user_action(&request).await {
        Ok(response) => {
            let message = if response.message.trim().is_empty() {
                format!("{} applied to {} user(s).", action.label(), request.user_ids.len())
            } else {
                response.message
            };
            notify::success(&ctx.session, "Bulk action", message).await;
            Ok(Redirect::to("/users").into_response())
        }
        Err(err) => Ok(notify::surface_api_error(&ctx.session, &err)
            .await
            .unwrap_or_else(|| Redirect::to("/users").into_response())),
    }
}
