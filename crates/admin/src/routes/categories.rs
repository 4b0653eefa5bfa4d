//! Category route handlers.

use askama::Template;
use axum::{
    Form,
    extract::Path,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use orderdesk_core::CategoryId;

use crate::{
    api::Category,
    filters,
    forms::{CategoryForm, FieldErrors},
    middleware::{AuthContext, RequireAuth},
    notify,
};

use super::layout::{Page, render};
use super::outcome::{PageResult, after_mutation, load};

#[derive(Debug, Clone)]
pub struct CategoryRowView {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
}

impl From<&Category> for CategoryRowView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.map(|id| id.to_string()),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub page: Page,
    pub categories: Vec<CategoryRowView>,
}

#[derive(Template)]
#[template(path = "categories/new.html")]
pub struct CategoryNewTemplate {
    pub page: Page,
    pub form: CategoryForm,
    pub errors: FieldErrors,
}

/// All categories.
#[instrument(skip(ctx))]
pub async fn index(RequireAuth(ctx): RequireAuth) -> PageResult {
    let categories = load(&ctx, ctx.api.list_categories().await)
        .await?
        .unwrap_or_default();
    let template = CategoriesIndexTemplate {
        page: Page::new(&ctx, "/categories", "Categories").await,
        categories: categories.iter().map(CategoryRowView::from).collect(),
    };
    Ok(render(&template).into_response())
}

async fn render_new(ctx: &AuthContext, form: CategoryForm, errors: FieldErrors) -> PageResult {
    let template = CategoryNewTemplate {
        page: Page::new(ctx, "/categories", "New category").await,
        form,
        errors,
    };
    Ok(render(&template).into_response())
}

#[instrument(skip(ctx))]
pub async fn new(RequireAuth(ctx): RequireAuth) -> PageResult {
    render_new(&ctx, CategoryForm::default(), FieldErrors::new()).await
}

/// Create a category.
#[instrument(skip(ctx, form))]
pub async fn create(RequireAuth(ctx): RequireAuth, Form(form): Form<CategoryForm>) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => return render_new(&ctx, form, errors).await,
    };

    match ctx.api.create_category(&request).await {
        Ok(_) => {
            notify::success(&ctx.session, "Category created", "Category created successfully!")
                .await;
            Ok(Redirect::to("/categories").into_response())
        }
        Err(err) => match notify::surface_api_error(&ctx.session, &err).await {
            Some(redirect) => Ok(redirect),
            None => render_new(&ctx, form, FieldErrors::new()).await,
        },
    }
}

/// Delete a category.
#[instrument(skip(ctx))]
pub async fn delete(RequireAuth(ctx): RequireAuth, Path(id): Path<CategoryId>) -> PageResult {
    Ok(after_mutation(
        &ctx,
        ctx.api.delete_category(id).await,
        ("Category deleted", "Category deleted successfully!"),
        "/categories",
        "/categories",
    )
    .await)
}
