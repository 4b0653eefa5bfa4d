//! Product catalogue route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{CategoryId, CurrencyCode, ProductId};

use crate::{
    api::{Category, Product, ProductFilter},
    filters,
    forms::{FieldErrors, ProductForm, StockForm},
    middleware::{AuthContext, RequireAuth},
    notify,
    state::AppState,
};

use super::layout::{Page, Pager, money, page_from_query, render};
use super::outcome::{PageResult, after_mutation, load, require};

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock_quantity: i64,
    pub in_stock: bool,
}

impl ProductRowView {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category_name.clone().unwrap_or_default(),
            price: money(product.price, currency),
            stock_quantity: product.stock_quantity,
            in_stock: product.in_stock(),
        }
    }
}

/// `<option>` in a category picker.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

impl CategoryOption {
    fn list(categories: &[Category], is_selected: impl Fn(Option<CategoryId>) -> bool) -> Vec<Self> {
        categories
            .iter()
            .filter_map(|category| {
                category.id.map(|id| Self {
                    id: id.to_string(),
                    name: category.name.clone(),
                    selected: is_selected(Some(id)),
                })
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: Page,
    pub products: Vec<ProductRowView>,
    pub categories: Vec<CategoryOption>,
    pub search: String,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub page: Page,
    /// `None` while creating.
    pub product_id: Option<String>,
    pub form: ProductForm,
    pub errors: FieldErrors,
    pub categories: Vec<CategoryOption>,
    pub stock_form: StockForm,
    pub stock_errors: FieldErrors,
}

/// Product list with search and category filter.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> PageResult {
    let config = state.config();
    let page = page_from_query(query.offset, query.limit, config.page_size);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let category_id = query
        .category_id
        .as_deref()
        .and_then(|s| s.trim().parse::<CategoryId>().ok());

    let filter = ProductFilter {
        search: search.clone(),
        category_id,
    };
    let products = load(&ctx, ctx.api.list_products(page, &filter).await)
        .await?
        .unwrap_or_default();
    let categories = load(&ctx, ctx.api.list_categories().await)
        .await?
        .unwrap_or_default();

    let search = search.unwrap_or_default();
    let template = ProductsIndexTemplate {
        pager: Pager::new(
            page,
            products.len(),
            "/products",
            &[
                ("search", search.clone()),
                (
                    "categoryId",
                    category_id.map(|id| id.to_string()).unwrap_or_default(),
                ),
            ],
        ),
        products: products
            .iter()
            .map(|p| ProductRowView::new(p, config.currency))
            .collect(),
        categories: CategoryOption::list(&categories, |id| id == category_id),
        search,
        page: Page::new(&ctx, "/products", "Products").await,
    };
    Ok(render(&template).into_response())
}

struct FormState {
    product_id: Option<ProductId>,
    form: ProductForm,
    errors: FieldErrors,
    stock_form: StockForm,
    stock_errors: FieldErrors,
}

impl FormState {
    fn new(product_id: Option<ProductId>, form: ProductForm) -> Self {
        Self {
            product_id,
            form,
            errors: FieldErrors::new(),
            stock_form: StockForm::default(),
            stock_errors: FieldErrors::new(),
        }
    }
}

async fn render_form(ctx: &AuthContext, state: FormState) -> PageResult {
    let categories = load(ctx, ctx.api.list_categories().await)
        .await?
        .unwrap_or_default();
    let title = state
        .product_id
        .map_or_else(|| "New product".to_string(), |id| format!("Product #{id}"));

    let template = ProductFormTemplate {
        page: Page::new(ctx, "/products", &title).await,
        product_id: state.product_id.map(|id| id.to_string()),
        categories: CategoryOption::list(&categories, |id| state.form.is_category(id)),
        form: state.form,
        errors: state.errors,
        stock_form: state.stock_form,
        stock_errors: state.stock_errors,
    };
    Ok(render(&template).into_response())
}

/// Empty product form.
#[instrument(skip(ctx))]
pub async fn new(RequireAuth(ctx): RequireAuth) -> PageResult {
    render_form(&ctx, FormState::new(None, ProductForm::default())).await
}

/// Create a product.
#[instrument(skip(ctx, form))]
pub async fn create(RequireAuth(ctx): RequireAuth, Form(form): Form<ProductForm>) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            return render_form(
                &ctx,
                FormState {
                    errors,
                    ..FormState::new(None, form)
                },
            )
            .await;
        }
    };

    match ctx.api.create_product(&request).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            notify::success(&ctx.session, "Product created", "Product created successfully!").await;
            Ok(Redirect::to("/products").into_response())
        }
        Err(err) => {
            if let Some(redirect) = notify::surface_api_error(&ctx.session, &err).await {
                return Ok(redirect);
            }
            render_form(&ctx, FormState::new(None, form)).await
        }
    }
}

/// Edit form, with the stock adjustment form.
#[instrument(skip(ctx))]
pub async fn edit(RequireAuth(ctx): RequireAuth, Path(id): Path<ProductId>) -> PageResult {
    let product = require(&ctx, ctx.api.get_product(id).await, "/products").await?;
    let mut state = FormState::new(Some(id), ProductForm::from(&product));
    state.stock_form.quantity = product.stock_quantity.to_string();
    render_form(&ctx, state).await
}

/// Save a product.
#[instrument(skip(ctx, form))]
pub async fn update(
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            return render_form(
                &ctx,
                FormState {
                    errors,
                    ..FormState::new(Some(id), form)
                },
            )
            .await;
        }
    };

    Ok(after_mutation(
        &ctx,
        ctx.api.update_product(id, &request).await,
        ("Product updated", "Product updated successfully!"),
        "/products",
        &format!("/products/{id}/edit"),
    )
    .await)
}

/// Set the absolute stock level.
#[instrument(skip(ctx, stock_form))]
pub async fn update_stock(
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<ProductId>,
    Form(stock_form): Form<StockForm>,
) -> PageResult {
    let back = format!("/products/{id}/edit");
    let quantity = match stock_form.validate() {
        Ok(quantity) => quantity,
        Err(stock_errors) => {
            let product = require(&ctx, ctx.api.get_product(id).await, "/products").await?;
            return render_form(
                &ctx,
                FormState {
                    stock_form,
                    stock_errors,
                    ..FormState::new(Some(id), ProductForm::from(&product))
                },
            )
            .await;
        }
    };

    Ok(after_mutation(
        &ctx,
        ctx.api.update_stock(id, quantity).await,
        ("Stock updated", "Stock updated successfully!"),
        &back,
        &back,
    )
    .await)
}

/// Delete a product.
#[instrument(skip(ctx))]
pub async fn delete(RequireAuth(ctx): RequireAuth, Path(id): Path<ProductId>) -> PageResult {
    Ok(after_mutation(
        &ctx,
        ctx.api.delete_product(id).await,
        ("Product deleted", "Product deleted successfully!"),
        "/products",
        "/products",
    )
    .await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_options_skip_unsaved() {
        let categories = vec![
            Category {
                id: Some(CategoryId::new(1)),
                name: "Mugs".to_string(),
                description: None,
            },
            Category {
                id: None,
                name: "Draft".to_string(),
                description: None,
            },
        ];
        let options = CategoryOption::list(&categories, |id| id == Some(CategoryId::new(1)));
        assert_eq!(options.len(), 1);
        assert!(options[0].selected);
    }
}
