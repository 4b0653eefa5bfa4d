//! Order creation form.
//!
//! Item rows are added, removed, and re-priced by submitting the form with
//! an `intent` button; the running total is computed on the server.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{CurrencyCode, CustomerId, ProductId};
use rust_decimal::Decimal;

use crate::{
    api::{Customer, Page as ApiPage, Product, ProductFilter},
    filters,
    forms::{FieldErrors, FormIntent, FormPairs, OrderForm, OrderItemInput},
    middleware::{AuthContext, RequireAuth},
    notify,
    state::AppState,
};

use super::super::layout::{Page, money, render};
use super::super::outcome::{PageResult, load};

/// Customers and products offered in the pickers.
const PICKER_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateQuery {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CustomerOption {
    pub id: CustomerId,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct ProductOption {
    pub id: ProductId,
    pub label: String,
}

/// One item row with its computed prices.
#[derive(Debug, Clone)]
pub struct ItemRowView {
    pub index: usize,
    pub input: OrderItemInput,
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Template)]
#[template(path = "orders/create.html")]
pub struct OrderCreateTemplate {
    pub page: Page,
    pub form: OrderForm,
    pub errors: FieldErrors,
    pub customers: Vec<CustomerOption>,
    pub products: Vec<ProductOption>,
    pub rows: Vec<ItemRowView>,
    pub total: String,
}

struct Pickers {
    customers: Vec<Customer>,
    products: Vec<Product>,
}

async fn load_pickers(ctx: &AuthContext) -> Result<Pickers, axum::response::Response> {
    let page = ApiPage::new(0, PICKER_LIMIT);
    let customers = load(ctx, ctx.api.list_customers(page).await)
        .await?
        .unwrap_or_default();
    let products = load(
        ctx,
        ctx.api.list_products(page, &ProductFilter::default()).await,
    )
    .await?
    .unwrap_or_default();
    Ok(Pickers {
        customers,
        products,
    })
}

async fn render_form(
    ctx: &AuthContext,
    pickers: &Pickers,
    form: OrderForm,
    mut errors: FieldErrors,
    currency: CurrencyCode,
) -> PageResult {
    let totals = form.totals(&pickers.products);
    errors.merge(totals.errors());
    let amount = |value: Option<Decimal>| {
        value.map_or_else(|| "\u{2014}".to_string(), |v| money(v, currency))
    };
    let rows = form
        .items
        .iter()
        .zip(&totals.lines)
        .enumerate()
        .map(|(index, (input, line))| ItemRowView {
            index,
            input: input.clone(),
            unit_price: money(line.unit_price, currency),
            subtotal: amount(line.subtotal),
        })
        .collect();

    let template = OrderCreateTemplate {
        page: Page::new(ctx, "/orders/create", "New order").await,
        customers: pickers
            .customers
            .iter()
            .map(|c| CustomerOption {
                id: c.id,
                label: format!("{} ({})", c.full_name(), c.email),
            })
            .collect(),
        products: pickers
            .products
            .iter()
            .map(|p| ProductOption {
                id: p.id,
                label: format!(
                    "{} \u{2014} {} ({} in stock)",
                    p.name,
                    money(p.price, currency),
                    p.stock_quantity
                ),
            })
            .collect(),
        rows,
        total: amount(totals.total),
        form,
        errors,
    };
    Ok(render(&template).into_response())
}

/// Empty order form, optionally preselecting a customer.
#[instrument(skip(ctx, state))]
pub async fn new(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<CreateQuery>,
) -> PageResult {
    let pickers = load_pickers(&ctx).await?;
    let form = OrderForm {
        customer_id: query.customer_id.unwrap_or_default(),
        ..OrderForm::default()
    };
    render_form(
        &ctx,
        &pickers,
        form,
        FieldErrors::new(),
        state.config().currency,
    )
    .await
}

/// Order form submission: row edits re-render, save creates the order.
#[instrument(skip(ctx, state, pairs))]
pub async fn create(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let currency = state.config().currency;
    let pairs = FormPairs::new(pairs);
    let mut form = OrderForm::from_pairs(&pairs);
    let intent = FormIntent::parse(&pairs.value("intent"));

    if form.apply_intent(intent) {
        let pickers = load_pickers(&ctx).await?;
        return render_form(&ctx, &pickers, form, FieldErrors::new(), currency).await;
    }

    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let pickers = load_pickers(&ctx).await?;
            return render_form(&ctx, &pickers, form, errors, currency).await;
        }
    };

    match ctx.api.create_order(&request).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, "Order created");
            notify::success(&ctx.session, "Order created", "Order created successfully!").await;
            Ok(Redirect::to(&format!("/orders/{}", order.id)).into_response())
        }
        Err(err) => {
            if let Some(redirect) = notify::surface_api_error(&ctx.session, &err).await {
                return Ok(redirect);
            }
            let pickers = load_pickers(&ctx).await?;
            render_form(&ctx, &pickers, form, FieldErrors::new(), currency).await
        }
    }
}
