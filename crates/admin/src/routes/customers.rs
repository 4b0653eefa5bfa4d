//! Customer management route handlers.
//!
//! New customers may carry any number of address rows, added and removed
//! with `intent` buttons. Existing customers edit their details on one form
//! and manage addresses one at a time.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{AddressId, CustomerId};

use crate::{
    api::{Address, Customer},
    filters,
    forms::{AddressInput, CustomerForm, FieldErrors, FormIntent, FormPairs},
    middleware::{AuthContext, RequireAuth},
    notify,
    state::AppState,
};

use super::layout::{Page, Pager, page_from_query, render};
use super::outcome::{PageResult, after_mutation, load, require};

#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct CustomerRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

impl From<&Customer> for CustomerRowView {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.full_name(),
            email: customer.email.clone(),
            phone: customer.phone.clone().unwrap_or_default(),
            created_at: customer.created_at.clone(),
        }
    }
}

/// Saved address with its delete target.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub line: String,
    pub is_default: bool,
    pub delete_href: Option<String>,
}

impl AddressView {
    fn new(customer_id: CustomerId, address: &Address) -> Self {
        Self {
            line: address.one_line(),
            is_default: address.is_default,
            delete_href: address
                .id
                .map(|id| format!("/customers/{customer_id}/addresses/{id}/delete")),
        }
    }
}

#[derive(Template)]
#[template(path = "customers/index.html")]
pub struct CustomersIndexTemplate {
    pub page: Page,
    pub customers: Vec<CustomerRowView>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "customers/new.html")]
pub struct CustomerNewTemplate {
    pub page: Page,
    pub form: CustomerForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "customers/edit.html")]
pub struct CustomerEditTemplate {
    pub page: Page,
    pub customer_id: String,
    pub form: CustomerForm,
    pub errors: FieldErrors,
    pub addresses: Vec<AddressView>,
    pub address_form: AddressInput,
    pub address_errors: FieldErrors,
}

/// Customer list.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<CustomersQuery>,
) -> PageResult {
    let page = page_from_query(query.offset, query.limit, state.config().page_size);
    let customers = load(&ctx, ctx.api.list_customers(page).await)
        .await?
        .unwrap_or_default();

    let template = CustomersIndexTemplate {
        pager: Pager::new(page, customers.len(), "/customers", &[]),
        customers: customers.iter().map(CustomerRowView::from).collect(),
        page: Page::new(&ctx, "/customers", "Customers").await,
    };
    Ok(render(&template).into_response())
}

async fn render_new(ctx: &AuthContext, form: CustomerForm, errors: FieldErrors) -> Response {
    let template = CustomerNewTemplate {
        page: Page::new(ctx, "/customers", "New customer").await,
        form,
        errors,
    };
    render(&template).into_response()
}

/// Empty customer form.
#[instrument(skip(ctx))]
pub async fn new(RequireAuth(ctx): RequireAuth) -> PageResult {
    Ok(render_new(&ctx, CustomerForm::default(), FieldErrors::new()).await)
}

/// Create a customer, then each address row.
#[instrument(skip(ctx, pairs))]
pub async fn create(
    RequireAuth(ctx): RequireAuth,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let pairs = FormPairs::new(pairs);
    let mut form = CustomerForm::from_pairs(&pairs);
    if form.apply_intent(FormIntent::parse(&pairs.value("intent"))) {
        return Ok(render_new(&ctx, form, FieldErrors::new()).await);
    }

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return Ok(render_new(&ctx, form, errors).await),
    };

    let customer = match ctx.api.create_customer(&valid.customer).await {
        Ok(customer) => customer,
        Err(err) => {
            if let Some(redirect) = notify::surface_api_error(&ctx.session, &err).await {
                return Ok(redirect);
            }
            return Ok(render_new(&ctx, form, FieldErrors::new()).await);
        }
    };
    tracing::info!(customer_id = %customer.id, "Customer created");

    let mut failed = 0_usize;
    for address in &valid.addresses {
        if let Err(err) = ctx.api.add_address(customer.id, address).await {
            tracing::warn!(customer_id = %customer.id, error = %err, "Address not saved");
            if err.requires_logout()
                && let Some(redirect) = notify::surface_api_error(&ctx.session, &err).await
            {
                return Ok(redirect);
            }
            failed += 1;
        }
    }

    if failed == 0 {
        notify::success(&ctx.session, "Customer created", "Customer created successfully!").await;
    } else {
        notify::warning(
            &ctx.session,
            "Customer created",
            format!("Customer created, but {failed} address(es) could not be saved."),
        )
        .await;
    }
    Ok(Redirect::to(&format!("/customers/{}/edit", customer.id)).into_response())
}

struct EditState {
    form: CustomerForm,
    errors: FieldErrors,
    address_form: AddressInput,
    address_errors: FieldErrors,
}

async fn render_edit(ctx: &AuthContext, id: CustomerId, state: EditState) -> PageResult {
    let addresses = load(ctx, ctx.api.list_addresses(id).await)
        .await?
        .unwrap_or_default();
    let template = CustomerEditTemplate {
        page: Page::new(ctx, "/customers", &format!("Customer #{id}")).await,
        customer_id: id.to_string(),
        form: state.form,
        errors: state.errors,
        addresses: addresses.iter().map(|a| AddressView::new(id, a)).collect(),
        address_form: state.address_form,
        address_errors: state.address_errors,
    };
    Ok(render(&template).into_response())
}

/// Edit form with the customer's addresses.
#[instrument(skip(ctx))]
pub async fn edit(RequireAuth(ctx): RequireAuth, Path(id): Path<CustomerId>) -> PageResult {
    let customer = require(&ctx, ctx.api.get_customer(id).await, "/customers").await?;
    render_edit(
        &ctx,
        id,
        EditState {
            form: CustomerForm::from(&customer),
            errors: FieldErrors::new(),
            address_form: AddressInput::default(),
            address_errors: FieldErrors::new(),
        },
    )
    .await
}

/// Save customer details. Address rows are managed separately.
#[instrument(skip(ctx, pairs))]
pub async fn update(
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<CustomerId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let mut form = CustomerForm::from_pairs(&FormPairs::new(pairs));
    form.addresses.clear();

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return render_edit(
                &ctx,
                id,
                EditState {
                    form,
                    errors,
                    address_form: AddressInput::default(),
                    address_errors: FieldErrors::new(),
                },
            )
            .await;
        }
    };

    let back = format!("/customers/{id}/edit");
    Ok(after_mutation(
        &ctx,
        ctx.api.update_customer(id, &valid.update_request()).await,
        ("Customer updated", "Customer updated successfully!"),
        "/customers",
        &back,
    )
    .await)
}

/// Delete a customer.
#[instrument(skip(ctx))]
pub async fn delete(RequireAuth(ctx): RequireAuth, Path(id): Path<CustomerId>) -> PageResult {
    Ok(after_mutation(
        &ctx,
        ctx.api.delete_customer(id).await,
        ("Customer deleted", "Customer deleted successfully!"),
        "/customers",
        "/customers",
    )
    .await)
}

/// Add one address to an existing customer.
#[instrument(skip(ctx, input))]
pub async fn add_address(
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<CustomerId>,
    Form(input): Form<AddressInput>,
) -> PageResult {
    let request = match input.validate() {
        Ok(request) => request,
        Err(address_errors) => {
            let customer = require(&ctx, ctx.api.get_customer(id).await, "/customers").await?;
            return render_edit(
                &ctx,
                id,
                EditState {
                    form: CustomerForm::from(&customer),
                    errors: FieldErrors::new(),
                    address_form: input,
                    address_errors,
                },
            )
            .await;
        }
    };

    let back = format!("/customers/{id}/edit");
    Ok(after_mutation(
        &ctx,
        ctx.api.add_address(id, &request).await,
        ("Address added", "Address added successfully!"),
        &back,
        &back,
    )
    .await)
}

/// Remove an address.
#[instrument(skip(ctx))]
pub async fn delete_address(
    RequireAuth(ctx): RequireAuth,
    Path((id, address_id)): Path<(CustomerId, AddressId)>,
) -> PageResult {
    let back = format!("/customers/{id}/edit");
    Ok(after_mutation(
        &ctx,
        ctx.api.delete_address(address_id).await,
        ("Address removed", "Address removed successfully!"),
        &back,
        &back,
    )
    .await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_view_delete_href() {
        let address = Address {
            id: Some(AddressId::new(9)),
            customer_id: Some(CustomerId::new(2)),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "US".to_string(),
            is_default: true,
        };
        let view = AddressView::new(CustomerId::new(2), &address);
        assert_eq!(
            view.delete_href.as_deref(),
            Some("/customers/2/addresses/9/delete")
        );
        assert!(view.is_default);

        let unsaved = AddressView::new(CustomerId::new(2), &Address { id: None, ..address });
        assert!(unsaved.delete_href.is_none());
    }
}
