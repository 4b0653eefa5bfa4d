//! Order route handlers.
//!
//! Listing, creation, detail, direct status changes, and the lifecycle
//! transitions with their confirmation pages.

mod actions;
mod create;
mod detail;
mod list;
pub mod types;

pub use types::{OrderDetailView, OrderRowView, OrdersQuery, PaymentRowView, StatusOption};

pub use list::{OrdersIndexTemplate, index};

pub use create::{CreateQuery, OrderCreateTemplate, create, new};

pub use detail::{OrderShowTemplate, StatusFormInput, show, update_status};

pub use actions::{ActionFormInput, OrderActionTemplate, confirm_page, perform};
