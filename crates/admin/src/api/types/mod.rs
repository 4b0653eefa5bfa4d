//! Request and response records exchanged with the REST backend.
//!
//! Field names follow the backend's camelCase JSON. Amounts are decoded into
//! `Decimal` and sent back as JSON numbers.

pub mod common;
pub mod customer;
pub mod order;
pub mod payment;
pub mod product;
pub mod report;
pub mod user;

pub use common::*;
pub use customer::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use report::*;
pub use user::*;
