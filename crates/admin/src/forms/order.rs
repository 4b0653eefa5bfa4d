//! Order form with repeated item rows and a server-side running total.

use std::borrow::Borrow;

use orderdesk_core::{CustomerId, ProductId};
use rust_decimal::Decimal;

use crate::api::{CreateOrderRequest, OrderLine, Product};

use super::{FieldErrors, FormIntent, FormPairs, integer_between, parsed, row_key};

const ITEM_PREFIX: &str = "item";

/// Largest quantity accepted for a single item row.
pub const MAX_ITEM_QUANTITY: i64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: String,
}

impl Default for OrderItemInput {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            quantity: "1".to_string(),
        }
    }
}

impl OrderItemInput {
    #[must_use]
    pub fn is_product(&self, id: impl Borrow<ProductId>) -> bool {
        self.product_id.trim() == id.borrow().to_string()
    }
}

/// One item row priced against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// `None` when the amount does not fit in a `Decimal`.
    pub subtotal: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderTotals {
    /// One entry per item row, in row order.
    pub lines: Vec<PricedLine>,
    /// `None` when any subtotal or the sum overflows.
    pub total: Option<Decimal>,
}

impl OrderTotals {
    /// Errors for rows whose amounts could not be computed.
    #[must_use]
    pub fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (i, line) in self.lines.iter().enumerate() {
            if line.subtotal.is_none() {
                errors.add(
                    row_key(ITEM_PREFIX, i, "quantity"),
                    "Subtotal is too large",
                );
            }
        }
        if self.total.is_none() {
            errors.add("items", "Order total is too large");
        }
        errors
    }
}

/// `unit_price * quantity`, or `None` on overflow.
#[must_use]
pub fn line_subtotal(unit_price: Decimal, quantity: i64) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

#[derive(Debug, Clone)]
pub struct OrderForm {
    pub customer_id: String,
    pub items: Vec<OrderItemInput>,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            items: vec![OrderItemInput::default()],
        }
    }
}

impl OrderForm {
    /// Read `customer_id` and every `item-<n>-<field>` row.
    #[must_use]
    pub fn from_pairs(pairs: &FormPairs) -> Self {
        let items = pairs
            .row_indexes(ITEM_PREFIX)
            .into_iter()
            .map(|i| OrderItemInput {
                product_id: pairs.row_value(ITEM_PREFIX, i, "product_id"),
                quantity: pairs.row_value(ITEM_PREFIX, i, "quantity"),
            })
            .collect();

        Self {
            customer_id: pairs.value("customer_id"),
            items,
        }
    }

    #[must_use]
    pub fn is_customer(&self, id: impl Borrow<CustomerId>) -> bool {
        self.customer_id.trim() == id.borrow().to_string()
    }

    /// Apply an add/remove/recalculate intent. Returns `true` when the form
    /// should be re-rendered instead of saved.
    pub fn apply_intent(&mut self, intent: FormIntent) -> bool {
        match intent {
            FormIntent::AddRow => {
                self.items.push(OrderItemInput::default());
                true
            }
            FormIntent::RemoveRow(index) => {
                if index < self.items.len() {
                    self.items.remove(index);
                }
                true
            }
            FormIntent::Recalculate => true,
            FormIntent::Save => false,
        }
    }

    /// Price every row. Rows without a known product or with a quantity
    /// outside `1..=MAX_ITEM_QUANTITY` contribute zero.
    #[must_use]
    pub fn totals(&self, products: &[Product]) -> OrderTotals {
        let lines: Vec<PricedLine> = self
            .items
            .iter()
            .map(|item| {
                let product = products.iter().find(|p| item.is_product(p.id));
                let quantity = item
                    .quantity
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|q| (1..=MAX_ITEM_QUANTITY).contains(q))
                    .unwrap_or(0);
                let unit_price = product.map_or(Decimal::ZERO, |p| p.price);
                PricedLine {
                    product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    quantity,
                    unit_price,
                    subtotal: line_subtotal(unit_price, quantity),
                }
            })
            .collect();
        let total = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
            line.subtotal.and_then(|subtotal| sum.checked_add(subtotal))
        });
        OrderTotals { lines, total }
    }

    /// # Errors
    ///
    /// Returns the field errors when the customer is missing, there are no
    /// items, or any item is incomplete.
    pub fn validate(&self) -> Result<CreateOrderRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let customer_id: Option<CustomerId> =
            parsed(&mut errors, "customer_id", "Customer", &self.customer_id);

        if self.items.is_empty() {
            errors.add("items", "Add at least one item");
        }

        let mut lines = Vec::with_capacity(self.items.len());
        for (i, item) in self.items.iter().enumerate() {
            let product_id: Option<ProductId> = parsed(
                &mut errors,
                &row_key(ITEM_PREFIX, i, "product_id"),
                "Product",
                &item.product_id,
            );
            let quantity = integer_between(
                &mut errors,
                &row_key(ITEM_PREFIX, i, "quantity"),
                "Quantity",
                &item.quantity,
                (1, MAX_ITEM_QUANTITY),
            );
            if let (Some(product_id), Some(quantity)) = (product_id, quantity) {
                lines.push(OrderLine {
                    product_id,
                    quantity,
                });
            }
        }

        match customer_id {
            Some(customer_id) if errors.is_empty() => Ok(CreateOrderRequest {
                customer_id,
                items: lines,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: None,
            price,
            stock_quantity: 10,
            category_id: None,
            category_name: None,
            image_url: None,
            created_at: String::new(),
        }
    }

    fn form(items: &[(&str, &str)]) -> OrderForm {
        OrderForm {
            customer_id: "3".to_string(),
            items: items
                .iter()
                .map(|(product_id, quantity)| OrderItemInput {
                    product_id: (*product_id).to_string(),
                    quantity: (*quantity).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_totals() {
        let products = vec![
            product(1, "Mug", Decimal::new(1250, 2)),
            product(2, "Tee", Decimal::new(2000, 2)),
        ];
        let totals = form(&[("1", "2"), ("2", "1"), ("", "4")]).totals(&products);
        assert_eq!(totals.lines[0].subtotal, Some(Decimal::new(2500, 2)));
        assert_eq!(totals.lines[1].subtotal, Some(Decimal::new(2000, 2)));
        assert_eq!(totals.lines[2].subtotal, Some(Decimal::ZERO));
        assert_eq!(totals.total, Some(Decimal::new(4500, 2)));
        assert!(totals.errors().is_empty());
    }

    #[test]
    fn test_totals_with_huge_amounts_do_not_panic() {
        let products = vec![
            product(1, "Yacht", Decimal::new(100_000_000_000, 0)),
            product(2, "Fleet", Decimal::MAX),
        ];

        // Quantities beyond the cap are not priced.
        let totals = form(&[("1", "9223372036854775807")]).totals(&products);
        assert_eq!(totals.lines[0].quantity, 0);
        assert_eq!(totals.total, Some(Decimal::ZERO));

        let totals = form(&[("2", "2")]).totals(&products);
        assert_eq!(totals.lines[0].subtotal, None);
        assert_eq!(totals.total, None);
        let errors = totals.errors();
        assert_eq!(errors.row_first("item", 0_usize, "quantity"), "Subtotal is too large");
        assert_eq!(errors.first("items"), "Order total is too large");

        let totals = form(&[("2", "1"), ("2", "1")]).totals(&products);
        assert_eq!(totals.lines[1].subtotal, Some(Decimal::MAX));
        assert_eq!(totals.total, None);
    }

    #[test]
    fn test_quantity_is_capped() {
        let errors = form(&[("1", "9223372036854775807")])
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.row_first("item", 0_usize, "quantity"),
            format!("Quantity must be at most {MAX_ITEM_QUANTITY}")
        );
        assert!(form(&[("1", "10000")]).validate().is_ok());
    }

    #[test]
    fn test_valid_order() {
        let request = form(&[("1", "2"), ("5", "1")]).validate().unwrap();
        assert_eq!(request.customer_id, CustomerId::new(3));
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].quantity, 2);
    }

    #[test]
    fn test_order_rules() {
        let mut order = form(&[("", "0")]);
        order.customer_id = String::new();
        let errors = order.validate().unwrap_err();
        assert_eq!(errors.first("customer_id"), "Customer is required");
        assert_eq!(errors.row_first("item", 0_usize, "product_id"), "Product is required");
        assert_eq!(errors.row_first("item", 0_usize, "quantity"), "Quantity must be at least 1");

        let errors = form(&[]).validate().unwrap_err();
        assert_eq!(errors.first("items"), "Add at least one item");
    }

    #[test]
    fn test_from_pairs_and_intents() {
        let pairs = FormPairs::new(vec![
            ("customer_id".to_string(), "3".to_string()),
            ("item-0-product_id".to_string(), "1".to_string()),
            ("item-0-quantity".to_string(), "2".to_string()),
            ("item-1-product_id".to_string(), "2".to_string()),
            ("item-1-quantity".to_string(), "1".to_string()),
        ]);
        let mut order = OrderForm::from_pairs(&pairs);
        assert_eq!(order.items.len(), 2);
        assert!(order.is_customer(CustomerId::new(3)));
        assert!(order.is_customer(&CustomerId::new(3)));
        assert!(order.items[1].is_product(&ProductId::new(2)));
        assert!(order.apply_intent(FormIntent::RemoveRow(0)));
        assert_eq!(order.items[0].product_id, "2");
        assert!(order.apply_intent(FormIntent::AddRow));
        assert_eq!(order.items[1].quantity, "1");
    }
}
