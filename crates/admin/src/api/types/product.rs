//! Product and category records.

use orderdesk_core::{CategoryId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The product form always submits every field, so updates reuse the create body.
pub type UpdateProductRequest = CreateProductRequest;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateStockRequest {
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Optional filters for `GET /products`.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_decodes_from_number() {
        let product: Product = serde_json::from_str(
            r#"{"id": 3, "name": "Mug", "price": 12.5, "stockQuantity": 4, "createdAt": ""}"#,
        )
        .unwrap();
        assert_eq!(product.price, Decimal::new(125, 1));
        assert!(product.in_stock());
    }

    #[test]
    fn test_product_request_sends_price_as_number() {
        let body = serde_json::to_value(CreateProductRequest {
            name: "Mug".to_string(),
            description: None,
            price: Decimal::new(1999, 2),
            stock_quantity: 10,
            category_id: Some(CategoryId::new(2)),
            image_url: None,
        })
        .unwrap();
        assert!(body["price"].is_number());
        assert_eq!(body["stockQuantity"], 10);
        assert_eq!(body["categoryId"], 2);
        assert!(body.get("description").is_none());
    }
}
