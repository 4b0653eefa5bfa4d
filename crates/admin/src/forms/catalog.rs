//! Product, stock, and category forms.

use orderdesk_core::CategoryId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::{CreateCategoryRequest, CreateProductRequest, Product};

use super::{FieldErrors, decimal_at_least, integer_at_least, non_blank, parsed, required};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryForm {
    /// # Errors
    ///
    /// Returns the field errors when the name is blank.
    pub fn validate(&self) -> Result<CreateCategoryRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", "Name", &self.name);
        errors.into_result(CreateCategoryRequest {
            name,
            description: non_blank(&self.description),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock_quantity: String,
    /// Empty for "no category".
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub image_url: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: "0".to_string(),
            stock_quantity: "0".to_string(),
            category_id: String::new(),
            image_url: String::new(),
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.normalize().to_string(),
            stock_quantity: product.stock_quantity.to_string(),
            category_id: product
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }
}

impl ProductForm {
    /// # Errors
    ///
    /// Returns the field errors when the input is invalid.
    pub fn validate(&self) -> Result<CreateProductRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", "Name", &self.name);
        let price = decimal_at_least(&mut errors, "price", "Price", &self.price, Decimal::ZERO);
        let stock_quantity = integer_at_least(
            &mut errors,
            "stock_quantity",
            "Stock quantity",
            &self.stock_quantity,
            0,
        );
        let category_id = if self.category_id.trim().is_empty() {
            None
        } else {
            parsed::<CategoryId>(&mut errors, "category_id", "Category", &self.category_id)
        };

        match (price, stock_quantity) {
            (Some(price), Some(stock_quantity)) if errors.is_empty() => Ok(CreateProductRequest {
                name,
                description: non_blank(&self.description),
                price,
                stock_quantity,
                category_id,
                image_url: non_blank(&self.image_url),
            }),
            _ => Err(errors),
        }
    }

    /// Whether `id` is the selected category, for `<select>` rendering.
    #[must_use]
    pub fn is_category(&self, id: Option<CategoryId>) -> bool {
        id.is_some_and(|id| self.category_id.trim() == id.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockForm {
    #[serde(default)]
    pub quantity: String,
}

impl StockForm {
    /// # Errors
    ///
    /// Returns the field errors when the quantity is missing or negative.
    pub fn validate(&self) -> Result<i64, FieldErrors> {
        let mut errors = FieldErrors::new();
        integer_at_least(&mut errors, "quantity", "Quantity", &self.quantity, 0).ok_or(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_required() {
        let errors = CategoryForm::default().validate().unwrap_err();
        assert_eq!(errors.first("name"), "Name is required");

        let request = CategoryForm {
            name: " Mugs ".to_string(),
            description: String::new(),
        }
        .validate()
        .unwrap();
        assert_eq!(request.name, "Mugs");
        assert!(request.description.is_none());
    }

    #[test]
    fn test_product_rules() {
        let form = ProductForm {
            name: String::new(),
            price: "-0.01".to_string(),
            stock_quantity: "-1".to_string(),
            ..ProductForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("price"));
        assert!(errors.has("stock_quantity"));
    }

    #[test]
    fn test_product_valid_with_zero_values() {
        let form = ProductForm {
            name: "Sticker".to_string(),
            category_id: "4".to_string(),
            ..ProductForm::default()
        };
        let request = form.validate().unwrap();
        assert_eq!(request.price, Decimal::ZERO);
        assert_eq!(request.stock_quantity, 0);
        assert_eq!(request.category_id, Some(CategoryId::new(4)));
        assert!(form.is_category(Some(CategoryId::new(4))));
    }

    #[test]
    fn test_stock_form() {
        assert_eq!(
            StockForm {
                quantity: "12".to_string()
            }
            .validate()
            .unwrap(),
            12
        );
        assert!(StockForm::default().validate().is_err());
        assert!(
            StockForm {
                quantity: "-3".to_string()
            }
            .validate()
            .is_err()
        );
    }
}
