//! Product, stock, and category endpoints.

use orderdesk_core::{CategoryId, ProductId};
use tracing::instrument;

use super::endpoints::{categories, products};
use super::{
    ApiClient, ApiError, Category, CreateCategoryRequest, CreateProductRequest, MessageResponse,
    Page, Product, ProductFilter, UpdateProductRequest, UpdateStockRequest,
};

impl ApiClient {
    /// List products, optionally filtered by a search term and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: Page,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, ApiError> {
        let mut query = vec![
            ("offset", page.offset.to_string()),
            ("limit", page.limit.to_string()),
        ];
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            query.push(("categoryId", category_id.to_string()));
        }
        self.get_with_query(products::BASE, &query).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get(&products::by_id(id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        self.post(products::BASE, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&products::by_id(id), request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<MessageResponse, ApiError> {
        self.delete(&products::by_id(id)).await
    }

    /// Set the absolute stock quantity of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_stock(
        &self,
        id: ProductId,
        quantity: i64,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&products::stock(id), &UpdateStockRequest { quantity })
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get(categories::BASE).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<Category, ApiError> {
        self.post(categories::BASE, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<MessageResponse, ApiError> {
        self.delete(&categories::by_id(id)).await
    }
}
