//! Customer and address endpoints.

use orderdesk_core::{AddressId, CustomerId};
use tracing::instrument;

use super::endpoints::customers;
use super::{
    Address, ApiClient, ApiError, CreateAddressRequest, CreateCustomerRequest, Customer,
    MessageResponse, Page, UpdateCustomerRequest,
};

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_customers(&self, page: Page) -> Result<Vec<Customer>, ApiError> {
        self.get_with_query(
            customers::BASE,
            &[("offset", page.offset), ("limit", page.limit)],
        )
        .await
    }

    /// Fetch a customer together with their addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, ApiError> {
        self.get(&customers::by_id(id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> Result<Customer, ApiError> {
        self.post(customers::BASE, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        request: &UpdateCustomerRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&customers::by_id(id), request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<MessageResponse, ApiError> {
        self.delete(&customers::by_id(id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self, customer_id: CustomerId) -> Result<Vec<Address>, ApiError> {
        self.get(&customers::addresses(customer_id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn add_address(
        &self,
        customer_id: CustomerId,
        request: &CreateAddressRequest,
    ) -> Result<Address, ApiError> {
        self.post(&customers::addresses(customer_id), request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_address(&self, address_id: AddressId) -> Result<MessageResponse, ApiError> {
        self.delete(&customers::address(address_id)).await
    }
}
