//! Customer form with repeated address rows.

use serde::Deserialize;

use crate::api::{CreateAddressRequest, CreateCustomerRequest, Customer, UpdateCustomerRequest};

use super::{FieldErrors, FormIntent, FormPairs, email, is_checked, non_blank, required, row_key};

const ADDRESS_PREFIX: &str = "address";

/// One address as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    /// Checkbox value; ticked when `on`.
    #[serde(default)]
    pub is_default: String,
}

impl AddressInput {
    #[must_use]
    pub fn is_default(&self) -> bool {
        is_checked(&self.is_default)
    }

    /// Validate into `errors`, naming fields with `field_name`.
    fn check(
        &self,
        errors: &mut FieldErrors,
        field_name: impl Fn(&str) -> String,
    ) -> CreateAddressRequest {
        CreateAddressRequest {
            street: required(errors, &field_name("street"), "Street", &self.street),
            city: required(errors, &field_name("city"), "City", &self.city),
            state: required(errors, &field_name("state"), "State", &self.state),
            postal_code: required(
                errors,
                &field_name("postal_code"),
                "Postal code",
                &self.postal_code,
            ),
            country: required(errors, &field_name("country"), "Country", &self.country),
            is_default: self.is_default(),
        }
    }

    /// Validate a standalone address form.
    ///
    /// # Errors
    ///
    /// Returns the field errors when a required field is blank.
    pub fn validate(&self) -> Result<CreateAddressRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let request = self.check(&mut errors, str::to_owned);
        errors.into_result(request)
    }
}

/// Validated customer and the addresses to create with it.
#[derive(Debug, Clone)]
pub struct ValidCustomer {
    pub customer: CreateCustomerRequest,
    pub addresses: Vec<CreateAddressRequest>,
}

impl ValidCustomer {
    #[must_use]
    pub fn update_request(&self) -> UpdateCustomerRequest {
        UpdateCustomerRequest {
            first_name: Some(self.customer.first_name.clone()),
            last_name: Some(self.customer.last_name.clone()),
            email: Some(self.customer.email.clone()),
            phone: self.customer.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// New addresses to add on save.
    pub addresses: Vec<AddressInput>,
}

impl CustomerForm {
    /// Read the customer fields and every `address-<n>-<field>` row.
    #[must_use]
    pub fn from_pairs(pairs: &FormPairs) -> Self {
        let addresses = pairs
            .row_indexes(ADDRESS_PREFIX)
            .into_iter()
            .map(|i| AddressInput {
                street: pairs.row_value(ADDRESS_PREFIX, i, "street"),
                city: pairs.row_value(ADDRESS_PREFIX, i, "city"),
                state: pairs.row_value(ADDRESS_PREFIX, i, "state"),
                postal_code: pairs.row_value(ADDRESS_PREFIX, i, "postal_code"),
                country: pairs.row_value(ADDRESS_PREFIX, i, "country"),
                is_default: pairs.row_value(ADDRESS_PREFIX, i, "is_default"),
            })
            .collect();

        Self {
            first_name: pairs.value("first_name"),
            last_name: pairs.value("last_name"),
            email: pairs.value("email"),
            phone: pairs.value("phone"),
            addresses,
        }
    }

    /// Apply an add/remove row intent. Returns `true` when the form should
    /// be re-rendered instead of saved.
    pub fn apply_intent(&mut self, intent: FormIntent) -> bool {
        match intent {
            FormIntent::AddRow => {
                self.addresses.push(AddressInput::default());
                true
            }
            FormIntent::RemoveRow(index) => {
                if index < self.addresses.len() {
                    self.addresses.remove(index);
                }
                true
            }
            FormIntent::Recalculate => true,
            FormIntent::Save => false,
        }
    }

    /// # Errors
    ///
    /// Returns the field errors when the customer or any address is invalid.
    pub fn validate(&self) -> Result<ValidCustomer, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first_name = required(&mut errors, "first_name", "First name", &self.first_name);
        let last_name = required(&mut errors, "last_name", "Last name", &self.last_name);
        let email = email(&mut errors, "email", &self.email);

        let addresses = self
            .addresses
            .iter()
            .enumerate()
            .map(|(i, address)| {
                address.check(&mut errors, |field| row_key(ADDRESS_PREFIX, i, field))
            })
            .collect();

        errors.into_result(ValidCustomer {
            customer: CreateCustomerRequest {
                first_name,
                last_name,
                email,
                phone: non_blank(&self.phone),
            },
            addresses,
        })
    }
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone().unwrap_or_default(),
            addresses: Vec::new(),
        }
    }
}
