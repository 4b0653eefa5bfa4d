//! Form input parsing and validation.
//!
//! Every form keeps the raw strings the user typed so a failed submission
//! can be re-rendered unchanged. `validate()` either produces the backend
//! request or a [`FieldErrors`] map keyed by field name.

pub mod auth;
pub mod catalog;
pub mod customer;
pub mod order;
pub mod user;

pub use auth::{LoginForm, SignupForm};
pub use catalog::{CategoryForm, ProductForm, StockForm};
pub use customer::{AddressInput, CustomerForm, ValidCustomer};
pub use order::{OrderForm, OrderItemInput, OrderTotals, PricedLine, line_subtotal};
pub use user::{AccountStatusForm, PasswordForm, ProfileForm, UserCreateForm, UserEditForm};

/// Row index accepted by [`FieldErrors::row_first`], including the
/// (possibly nested) references askama templates pass.
pub trait RowIndex {
    fn row_index(&self) -> usize;
}

impl RowIndex for usize {
    fn row_index(&self) -> usize {
        *self
    }
}

impl<T: RowIndex + ?Sized> RowIndex for &T {
    fn row_index(&self) -> usize {
        (**self).row_index()
    }
}
use std::collections::BTreeMap;
use std::str::FromStr;

use orderdesk_core::Email;
use rust_decimal::Decimal;

/// Validation messages per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// First message for `field`, or an empty string.
    #[must_use]
    pub fn first(&self, field: &str) -> &str {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map_or("", String::as_str)
    }

    /// First message for field `field` of repeated row `index`.
    #[must_use]
    pub fn row_first(&self, prefix: &str, index: impl RowIndex, field: &str) -> String {
        self.first(&row_key(prefix, index.row_index(), field)).to_string()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Add every message from `other`.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(value)` when no field has errors.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field has errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Field name of a repeated row, e.g. `address-0-street`.
#[must_use]
pub fn row_key(prefix: &str, index: usize, field: &str) -> String {
    format!("{prefix}-{index}-{field}")
}

/// HTML checkbox value: present as `on`, `true`, or `1` when ticked.
#[must_use]
pub fn is_checked(value: &str) -> bool {
    matches!(value.trim(), "on" | "true" | "1")
}

/// Trimmed value, `None` when blank.
#[must_use]
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Required field with a minimum length. Returns the trimmed value when valid.
pub fn required_min_len(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if trimmed.chars().count() < min {
        errors.add(field, format!("{label} must be at least {min} characters"));
    }
    trimmed.to_string()
}

/// Required field. Returns the trimmed value.
pub fn required(errors: &mut FieldErrors, field: &str, label: &str, value: &str) -> String {
    required_min_len(errors, field, label, value, 0)
}

/// Password field: required and at least `min` characters. Not trimmed.
pub fn password(errors: &mut FieldErrors, field: &str, label: &str, value: &str, min: usize) {
    if value.is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if value.chars().count() < min {
        errors.add(field, format!("{label} must be at least {min} characters"));
    }
}

/// Confirmation field: required and equal to `original`.
pub fn confirmation(errors: &mut FieldErrors, field: &str, original: &str, confirm: &str) {
    if confirm.is_empty() {
        errors.add(field, "Please confirm the password");
    } else if original != confirm {
        errors.add(field, "Passwords do not match");
    }
}

/// Required email address. Returns the trimmed value.
pub fn email(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "Email is required");
    } else if Email::parse(trimmed).is_err() {
        errors.add(field, "Please enter a valid email address");
    }
    trimmed.to_string()
}

/// Required value parsed with `FromStr`.
pub fn parsed<T: FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<T> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
        return None;
    }
    trimmed.parse().map_or_else(
        |_| {
            errors.add(field, format!("{label} is invalid"));
            None
        },
        Some,
    )
}

/// Required decimal, at least `min`.
pub fn decimal_at_least(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    min: Decimal,
) -> Option<Decimal> {
    let amount: Decimal = parsed(errors, field, label, value)?;
    if amount < min {
        errors.add(field, format!("{label} must be at least {min}"));
        return None;
    }
    Some(amount)
}

/// Required integer, at least `min`.
pub fn integer_at_least(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    min: i64,
) -> Option<i64> {
    let number: i64 = parsed(errors, field, label, value)?;
    if number < min {
        errors.add(field, format!("{label} must be at least {min}"));
        return None;
    }
    Some(number)
}

/// Required integer within `min..=max`.
pub fn integer_between(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    (min, max): (i64, i64),
) -> Option<i64> {
    let number = integer_at_least(errors, field, label, value, min)?;
    if number > max {
        errors.add(field, format!("{label} must be at most {max}"));
        return None;
    }
    Some(number)
}

/// Submitted `(name, value)` pairs, as sent by forms with repeated rows.
///
/// Rows are named `<prefix>-<index>-<field>`, e.g. `address-0-street`.
#[derive(Debug, Clone, Default)]
pub struct FormPairs(Vec<(String, String)>);

impl FormPairs {
    #[must_use]
    pub const fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Last value submitted under `name`, or an empty string.
    #[must_use]
    pub fn value(&self, name: &str) -> String {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    /// Every value submitted under `name`, in order. Used for checkbox groups.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Sorted, de-duplicated row indexes under `prefix`.
    #[must_use]
    pub fn row_indexes(&self, prefix: &str) -> Vec<usize> {
        let start = format!("{prefix}-");
        let mut indexes: Vec<usize> = self
            .0
            .iter()
            .filter_map(|(key, _)| {
                let rest = key.strip_prefix(&start)?;
                let (index, _) = rest.split_once('-')?;
                index.parse().ok()
            })
            .collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes
    }

    #[must_use]
    pub fn row_value(&self, prefix: &str, index: usize, field: &str) -> String {
        self.value(&row_key(prefix, index, field))
    }
}

/// What a repeated-row form submission asks for.
///
/// The submit button's `intent` value picks one; forms without scripts use
/// it to add and remove rows by re-rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIntent {
    Save,
    AddRow,
    RemoveRow(usize),
    Recalculate,
}

impl FormIntent {
    /// `add_address` / `add_item` add; `remove_<anything>_<n>` removes row `n`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("add_") {
            return Self::AddRow;
        }
        if raw == "recalculate" {
            return Self::Recalculate;
        }
        if let Some(rest) = raw.strip_prefix("remove_")
            && let Some(index) = rest.rsplit('_').next().and_then(|n| n.parse().ok())
        {
            return Self::RemoveRow(index);
        }
        Self::Save
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());
        errors.add("email", "Email is required");
        errors.add("email", "second");
        assert!(errors.has("email"));
        assert_eq!(errors.first("email"), "Email is required");
        assert_eq!(errors.first("name"), "");
        assert_eq!(errors.get("email").len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_row_first_accepts_template_references() {
        let mut errors = FieldErrors::new();
        errors.add(row_key("address", 1, "city"), "City is required");
        let index = 1_usize;
        assert_eq!(errors.row_first("address", &index, "city"), "City is required");
        assert_eq!(errors.row_first("address", index, "city"), "City is required");
        assert_eq!(errors.row_first("address", &0_usize, "city"), "");
    }

    #[test]
    fn test_required_min_len() {
        let mut errors = FieldErrors::new();
        required_min_len(&mut errors, "username", "Username", "  ", 3);
        assert_eq!(errors.first("username"), "Username is required");

        let mut errors = FieldErrors::new();
        required_min_len(&mut errors, "username", "Username", "ab", 3);
        assert_eq!(errors.first("username"), "Username must be at least 3 characters");

        let mut errors = FieldErrors::new();
        let value = required_min_len(&mut errors, "username", "Username", " abc ", 3);
        assert!(errors.is_empty());
        assert_eq!(value, "abc");
    }

    #[test]
    fn test_numeric_rules() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            decimal_at_least(&mut errors, "price", "Price", "-1", Decimal::ZERO),
            None
        );
        assert_eq!(
            decimal_at_least(&mut errors, "other", "Other", "x", Decimal::ZERO),
            None
        );
        assert_eq!(errors.first("other"), "Other is invalid");
        assert_eq!(
            integer_at_least(&mut errors, "qty", "Quantity", "0", 0),
            Some(0)
        );
        assert!(errors.has("price"));
        assert!(!errors.has("qty"));
    }

    #[test]
    fn test_form_pairs_rows() {
        let pairs = FormPairs::new(vec![
            ("address-2-street".to_string(), "b".to_string()),
            ("address-0-street".to_string(), "a".to_string()),
            ("address-0-city".to_string(), "x".to_string()),
            ("first_name".to_string(), "Ana".to_string()),
        ]);
        assert_eq!(pairs.row_indexes("address"), vec![0, 2]);
        assert_eq!(pairs.row_value("address", 2, "street"), "b");
        assert_eq!(pairs.value("first_name"), "Ana");
        assert_eq!(pairs.value("missing"), "");
    }

    #[test]
    fn test_form_intent() {
        assert_eq!(FormIntent::parse("add_item"), FormIntent::AddRow);
        assert_eq!(FormIntent::parse("remove_address_3"), FormIntent::RemoveRow(3));
        assert_eq!(FormIntent::parse("recalculate"), FormIntent::Recalculate);
        assert_eq!(FormIntent::parse(""), FormIntent::Save);
        assert_eq!(FormIntent::parse("save"), FormIntent::Save);
    }
}
