//! Shared envelopes and lenient decoders.

use serde::{Deserialize, Deserializer, Serialize};

/// `{"message": ...}` returned by most mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// `{"error": ...}` returned by the backend on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Offset/limit pair used by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    #[must_use]
    pub const fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Page that starts `limit` rows later.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.offset.saturating_add(self.limit), self.limit)
    }

    /// Page that starts `limit` rows earlier, clamped at zero.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self::new(self.offset.saturating_sub(self.limit), self.limit)
    }

    #[must_use]
    pub const fn is_first(self) -> bool {
        self.offset == 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    String(String),
}

/// Accept `true`/`false` as a JSON boolean or as a string.
///
/// # Errors
///
/// Fails when the value is neither.
pub fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(value) => Ok(value),
        BoolOrString::String(value) => Ok(value.trim().eq_ignore_ascii_case("true")),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

/// Accept an identifier or count that may arrive as a string or a number.
///
/// # Errors
///
/// Fails when the value is neither.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => value,
        StringOrNumber::Integer(value) => value.to_string(),
        StringOrNumber::Float(value) => value.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Flag {
        #[serde(deserialize_with = "bool_or_string")]
        valid: bool,
    }

    #[derive(Deserialize)]
    struct Counted {
        #[serde(deserialize_with = "string_or_number")]
        affected: String,
    }

    #[test]
    fn test_bool_or_string() {
        let parse = |s: &str| serde_json::from_str::<Flag>(s).unwrap().valid;
        assert!(parse(r#"{"valid": true}"#));
        assert!(parse(r#"{"valid": "true"}"#));
        assert!(!parse(r#"{"valid": "false"}"#));
        assert!(!parse(r#"{"valid": false}"#));
        assert!(serde_json::from_str::<Flag>(r#"{"valid": 1}"#).is_err());
    }

    #[test]
    fn test_string_or_number() {
        let parse = |s: &str| serde_json::from_str::<Counted>(s).unwrap().affected;
        assert_eq!(parse(r#"{"affected": 3}"#), "3");
        assert_eq!(parse(r#"{"affected": "3"}"#), "3");
    }

    #[test]
    fn test_page_navigation() {
        let page = Page::new(0, 20);
        assert!(page.is_first());
        assert_eq!(page.next(), Page::new(20, 20));
        assert_eq!(Page::new(10, 20).previous(), Page::new(0, 20));
    }
}
