//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Email, Error};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: &str, value: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code,
    }))
}

/// Parse a UUID path or body value, reporting the offending field.
pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        invalid_value(
            field,
            "invalid_uuid",
            value,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

/// Parse an email path or body value, reporting the offending field.
pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<Email, Error> {
    Email::new(value).map_err(|err| {
        invalid_value(
            field,
            "invalid_email",
            value,
            format!("{}: {err}", field.as_str()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_uuid_names_the_field() {
        let error = parse_uuid("not-a-uuid", FieldName::new("classId")).expect_err("invalid");
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], json!("classId"));
        assert_eq!(details["code"], json!("invalid_uuid"));
    }

    #[test]
    fn valid_email_parses() {
        let email = parse_email("ada@example.com", FieldName::new("email")).expect("valid");
        assert_eq!(email.as_ref(), "ada@example.com");
    }

    #[test]
    fn invalid_email_names_the_field() {
        let error = parse_email("nope", FieldName::new("email")).expect_err("invalid");
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], json!("email"));
    }
}
