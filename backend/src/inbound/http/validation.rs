//! Request validation helpers producing `400` errors with field details.
//!
//! Details always carry `field` and `code`; list failures add the offending
//! `index` and `value` so clients can point at the bad element.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Machine-readable validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    TooMany,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::TooMany => "too_many",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_at(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must contain valid UUIDs")).with_details(json!({
        "field": field,
        "index": index,
        "value": value,
        "code": ValidationCode::InvalidUuid.as_str(),
    }))
}

/// Reject `values` when it holds more than `max` elements.
pub(crate) fn ensure_max_len<T>(values: &[T], field: FieldName, max: usize) -> Result<(), Error> {
    if values.len() <= max {
        return Ok(());
    }
    let name = field.as_str();
    Err(
        Error::invalid_request(format!("{name} must contain at most {max} entries")).with_details(
            json!({
                "field": name,
                "code": ValidationCode::TooMany.as_str(),
                "max": max,
                "count": values.len(),
            }),
        ),
    )
}

/// Parse every element of `values`, failing on the first malformed one.
pub(crate) fn parse_uuid_list(values: Vec<String>, field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_at(field, index, &value))
        })
        .collect()
}
