use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ValidationError;
use crate::field::{EditableField, FieldValue};

/// One record kind of the document store, edited one field at a time.
pub trait Resource:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Field: EditableField;

    /// Collection path segment under `/api/`.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn field_value(&self, field: Self::Field) -> FieldValue;

    /// Writes `value` into `field`; fails if the value has the wrong shape.
    fn set_field(&mut self, field: Self::Field, value: FieldValue) -> Result<(), ValidationError>;

    /// One-line description used by list renderings and log lines.
    fn summary(&self) -> String;

    /// Checks a whole record, as stored documents must satisfy it.
    fn validate(&self) -> Result<(), ValidationError> {
        require("id", self.id())
    }
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_price(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidNumber {
            field: field.to_string(),
            input: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn mismatch<F: EditableField>(field: F) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.key().to_string(),
    }
}
