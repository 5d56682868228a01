//! Declarative field validation
//!
//! A [`ValidationConfig`] lists, per field, the validators that must hold.
//! Values are looked up through a closure so the same rules apply to a
//! finished [`Item`](crate::core::item::Item) or to any other field source.

pub mod validators;

use crate::core::error::FieldValidationError;
use crate::core::field::FieldValue;

type FieldValidator = Box<dyn Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync>;

/// Ordered set of validation rules
#[derive(Default)]
pub struct ValidationConfig {
    rules: Vec<(&'static str, FieldValidator)>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Attach a validator to a field. Rules run in insertion order.
    pub fn field<V>(mut self, field: &'static str, validator: V) -> Self
    where
        V: Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push((field, Box::new(validator)));
        self
    }

    /// Run every rule. Only the first failure of each field is reported.
    pub fn validate<F>(&self, lookup: F) -> Result<(), Vec<FieldValidationError>>
    where
        F: Fn(&str) -> FieldValue,
    {
        let mut errors: Vec<FieldValidationError> = Vec::new();

        for (field, validator) in &self.rules {
            if errors.iter().any(|e| e.field == *field) {
                continue;
            }
            let value = lookup(field);
            if let Err(message) = validator(field, &value) {
                errors.push(FieldValidationError::new(*field, message));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
