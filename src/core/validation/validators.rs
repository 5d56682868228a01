//! Reusable field validators
//!
//! Each validator receives the field name and its typed value and returns a
//! human-readable message on failure. Validators ignore value kinds they do
//! not apply to, so they can be stacked freely on one field.

use crate::core::field::FieldValue;
use crate::core::price::Price;

/// Validator: field is required (not null)
pub fn required() -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &FieldValue| {
        if value.is_null() {
            Err("is required".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: string must contain at least one non-whitespace character
pub fn not_blank() -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &FieldValue| match value.as_str() {
        Some(s) if s.trim().is_empty() => Err("must not be blank".to_string()),
        _ => Ok(()),
    }
}

/// Validator: string length (in characters) must not exceed `max`
pub fn max_length(
    max: usize,
) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &FieldValue| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len > max {
                return Err(format!(
                    "must not exceed {} characters (actual: {})",
                    max, len
                ));
            }
        }
        Ok(())
    }
}

/// Validator: integer must lie within `[min, max]`
pub fn int_range(
    min: i64,
    max: i64,
) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &FieldValue| match value.as_integer() {
        Some(v) if v < min || v > max => Err(format!(
            "must be between {} and {} (value: {})",
            min, max, v
        )),
        _ => Ok(()),
    }
}

/// Validator: integer must be at least `min`
pub fn min_int(min: i64) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &FieldValue| match value.as_integer() {
        Some(v) if v < min => Err(format!("must be at least {} (value: {})", min, v)),
        _ => Ok(()),
    }
}

/// Validator: decimal must lie within `[min, max]`
pub fn decimal_range(
    min: Price,
    max: Price,
) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &FieldValue| match value {
        FieldValue::Decimal(p) if *p < min || *p > max => Err(format!(
            "must be between {} and {} (value: {})",
            min, max, p
        )),
        _ => Ok(()),
    }
}
