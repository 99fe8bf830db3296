//! Field validation shared by create and update.
//!
//! Rules run in a fixed precedence (name, price, quantity, supplier name,
//! supplier email) and the first failure wins. Image and supplier phone are
//! never checked. Email format is deliberately not checked.

use crate::contract::Column;
use crate::error::{DbError, Result};
use crate::types::{FieldSet, Value};

/// Whether every required field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Insert: a missing required field counts as null.
    Create,
    /// Partial update: only present fields are checked.
    Update,
}

const CHECKED: [(Column, fn(&Value) -> std::result::Result<(), &'static str>); 5] = [
    (Column::Name, non_blank_text),
    (Column::Price, non_negative_number),
    (Column::Quantity, non_negative_integer),
    (Column::SupplierName, non_blank_text),
    (Column::SupplierEmail, non_blank_text),
];

/// Validate a field set. Returns the first failing field.
pub(crate) fn validate(fields: &FieldSet, mode: Mode) -> Result<()> {
    for (column, check) in CHECKED {
        match fields.get(column) {
            Some(value) => check(value).map_err(|reason| DbError::validation(column, reason))?,
            None if mode == Mode::Create => {
                return Err(DbError::validation(column, "is required"));
            }
            None => {}
        }
    }

    if fields.contains(Column::Id) {
        return Err(DbError::validation(Column::Id, "id is assigned by the store"));
    }

    Ok(())
}

fn non_blank_text(value: &Value) -> std::result::Result<(), &'static str> {
    match value {
        Value::Null => Err("is required"),
        Value::Text(s) if s.trim().is_empty() => Err("must not be empty"),
        Value::Text(_) => Ok(()),
        _ => Err("must be text"),
    }
}

fn non_negative_number(value: &Value) -> std::result::Result<(), &'static str> {
    match value {
        Value::Null => Err("is required"),
        Value::Integer(v) if *v < 0 => Err("must not be negative"),
        Value::Integer(_) => Ok(()),
        Value::Real(v) if v.is_nan() => Err("must be a number"),
        Value::Real(v) if *v < 0.0 => Err("must not be negative"),
        Value::Real(_) => Ok(()),
        Value::Text(_) => Err("must be a number"),
    }
}

fn non_negative_integer(value: &Value) -> std::result::Result<(), &'static str> {
    match value {
        Value::Null => Err("is required"),
        Value::Integer(v) if *v < 0 => Err("must not be negative"),
        Value::Integer(_) => Ok(()),
        _ => Err("must be a whole number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FieldSet {
        FieldSet::new()
            .name("Fern")
            .price(1.0)
            .quantity(1)
            .supplier_name("S")
            .supplier_email("e@x.com")
    }

    fn failing_field(fields: &FieldSet, mode: Mode) -> Option<Column> {
        validate(fields, mode).err().and_then(|e| e.field())
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(validate(&valid(), Mode::Create).is_ok());
    }

    #[test]
    fn test_blank_name_fails() {
        assert_eq!(failing_field(&valid().name(""), Mode::Create), Some(Column::Name));
        assert_eq!(failing_field(&valid().name("   "), Mode::Create), Some(Column::Name));
        assert_eq!(
            failing_field(&valid().set(Column::Name, Value::Null), Mode::Update),
            Some(Column::Name)
        );
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(failing_field(&valid().price(-1.0), Mode::Create), Some(Column::Price));
        assert_eq!(failing_field(&valid().price(f64::NAN), Mode::Create), Some(Column::Price));
        assert_eq!(
            failing_field(&valid().set(Column::Price, "4.50"), Mode::Create),
            Some(Column::Price)
        );
        assert!(validate(&valid().price(0.0), Mode::Create).is_ok());
        assert!(validate(&valid().set(Column::Price, 3), Mode::Create).is_ok());
    }

    #[test]
    fn test_quantity_rules() {
        assert_eq!(failing_field(&valid().quantity(-1), Mode::Create), Some(Column::Quantity));
        assert_eq!(
            failing_field(&valid().set(Column::Quantity, 1.5), Mode::Create),
            Some(Column::Quantity)
        );
        // The store does not cap stock; that is a UI rule.
        assert!(validate(&valid().quantity(1_000_000), Mode::Create).is_ok());
    }

    #[test]
    fn test_precedence_reports_first_failure() {
        let fields = FieldSet::new()
            .name("")
            .price(-1.0)
            .quantity(-1)
            .supplier_name("")
            .supplier_email("");
        assert_eq!(failing_field(&fields, Mode::Create), Some(Column::Name));

        let fields = fields.name("Fern");
        assert_eq!(failing_field(&fields, Mode::Create), Some(Column::Price));

        let fields = fields.price(2.0).quantity(2);
        assert_eq!(failing_field(&fields, Mode::Create), Some(Column::SupplierName));

        let fields = fields.supplier_name("S");
        assert_eq!(failing_field(&fields, Mode::Create), Some(Column::SupplierEmail));
    }

    #[test]
    fn test_create_requires_every_required_field() {
        let missing_email = FieldSet::new()
            .name("Fern")
            .price(1.0)
            .quantity(1)
            .supplier_name("S");
        assert_eq!(failing_field(&missing_email, Mode::Create), Some(Column::SupplierEmail));
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert!(validate(&FieldSet::new().quantity(3), Mode::Update).is_ok());
        assert!(validate(&FieldSet::new(), Mode::Update).is_ok());
        assert_eq!(
            failing_field(&FieldSet::new().supplier_email(" "), Mode::Update),
            Some(Column::SupplierEmail)
        );
    }

    #[test]
    fn test_optional_fields_accept_anything() {
        let fields = valid()
            .image("")
            .set(Column::SupplierPhone, Value::Null);
        assert!(validate(&fields, Mode::Create).is_ok());
        assert!(validate(&valid().supplier_email("not-an-email"), Mode::Create).is_ok());
    }

    #[test]
    fn test_id_cannot_be_written() {
        assert_eq!(
            failing_field(&valid().set(Column::Id, 9), Mode::Create),
            Some(Column::Id)
        );
        assert_eq!(
            failing_field(&FieldSet::new().set(Column::Id, 9), Mode::Update),
            Some(Column::Id)
        );
    }
}
