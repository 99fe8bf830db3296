//! Plant record types, field sets, and query results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contract::Column;
use crate::error::{DbError, Result};

/// A dynamically typed column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// A set of column values to write.
///
/// Absent columns are left untouched by an update; a column present with
/// [`Value::Null`] is an explicit null and is validated as such.
///
/// Values are stored with the column's SQLite affinity, so reads return the
/// column's kind rather than the kind written: an integer price reads back
/// as [`Value::Real`], and a number written to a text column (image,
/// supplier phone) reads back as [`Value::Text`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSet {
    values: BTreeMap<Column, Value>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value.
    pub fn set(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    pub fn insert(&mut self, column: Column, value: impl Into<Value>) {
        self.values.insert(column, value.into());
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.set(Column::Name, name.into())
    }

    pub fn price(self, price: f64) -> Self {
        self.set(Column::Price, price)
    }

    pub fn quantity(self, quantity: i64) -> Self {
        self.set(Column::Quantity, quantity)
    }

    pub fn image(self, image: impl Into<String>) -> Self {
        self.set(Column::Image, image.into())
    }

    pub fn supplier_name(self, name: impl Into<String>) -> Self {
        self.set(Column::SupplierName, name.into())
    }

    pub fn supplier_phone(self, phone: impl Into<String>) -> Self {
        self.set(Column::SupplierPhone, phone.into())
    }

    pub fn supplier_email(self, email: impl Into<String>) -> Self {
        self.set(Column::SupplierEmail, email.into())
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.values.get(&column)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.values.contains_key(&column)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Columns and values in column declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        self.values.iter().map(|(c, v)| (*c, v))
    }
}

/// A full plant record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub image: Option<String>,
    pub supplier_name: String,
    pub supplier_phone: Option<String>,
    pub supplier_email: String,
}

impl TryFrom<Row> for PlantRecord {
    type Error = DbError;

    fn try_from(row: Row) -> Result<Self> {
        Ok(Self {
            id: row.require_i64(Column::Id)?,
            name: row.require_text(Column::Name)?,
            price: row
                .get(Column::Price)
                .and_then(Value::as_f64)
                .ok_or_else(|| missing(Column::Price))?,
            quantity: row.require_i64(Column::Quantity)?,
            image: row.text(Column::Image).map(str::to_string),
            supplier_name: row.require_text(Column::SupplierName)?,
            supplier_phone: row.text(Column::SupplierPhone).map(str::to_string),
            supplier_email: row.require_text(Column::SupplierEmail)?,
        })
    }
}

fn missing(column: Column) -> DbError {
    DbError::invalid_state(format!("row has no usable {} column", column))
}

/// Typed input for creating a plant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub image: Option<String>,
    pub supplier_name: String,
    pub supplier_phone: Option<String>,
    pub supplier_email: String,
}

impl From<NewPlant> for FieldSet {
    fn from(p: NewPlant) -> Self {
        let mut fields = FieldSet::new()
            .name(p.name)
            .price(p.price)
            .quantity(p.quantity)
            .supplier_name(p.supplier_name)
            .supplier_email(p.supplier_email);
        if let Some(image) = p.image {
            fields.insert(Column::Image, image);
        }
        if let Some(phone) = p.supplier_phone {
            fields.insert(Column::SupplierPhone, phone);
        }
        fields
    }
}

/// One result row, holding only the projected columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    values: Vec<(Column, Value)>,
}

impl Row {
    pub fn new(values: Vec<(Column, Value)>) -> Self {
        Self { values }
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.values
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn i64(&self, column: Column) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    pub fn f64(&self, column: Column) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    pub fn text(&self, column: Column) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.values.iter().map(|(c, _)| *c)
    }

    fn require_i64(&self, column: Column) -> Result<i64> {
        self.i64(column).ok_or_else(|| missing(column))
    }

    fn require_text(&self, column: Column) -> Result<String> {
        self.text(column)
            .map(str::to_string)
            .ok_or_else(|| missing(column))
    }
}

/// Result of a read: a finite, one-shot snapshot of rows.
///
/// Not refreshed by later writes; subscribe for change notifications and
/// read again.
#[derive(Debug)]
pub struct Rows {
    inner: std::vec::IntoIter<Row>,
}

impl Rows {
    pub(crate) fn new(rows: Vec<Row>) -> Self {
        Self {
            inner: rows.into_iter(),
        }
    }

    /// Decode every remaining row as a full record.
    ///
    /// Fails if the read projected away a required column.
    pub fn into_records(self) -> Result<Vec<PlantRecord>> {
        self.map(PlantRecord::try_from).collect()
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows {}
