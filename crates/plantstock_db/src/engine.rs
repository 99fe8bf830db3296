//! Storage engine operations on the plants table.
//!
//! These run exactly what they are given: no validation, no address
//! handling, no notifications. The record store layers those on top.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row as _, Sqlite};
use tracing::debug;

use crate::contract::{Column, ColumnKind, TABLE_NAME};
use crate::error::Result;
use crate::filter::{push_value, Filter, Sort};
use crate::types::{FieldSet, Row, Value};
use crate::PlantDb;

impl PlantDb {
    /// Range query with optional predicate and sort order.
    pub(crate) async fn select(
        &self,
        projection: &[Column],
        filter: Option<&Filter>,
        sort: Option<&Sort>,
    ) -> Result<Vec<Row>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        for (i, column) in projection.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.as_str());
        }
        qb.push(" FROM ").push(TABLE_NAME);
        push_where(&mut qb, filter);
        if let Some(sort) = sort.filter(|s| !s.is_empty()) {
            sort.push_sql(&mut qb);
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(|row| decode_row(row, projection)).collect()
    }

    /// Point query by id.
    pub(crate) async fn find(&self, id: i64, projection: &[Column]) -> Result<Option<Row>> {
        let filter = Filter::id(id);
        let mut rows = self.select(projection, Some(&filter), None).await?;
        Ok(rows.pop())
    }

    /// Insert a row, returning the assigned id.
    ///
    /// Returns `None` if the engine reports no row written.
    pub(crate) async fn insert(&self, fields: &FieldSet) -> Result<Option<i64>> {
        let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
        qb.push(TABLE_NAME).push(" (");
        for (i, (column, _)) in fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.as_str());
        }
        qb.push(") VALUES (");
        for (i, (_, value)) in fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let id = result.last_insert_rowid();
        debug!(id, "Inserted plant row");
        Ok(Some(id))
    }

    /// Update every row matching `filter` (all rows when `None`).
    pub(crate) async fn update_where(
        &self,
        fields: &FieldSet,
        filter: Option<&Filter>,
    ) -> Result<u64> {
        if fields.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
        qb.push(TABLE_NAME).push(" SET ");
        for (i, (column, value)) in fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.as_str()).push(" = ");
            push_value(&mut qb, value);
        }
        push_where(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete every row matching `filter` (all rows when `None`).
    pub(crate) async fn delete_where(&self, filter: Option<&Filter>) -> Result<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM ");
        qb.push(TABLE_NAME);
        push_where(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Count rows matching `filter` (all rows when `None`).
    pub async fn count(&self, filter: Option<&Filter>) -> Result<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        qb.push(TABLE_NAME);
        push_where(&mut qb, filter);

        let count: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, filter: Option<&Filter>) {
    if let Some(filter) = filter {
        qb.push(" WHERE ");
        filter.push_sql(qb);
    }
}

/// Decode the projected columns of a result row by their declared kind.
///
/// SQLite is dynamically typed, so decoding is unchecked and relies on the
/// engine's own conversions (REAL affinity, TEXT affinity).
fn decode_row(row: &SqliteRow, projection: &[Column]) -> Result<Row> {
    let mut values = Vec::with_capacity(projection.len());
    for (idx, column) in projection.iter().enumerate() {
        let value = match column.kind() {
            ColumnKind::Integer => Value::from(row.try_get_unchecked::<Option<i64>, _>(idx)?),
            ColumnKind::Real => Value::from(row.try_get_unchecked::<Option<f64>, _>(idx)?),
            ColumnKind::Text => Value::from(row.try_get_unchecked::<Option<String>, _>(idx)?),
        };
        values.push((*column, value));
    }
    Ok(Row::new(values))
}
