//! Parameterized row predicates and sort orders.
//!
//! Every caller-supplied value is bound as a query parameter. Column names
//! come from the closed [`Column`] enum, so nothing user-controlled is ever
//! spliced into SQL text.

use sqlx::{QueryBuilder, Sqlite};

use crate::contract::Column;
use crate::types::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Ne => " <> ",
            Self::Lt => " < ",
            Self::Le => " <= ",
            Self::Gt => " > ",
            Self::Ge => " >= ",
        }
    }
}

/// A row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        column: Column,
        op: CompareOp,
        value: Value,
    },
    /// Case-insensitive (ASCII) substring match. `%`, `_` and `\` in the
    /// term match literally.
    Contains { column: Column, term: String },
    IsNull(Column),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn compare(column: Column, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn contains(column: Column, term: impl Into<String>) -> Self {
        Self::Contains {
            column,
            term: term.into(),
        }
    }

    /// Name search used by the list screen.
    pub fn name_contains(term: impl Into<String>) -> Self {
        Self::contains(Column::Name, term)
    }

    pub fn id(id: i64) -> Self {
        Self::eq(Column::Id, id)
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Append this predicate to `qb`, binding every value.
    pub(crate) fn push_sql(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Self::Compare { column, op, value } => match (op, value) {
                (CompareOp::Eq, Value::Null) => {
                    qb.push(column.as_str()).push(" IS NULL");
                }
                (CompareOp::Ne, Value::Null) => {
                    qb.push(column.as_str()).push(" IS NOT NULL");
                }
                _ => {
                    qb.push(column.as_str()).push(op.as_sql());
                    push_value(qb, value);
                }
            },
            Self::Contains { column, term } => {
                qb.push(column.as_str())
                    .push(" LIKE ")
                    .push_bind(like_pattern(term))
                    .push(" ESCAPE '\\'");
            }
            Self::IsNull(column) => {
                qb.push(column.as_str()).push(" IS NULL");
            }
            Self::And(parts) => push_joined(qb, parts, " AND ", "1 = 1"),
            Self::Or(parts) => push_joined(qb, parts, " OR ", "1 = 0"),
            Self::Not(inner) => {
                qb.push("NOT (");
                inner.push_sql(qb);
                qb.push(")");
            }
        }
    }
}

fn push_joined(qb: &mut QueryBuilder<'_, Sqlite>, parts: &[Filter], sep: &str, empty: &str) {
    if parts.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(sep);
        }
        part.push_sql(qb);
    }
    qb.push(")");
}

/// Bind a dynamically typed value.
pub(crate) fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Null => qb.push_bind(None::<String>),
        Value::Integer(v) => qb.push_bind(*v),
        Value::Real(v) => qb.push_bind(*v),
        Value::Text(v) => qb.push_bind(v.clone()),
    };
}

fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort order: columns applied left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    keys: Vec<(Column, Direction)>,
}

impl Sort {
    pub fn by(column: Column, direction: Direction) -> Self {
        Self {
            keys: vec![(column, direction)],
        }
    }

    pub fn asc(column: Column) -> Self {
        Self::by(column, Direction::Asc)
    }

    pub fn then(mut self, column: Column, direction: Direction) -> Self {
        self.keys.push((column, direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Append ` ORDER BY ...`. Callers skip empty sorts.
    pub(crate) fn push_sql(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" ORDER BY ");
        for (i, (column, direction)) in self.keys.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.as_str());
            qb.push(match direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filter: &Filter) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new("");
        filter.push_sql(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_search_term_is_bound_not_interpolated() {
        let sql = render(&Filter::name_contains("x' OR 1=1 --"));
        assert_eq!(sql, "name LIKE ? ESCAPE '\\'");
        assert!(!sql.contains("OR 1=1"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_null_comparisons_render_is_null() {
        assert_eq!(render(&Filter::eq(Column::Image, Value::Null)), "image IS NULL");
        assert_eq!(
            render(&Filter::compare(Column::Image, CompareOp::Ne, Value::Null)),
            "image IS NOT NULL"
        );
    }

    #[test]
    fn test_compound_filters() {
        let filter = Filter::compare(Column::Quantity, CompareOp::Lt, 5)
            .and(Filter::name_contains("fern"))
            .and(Filter::IsNull(Column::SupplierPhone).negate());
        assert_eq!(
            render(&filter),
            "(quantity < ? AND name LIKE ? ESCAPE '\\' AND NOT (supplier_phone IS NULL))"
        );
        assert_eq!(render(&Filter::Or(vec![])), "1 = 0");
        assert_eq!(render(&Filter::And(vec![])), "1 = 1");
    }

    #[test]
    fn test_id_guard_binds_both_values() {
        let guard = Filter::id(7).and(Filter::eq(Column::Quantity, 3));
        assert_eq!(render(&guard), "(id = ? AND quantity = ?)");
    }

    #[test]
    fn test_sort_rendering() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM plants");
        Sort::asc(Column::Name)
            .then(Column::Price, Direction::Desc)
            .push_sql(&mut qb);
        assert_eq!(qb.sql(), "SELECT id FROM plants ORDER BY name ASC, price DESC");
    }
}
