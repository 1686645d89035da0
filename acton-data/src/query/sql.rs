//! Translation of queries into parameterized SQL
//!
//! Values are never interpolated into the statement text; they are returned
//! as positional parameters (`$1`, `$2`, ...) in the order they appear.
//! Field and table names are checked against a conservative identifier
//! pattern because identifiers cannot be bound as parameters.
//!
//! A query filtered or ordered after its window is rendered with the
//! windowed stage as a subquery in `FROM`.
//!
//! # Example
//!
//! ```rust
//! use acton_data::query::sql;
//! use acton_data::specification::field;
//!
//! let fragment = sql::translate(&field("age").gte(18_i64).and(field("status").eq("active")))?;
//! assert_eq!(fragment.sql, "(age >= $1 AND status = $2)");
//! assert_eq!(fragment.params.len(), 2);
//! # Ok::<(), acton_data::Error>(())
//! ```

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use super::source::Query;
use super::value::FieldValue;
use crate::error::{Error, Result};
use crate::specification::Expr;

/// Plain or table-qualified SQL identifier
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier regex is valid")
});

/// SQL text plus the values bound to its placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// Statement or clause text with `$n` placeholders
    pub sql: String,
    /// Parameter values, `params[0]` binds `$1`
    pub params: Vec<FieldValue>,
}

/// Whether `name` may be used as a column or table name
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

fn identifier(name: &str) -> Result<&str> {
    if is_valid_identifier(name) {
        Ok(name)
    } else {
        Err(Error::InvalidArgument(format!(
            "'{name}' is not a valid field or table name"
        )))
    }
}

#[derive(Default)]
struct Builder {
    sql: String,
    params: Vec<FieldValue>,
}

impl Builder {
    fn bind(&mut self, value: &FieldValue) {
        self.params.push(value.clone());
        // Writing to a String cannot fail
        let _ = write!(self.sql, "${}", self.params.len());
    }

    fn expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Const(true) => self.sql.push_str("TRUE"),
            Expr::Const(false) => self.sql.push_str("FALSE"),
            Expr::Compare { field, op, value } => {
                let _ = write!(self.sql, "{} {} ", identifier(field)?, op);
                self.bind(value);
            }
            Expr::In { field, values } => {
                let field = identifier(field)?;
                if values.is_empty() {
                    self.sql.push_str("FALSE");
                } else {
                    let _ = write!(self.sql, "{field} IN (");
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            self.sql.push_str(", ");
                        }
                        self.bind(value);
                    }
                    self.sql.push(')');
                }
            }
            Expr::IsNull { field, negated } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                let _ = write!(self.sql, "{} {keyword}", identifier(field)?);
            }
            Expr::And(left, right) => self.binary(left, "AND", right)?,
            Expr::Or(left, right) => self.binary(left, "OR", right)?,
            Expr::Not(inner) => {
                self.sql.push_str("NOT (");
                self.expr(inner)?;
                self.sql.push(')');
            }
        }
        Ok(())
    }

    fn binary(&mut self, left: &Expr, keyword: &str, right: &Expr) -> Result<()> {
        self.sql.push('(');
        self.expr(left)?;
        let _ = write!(self.sql, " {keyword} ");
        self.expr(right)?;
        self.sql.push(')');
        Ok(())
    }

    fn where_clause<T>(&mut self, query: &Query<T>) -> Result<()> {
        if let Some(criteria) = query.criteria() {
            self.sql.push_str(" WHERE ");
            self.expr(criteria)?;
        }
        Ok(())
    }

    /// `SELECT *` for one stage, inner stages becoming subqueries
    fn select<T>(&mut self, table: &str, query: &Query<T>, depth: usize) -> Result<()> {
        self.sql.push_str("SELECT * FROM ");
        match query.inner() {
            Some(inner) => {
                self.sql.push('(');
                self.select(table, inner, depth + 1)?;
                let _ = write!(self.sql, ") AS stage{depth}");
            }
            None => self.sql.push_str(identifier(table)?),
        }
        self.where_clause(query)?;

        if !query.sort().is_empty() {
            self.sql.push_str(" ORDER BY ");
            for (i, key) in query.sort().iter().enumerate() {
                if i > 0 {
                    self.sql.push_str(", ");
                }
                let _ = write!(
                    self.sql,
                    "{} {}",
                    identifier(&key.field)?,
                    key.direction.as_sql()
                );
            }
        }

        if let Some(window) = query.window_ref() {
            if window.limit != u64::MAX {
                let _ = write!(self.sql, " LIMIT {}", window.limit);
            }
            if window.offset > 0 {
                let _ = write!(self.sql, " OFFSET {}", window.offset);
            }
        }
        Ok(())
    }

    fn finish(self) -> SqlFragment {
        SqlFragment {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Translates a predicate into a `WHERE` clause body
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if a field name is not a plain identifier.
pub fn translate(expr: &Expr) -> Result<SqlFragment> {
    let mut builder = Builder::default();
    builder.expr(expr)?;
    Ok(builder.finish())
}

/// `SELECT *` statement for `query` against `table`
///
/// Tracked queries lock the selected rows with `FOR UPDATE`.
///
/// # Example
///
/// ```rust
/// use acton_data::query::{sql, Query, SortKey, Window};
/// use acton_data::specification::field;
/// # use acton_data::prelude::*;
/// # struct User;
/// # impl Entity for User {
/// #     const ENTITY_TYPE: &'static str = "User";
/// #     fn id(&self) -> EntityId { EntityId::empty() }
/// #     fn field(&self, _: &str) -> Option<FieldValue> { None }
/// # }
///
/// let query = Query::<User>::all()
///     .filter(field("active").eq(true))
///     .order_by(SortKey::descending("created_at"))
///     .window(Window::page(2, 10));
///
/// let statement = sql::select_statement("users", &query)?;
/// assert_eq!(
///     statement.sql,
///     "SELECT * FROM users WHERE active = $1 ORDER BY created_at DESC LIMIT 10 OFFSET 20"
/// );
/// # Ok::<(), acton_data::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the table or any field name is not a
/// plain identifier.
pub fn select_statement<T>(table: &str, query: &Query<T>) -> Result<SqlFragment> {
    let mut builder = Builder::default();
    builder.select(table, query, 1)?;
    if query.tracking_mode().is_tracked() {
        builder.sql.push_str(" FOR UPDATE");
    }
    Ok(builder.finish())
}

/// `SELECT COUNT(*)` statement for the rows `query` selects from `table`
///
/// Ordering is dropped. A windowed or staged query is counted through a
/// subquery so the window limits the count.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the table or any field name is not a
/// plain identifier.
pub fn count_statement<T>(table: &str, query: &Query<T>) -> Result<SqlFragment> {
    let query = query.unordered();
    let mut builder = Builder::default();

    if query.window_ref().is_none() && query.inner().is_none() {
        let _ = write!(builder.sql, "SELECT COUNT(*) FROM {}", identifier(table)?);
        builder.where_clause(&query)?;
    } else {
        builder.sql.push_str("SELECT COUNT(*) FROM (");
        builder.select(table, &query, 1)?;
        builder.sql.push_str(") AS counted");
    }

    Ok(builder.finish())
}
