//! Predicate expression trees
//!
//! Criteria are kept as an inspectable tree instead of an opaque closure so
//! that a query layer can walk them and translate them into a native filter
//! (see [`crate::query::sql`]), while [`Expr::evaluate`] gives the same answer
//! for in-memory data.
//!
//! Evaluation follows SQL three-valued logic: a comparison involving `NULL`
//! is *unknown*, `AND`/`OR`/`NOT` propagate unknown the way SQL does, and an
//! unknown result at the top level does not satisfy the predicate.
//!
//! # Example
//!
//! ```rust
//! use acton_data::specification::{field, Expr};
//!
//! let adult_admin = field("age").gte(18_i64).and(field("role").eq("admin"));
//! assert_eq!(adult_admin.fields(), vec!["age", "role"]);
//! assert!(matches!(adult_admin, Expr::And(_, _)));
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::entity::{resolve_field, Entity};
use crate::query::FieldValue;

/// Comparison operators usable in a [`Expr::Compare`] node
///
/// # Example
///
/// ```rust
/// use acton_data::specification::CompareOp;
///
/// assert_eq!(format!("{}", CompareOp::Eq), "=");
/// assert_eq!(format!("{}", CompareOp::Like), "LIKE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal to (=)
    Eq,
    /// Not equal to (<>)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal to (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal to (<=)
    Lte,
    /// Pattern matching (LIKE)
    Like,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
            // LIKE never reaches ordering comparison
            Self::Like => false,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
        }
    }
}

/// A boolean expression over the fields of one entity
///
/// Every node refers to the same implicit entity, so combining two trees
/// never needs parameter rebinding: the operands are simply placed under a
/// new [`Expr::And`] or [`Expr::Or`] node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant truth value
    Const(bool),
    /// `field <op> value`
    Compare {
        /// Field name
        field: String,
        /// Comparison operator
        op: CompareOp,
        /// Right-hand operand
        value: FieldValue,
    },
    /// `field IN (values...)`
    In {
        /// Field name
        field: String,
        /// Candidate values
        values: Vec<FieldValue>,
    },
    /// `field IS NULL`, or `IS NOT NULL` when negated
    IsNull {
        /// Field name
        field: String,
        /// `true` for `IS NOT NULL`
        negated: bool,
    },
    /// Logical conjunction
    And(Box<Expr>, Box<Expr>),
    /// Logical disjunction
    Or(Box<Expr>, Box<Expr>),
    /// Logical negation
    Not(Box<Expr>),
}

impl Expr {
    /// Always-true expression
    #[must_use]
    pub const fn always() -> Self {
        Self::Const(true)
    }

    /// Always-false expression
    #[must_use]
    pub const fn never() -> Self {
        Self::Const(false)
    }

    /// `self AND other`
    #[must_use]
    pub fn and(self, other: Expr) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// `self OR other`
    #[must_use]
    pub fn or(self, other: Expr) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// `NOT self`
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates the expression against an entity
    ///
    /// Returns `true` only when the predicate is definitely satisfied; an
    /// unknown result (caused by `NULL`) counts as not satisfied.
    pub fn evaluate<T: Entity + ?Sized>(&self, entity: &T) -> bool {
        self.evaluate_tristate(entity) == Some(true)
    }

    /// Three-valued evaluation: `None` means unknown
    pub fn evaluate_tristate<T: Entity + ?Sized>(&self, entity: &T) -> Option<bool> {
        match self {
            Self::Const(value) => Some(*value),
            Self::Compare { field, op, value } => {
                let actual = resolve_field(entity, field).unwrap_or(FieldValue::Null);
                match (op, value) {
                    (CompareOp::Like, FieldValue::Text(pattern)) => actual.like(pattern),
                    (CompareOp::Like, _) => None,
                    (op, value) => actual.compare(value).map(|ordering| op.holds(ordering)),
                }
            }
            Self::In { field, values } => {
                let actual = resolve_field(entity, field).unwrap_or(FieldValue::Null);
                let mut unknown = false;
                for candidate in values {
                    match actual.compare(candidate) {
                        Some(Ordering::Equal) => return Some(true),
                        Some(_) => {}
                        None => unknown = true,
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
            Self::IsNull { field, negated } => {
                let is_null = resolve_field(entity, field).map_or(true, |v| v.is_null());
                Some(is_null != *negated)
            }
            Self::And(left, right) => match left.evaluate_tristate(entity) {
                Some(false) => Some(false),
                left => match (left, right.evaluate_tristate(entity)) {
                    (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                },
            },
            Self::Or(left, right) => match left.evaluate_tristate(entity) {
                Some(true) => Some(true),
                left => match (left, right.evaluate_tristate(entity)) {
                    (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                },
            },
            Self::Not(inner) => inner.evaluate_tristate(entity).map(|value| !value),
        }
    }

    /// Field names referenced by the expression, in first-seen order
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Const(_) => {}
            Self::Compare { field, .. } | Self::In { field, .. } | Self::IsNull { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
            Self::Not(inner) => inner.collect_fields(out),
        }
    }
}

/// Starts a predicate on a named field
///
/// # Example
///
/// ```rust
/// use acton_data::specification::field;
///
/// let expr = field("email").like("%@example.com");
/// assert_eq!(expr.fields(), vec!["email"]);
/// ```
pub fn field(name: impl Into<String>) -> Field {
    Field(name.into())
}

/// Builder for predicates on one field, created with [`field`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field(String);

impl Field {
    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    fn compare(self, op: CompareOp, value: impl Into<FieldValue>) -> Expr {
        Expr::Compare {
            field: self.0,
            op,
            value: value.into(),
        }
    }

    /// `field = value`
    pub fn eq(self, value: impl Into<FieldValue>) -> Expr {
        self.compare(CompareOp::Eq, value)
    }

    /// `field <> value`
    pub fn ne(self, value: impl Into<FieldValue>) -> Expr {
        self.compare(CompareOp::Ne, value)
    }

    /// `field > value`
    pub fn gt(self, value: impl Into<FieldValue>) -> Expr {
        self.compare(CompareOp::Gt, value)
    }

    /// `field >= value`
    pub fn gte(self, value: impl Into<FieldValue>) -> Expr {
        self.compare(CompareOp::Gte, value)
    }

    /// `field < value`
    pub fn lt(self, value: impl Into<FieldValue>) -> Expr {
        self.compare(CompareOp::Lt, value)
    }

    /// `field <= value`
    pub fn lte(self, value: impl Into<FieldValue>) -> Expr {
        self.compare(CompareOp::Lte, value)
    }

    /// `field LIKE pattern`
    pub fn like(self, pattern: impl Into<String>) -> Expr {
        self.compare(CompareOp::Like, FieldValue::Text(pattern.into()))
    }

    /// `field IN (values...)`
    pub fn in_list<V: Into<FieldValue>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::In {
            field: self.0,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `field IS NULL`
    #[must_use]
    pub fn is_null(self) -> Expr {
        Expr::IsNull {
            field: self.0,
            negated: false,
        }
    }

    /// `field IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Expr {
        Expr::IsNull {
            field: self.0,
            negated: true,
        }
    }
}
