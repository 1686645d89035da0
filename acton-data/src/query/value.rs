//! Field values used in predicates, ordering and SQL parameters

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::EntityId;

/// A value read from an entity field or compared against one
///
/// # Example
///
/// ```rust
/// use acton_data::query::FieldValue;
///
/// let text: FieldValue = "active".into();
/// let number: FieldValue = 42_i64.into();
/// let missing: FieldValue = Option::<i64>::None.into();
///
/// assert_eq!(text, FieldValue::Text("active".to_string()));
/// assert_eq!(number, FieldValue::Integer(42));
/// assert!(missing.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value (SQL `NULL`)
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// String value
    Text(String),
    /// UUID value
    Uuid(Uuid),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Whether this is [`FieldValue::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compares two values the way a SQL engine would in a `WHERE` clause
    ///
    /// Returns `None` when either side is `NULL` or the types are not
    /// comparable. Integers and floats compare exactly by numeric value.
    /// As in PostgreSQL, `NaN` equals `NaN` and is greater than every other
    /// number.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(cmp_floats(*a, *b)),
            (Self::Integer(a), Self::Float(b)) => Some(cmp_integer_float(*a, *b)),
            (Self::Float(a), Self::Integer(b)) => Some(cmp_integer_float(*b, *a).reverse()),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting
    ///
    /// Matches PostgreSQL's default placement: `NULL` sorts after every other
    /// value in ascending order. Values of unrelated types are grouped by type.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Greater,
            (_, Self::Null) => Ordering::Less,
            _ => self
                .compare(other)
                .unwrap_or_else(|| self.type_rank().cmp(&other.type_rank())),
        }
    }

    /// SQL `LIKE` matching, `%` for any run of characters and `_` for one
    ///
    /// Only text values can match; anything else yields `None` (unknown).
    #[must_use]
    pub fn like(&self, pattern: &str) -> Option<bool> {
        match self {
            Self::Text(text) => Some(like_match(text, pattern)),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Integer(_) | Self::Float(_) => 1,
            Self::Text(_) => 2,
            Self::Uuid(_) => 3,
            Self::Timestamp(_) => 4,
            Self::Null => 5,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Uuid(u) => write!(f, "'{u}'"),
            Self::Timestamp(t) => write!(f, "'{}'", t.to_rfc3339()),
        }
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison, without rounding the integer to the nearest `f64`
fn cmp_integer_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first value above i64::MAX
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() || float >= UPPER {
        return Ordering::Less;
    }
    if float < -UPPER {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    // In range and integral, so the cast is exact
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64
            .partial_cmp(&(float - whole))
            .unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matches[j]: text[..i] matches pattern[..j]
    let mut matches = vec![false; pattern.len() + 1];
    matches[0] = true;
    for (j, p) in pattern.iter().enumerate() {
        matches[j + 1] = matches[j] && *p == '%';
    }

    for c in &text {
        let mut next = vec![false; pattern.len() + 1];
        for (j, p) in pattern.iter().enumerate() {
            next[j + 1] = match p {
                '%' => next[j] || matches[j + 1],
                '_' => matches[j],
                literal => matches[j] && literal == c,
            };
        }
        matches = next;
    }

    matches[pattern.len()]
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Uuid> for FieldValue {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<EntityId> for FieldValue {
    fn from(id: EntityId) -> Self {
        Self::Uuid(*id.as_uuid())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
