//! Bound values and column references
//!
//! A predicate operand is either a value, bound as a `?` placeholder, or a
//! column reference, inlined into the SQL text. The distinction is made by type
//! (`Operand::Value` vs `Operand::Column`), never by inspecting string contents.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Format used when timestamps are sent to the driver as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL literal for values that are safe to inline (numbers only)
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_db::Value;
    ///
    /// assert_eq!(Value::from(3).inline_literal(), Some("3".to_string()));
    /// assert_eq!(Value::from(1.5).inline_literal(), Some("1.5".to_string()));
    /// assert_eq!(Value::from("x").inline_literal(), None);
    /// ```
    pub fn inline_literal(&self) -> Option<String> {
        match self {
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) if f.is_finite() => Some(f.to_string()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(ts) => serde_json::to_value(ts).unwrap_or(serde_json::Value::Null),
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A column name inlined into SQL instead of bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef(pub String);

/// Reference a column, e.g. to compare two columns in a correlated subquery
///
/// # Examples
///
/// ```
/// use cube_db::{col, select, Filter};
///
/// let stmt = select("orders", ["id"]).where_("orders.user_id", col("users.id")).statement();
/// assert_eq!(stmt.sql, "SELECT id FROM orders WHERE orders.user_id = users.id");
/// assert!(stmt.params.is_empty());
/// ```
pub fn col(name: impl Into<String>) -> ColumnRef {
    ColumnRef(name.into())
}

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(ColumnRef),
}

impl Operand {
    /// SQL text for this operand, pushing bound values onto `params`
    pub(crate) fn render(self, params: &mut Vec<Value>) -> String {
        match self {
            Operand::Column(ColumnRef(name)) => name,
            Operand::Value(value) => {
                params.push(value);
                "?".to_string()
            }
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<ColumnRef> for Operand {
    fn from(c: ColumnRef) -> Self {
        Operand::Column(c)
    }
}

macro_rules! operand_from_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Operand::Value(Value::from(v))
            }
        })*
    };
}

operand_from_value!(i8, i16, i32, i64, u8, u16, u32, bool, f32, f64, &str, String, &String, NaiveDateTime);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.into())
    }
}
