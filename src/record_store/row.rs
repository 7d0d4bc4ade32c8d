//! Row accessor with absence semantics
//!
//! `RecordRow::get` never fails: a missing column, a NULL, a value of the wrong
//! storage class or an unparsable string all come back as `None`.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use rusqlite::types::Value;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// One stored record: column name → raw SQLite value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordRow {
    columns: HashMap<String, Value>,
}

impl RecordRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Builder-style setter for text columns
    pub fn with_text(self, column: &str, value: &str) -> Self {
        self.with(column, value.to_string())
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.columns.insert(column.to_string(), value.into());
    }

    /// Typed access to `column`
    pub fn get<T: FromColumn>(&self, column: &str) -> Option<T> {
        self.columns.get(column).and_then(T::from_column)
    }

}

/// Conversion from a raw column value, `None` when it does not fit
pub trait FromColumn: Sized {
    fn from_column(value: &Value) -> Option<Self>;
}

fn parse_text<T: FromStr>(text: &str) -> Option<T> {
    text.trim().parse().ok()
}

impl FromColumn for String {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text.clone()),
            _ => None,
        }
    }
}

impl FromColumn for Uuid {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Text(text) => Uuid::parse_str(text.trim()).ok(),
            Value::Blob(bytes) => Uuid::from_slice(bytes).ok(),
            _ => None,
        }
    }
}

impl FromColumn for i64 {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(*n),
            Value::Text(text) => parse_text(text),
            _ => None,
        }
    }
}

impl FromColumn for i32 {
    fn from_column(value: &Value) -> Option<Self> {
        i64::from_column(value).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromColumn for u8 {
    fn from_column(value: &Value) -> Option<Self> {
        i64::from_column(value).and_then(|n| u8::try_from(n).ok())
    }
}

impl FromColumn for f64 {
    fn from_column(value: &Value) -> Option<Self> {
        let number: Option<f64> = match value {
            Value::Real(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            Value::Text(text) => parse_text(text),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }
}

impl FromColumn for bool {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(*n != 0),
            Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromColumn for BigDecimal {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(BigDecimal::from(*n)),
            Value::Real(n) => parse_text(&n.to_string()),
            Value::Text(text) => parse_text(text),
            _ => None,
        }
    }
}

impl FromColumn for BigInt {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(BigInt::from(*n)),
            Value::Text(text) => parse_text(text),
            _ => None,
        }
    }
}
