//! Write-body fields.
//!
//! Every field of a write body is a `Field<T>`. Deserializing one never
//! fails: a value of the wrong type or format is kept as `Invalid` with the
//! message to report, so one bad field yields a per-field validation error
//! instead of rejecting the whole body.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";

/// One field of a write body
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// The key was absent
    Missing,
    /// The key was present with `null`
    Null,
    Valid(T),
    /// The value could not be read as `T`
    Invalid(String),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    /// Fill an absent field with the stored value
    pub fn or_stored(self, stored: T) -> Self {
        match self {
            Field::Missing => Field::Valid(stored),
            other => other,
        }
    }

    /// The value, or the message explaining why there is none
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Field::Valid(value) => Ok(value),
            Field::Missing => Err(REQUIRED.to_string()),
            Field::Null => Err(NULL.to_string()),
            Field::Invalid(message) => Err(message),
        }
    }
}

impl<'de, T: FieldValue> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Field::Null);
        }
        Ok(match T::from_json(value) {
            Ok(value) => Field::Valid(value),
            Err(message) => Field::Invalid(message),
        })
    }
}

/// A type a body field can hold, read from arbitrary JSON
pub trait FieldValue: Sized {
    fn from_json(value: Value) -> Result<Self, String>;
}

impl FieldValue for String {
    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err("Not a valid string.".to_string()),
        }
    }
}

impl FieldValue for i32 {
    fn from_json(value: Value) -> Result<Self, String> {
        let parsed = match &value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| "A valid integer is required.".to_string())
    }
}

/// Primary-key references
impl FieldValue for i64 {
    fn from_json(value: Value) -> Result<Self, String> {
        let parsed = match &value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            format!("Incorrect type. Expected pk value, received {}.", type_name(&value))
        })
    }
}

impl FieldValue for Vec<i64> {
    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items.into_iter().map(i64::from_json).collect(),
            other => Err(format!(
                "Expected a list of items but got type \"{}\".",
                type_name(&other)
            )),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl FieldValue for NaiveDateTime {
    fn from_json(value: Value) -> Result<Self, String> {
        let invalid = || {
            "Datetime has wrong format. Use one of these formats instead: \
             YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z]."
                .to_string()
        };
        let Value::String(raw) = value else {
            return Err(invalid());
        };
        let raw = raw.trim();

        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
            .ok_or_else(invalid)
    }
}

/// JSON type names as the messages report them
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
