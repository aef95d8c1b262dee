use crate::{Error, Result};

use indexmap::IndexMap;
use std::fmt;

/// A fetched row: column name to value, in select-list order.
pub type Row = IndexMap<String, Value>;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Integer,
    Float,
    Text,
}

impl Type {
    /// Column definition used when none is given explicitly.
    pub fn default_ddl(self) -> &'static str {
        match self {
            Type::Bool => "boolean",
            Type::Integer => "bigint",
            Type::Float => "real",
            Type::Text => "varchar(100)",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Raw bytes, returned by drivers for binary columns
    Bytes(Vec<u8>),

    /// Double precision float
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Bytes(_) => "Bytes",
            Value::F64(_) => "F64",
            Value::I64(_) => "I64",
            Value::Null => "Null",
            Value::String(_) => "String",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F64(v) => Some(v),
            Value::I64(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Coerces a value read back from a driver into the declared storage
    /// type. Drivers without a native boolean hand back `0`/`1`, some hand
    /// back text for numeric aggregates, and so on.
    pub fn cast(self, ty: Type) -> Result<Value> {
        let value = match (ty, self) {
            (_, Value::Null) => Value::Null,
            (Type::Bool, Value::Bool(v)) => Value::Bool(v),
            (Type::Bool, Value::I64(v)) => Value::Bool(v != 0),
            (Type::Integer, Value::I64(v)) => Value::I64(v),
            (Type::Integer, Value::Bool(v)) => Value::I64(v as i64),
            (Type::Integer, Value::String(v)) => match v.parse() {
                Ok(parsed) => Value::I64(parsed),
                Err(_) => return Err(Error::type_conversion(Value::String(v), "i64")),
            },
            (Type::Float, Value::F64(v)) => Value::F64(v),
            (Type::Float, Value::I64(v)) => Value::F64(v as f64),
            (Type::Float, Value::String(v)) => match v.parse() {
                Ok(parsed) => Value::F64(parsed),
                Err(_) => return Err(Error::type_conversion(Value::String(v), "f64")),
            },
            (Type::Text, Value::String(v)) => Value::String(v),
            (Type::Text, Value::Bytes(v)) => match String::from_utf8(v) {
                Ok(v) => Value::String(v),
                Err(err) => {
                    return Err(Error::type_conversion(
                        Value::Bytes(err.into_bytes()),
                        "String",
                    ))
                }
            },
            (Type::Text, Value::I64(v)) => Value::String(v.to_string()),
            (Type::Bool, value) => return Err(Error::type_conversion(value, "bool")),
            (Type::Integer, value) => return Err(Error::type_conversion(value, "i64")),
            (Type::Float, value) => return Err(Error::type_conversion(value, "f64")),
            (Type::Text, value) => return Err(Error::type_conversion(value, "String")),
        };

        Ok(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::F64(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::Null => f.write_str("NULL"),
            Value::String(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}
