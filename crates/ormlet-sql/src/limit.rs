use ormlet_core::{Error, Result, Value};

/// A `LIMIT` clause: either a row count or an `(offset, count)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Range { offset: u64, count: u64 },
}

impl Limit {
    /// SQL fragment following the `LIMIT` keyword, with its arguments.
    pub(crate) fn to_sql(self) -> Result<(&'static str, Vec<Value>)> {
        match self {
            Limit::Count(count) => Ok(("?", vec![to_value(count)?])),
            Limit::Range { offset, count } => {
                Ok(("?, ?", vec![to_value(offset)?, to_value(count)?]))
            }
        }
    }
}

fn to_value(n: u64) -> Result<Value> {
    i64::try_from(n).map(Value::I64).map_err(|_| invalid(n))
}

fn invalid(raw: impl std::fmt::Display) -> Error {
    Error::invalid_value(format!("invalid limit value: {raw}"))
}

fn non_negative(n: i64) -> Result<u64> {
    u64::try_from(n).map_err(|_| invalid(n))
}

/// Conversion of loosely-typed limit input, such as a request parameter,
/// into a [`Limit`].
///
/// Any shape other than a single non-negative integer or a pair of them is
/// rejected with an invalid-value error.
pub trait IntoLimit {
    fn into_limit(self) -> Result<Limit>;
}

impl IntoLimit for Limit {
    fn into_limit(self) -> Result<Limit> {
        Ok(self)
    }
}

impl IntoLimit for u64 {
    fn into_limit(self) -> Result<Limit> {
        Ok(Limit::Count(self))
    }
}

impl IntoLimit for usize {
    fn into_limit(self) -> Result<Limit> {
        Ok(Limit::Count(self as u64))
    }
}

impl IntoLimit for i64 {
    fn into_limit(self) -> Result<Limit> {
        non_negative(self).map(Limit::Count)
    }
}

impl IntoLimit for i32 {
    fn into_limit(self) -> Result<Limit> {
        (self as i64).into_limit()
    }
}

impl IntoLimit for (u64, u64) {
    fn into_limit(self) -> Result<Limit> {
        Ok(Limit::Range {
            offset: self.0,
            count: self.1,
        })
    }
}

impl IntoLimit for (i64, i64) {
    fn into_limit(self) -> Result<Limit> {
        match (u64::try_from(self.0), u64::try_from(self.1)) {
            (Ok(offset), Ok(count)) => Ok(Limit::Range { offset, count }),
            _ => Err(invalid(format_args!("({}, {})", self.0, self.1))),
        }
    }
}

impl IntoLimit for (i32, i32) {
    fn into_limit(self) -> Result<Limit> {
        (self.0 as i64, self.1 as i64).into_limit()
    }
}

impl IntoLimit for &str {
    /// Accepts `"5"` or `"10,5"` (whitespace around the parts is ignored).
    fn into_limit(self) -> Result<Limit> {
        let parts: Vec<&str> = self.split(',').map(str::trim).collect();

        let parse = |part: &str| part.parse::<u64>().map_err(|_| invalid(self));

        match parts[..] {
            [count] => Ok(Limit::Count(parse(count)?)),
            [offset, count] => Ok(Limit::Range {
                offset: parse(offset)?,
                count: parse(count)?,
            }),
            _ => Err(invalid(self)),
        }
    }
}

impl IntoLimit for String {
    fn into_limit(self) -> Result<Limit> {
        self.as_str().into_limit()
    }
}

impl IntoLimit for Value {
    fn into_limit(self) -> Result<Limit> {
        match self {
            Value::I64(n) => n.into_limit(),
            Value::String(raw) => raw.into_limit(),
            value => Err(invalid(value)),
        }
    }
}
