use crate::{Error, IntoLimit, Limit, Result, Value};

use ormlet_sql::Select;

/// Optional clauses of a `find_all` or `find_number` call.
///
/// `filter` and `order_by` are raw SQL fragments; values belong in `args`,
/// bound to `?` placeholders in the filter. A limit that cannot be
/// interpreted, or arguments given without a filter to bind them to, are
/// reported when the query runs, before anything is sent to the database.
#[derive(Debug, Default)]
pub struct Query {
    filter: Option<String>,
    args: Vec<Value>,
    order_by: Option<String>,
    limit: Option<Result<Limit>>,
}

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    /// `WHERE` expression, e.g. ``"`email` = ?"``.
    pub fn filter(mut self, expr: impl Into<String>) -> Query {
        self.filter = Some(expr.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<Value>) -> Query {
        self.args.push(arg.into());
        self
    }

    pub fn args<I>(mut self, args: I) -> Query
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `ORDER BY` expression, e.g. ``"`created_at` DESC"``.
    pub fn order_by(mut self, expr: impl Into<String>) -> Query {
        self.order_by = Some(expr.into());
        self
    }

    /// A row count, an `(offset, count)` pair, or a string such as `"10,5"`.
    pub fn limit(mut self, limit: impl IntoLimit) -> Query {
        self.limit = Some(limit.into_limit());
        self
    }

    pub(crate) fn into_select(self, mut select: Select) -> Result<Select> {
        let filter = self.filter.filter(|expr| !expr.trim().is_empty());

        match filter {
            Some(filter) => select = select.filter(filter, self.args),
            None if !self.args.is_empty() => {
                return Err(Error::invalid_value(format!(
                    "{} argument(s) given without a filter",
                    self.args.len()
                )));
            }
            None => {}
        }

        if let Some(order_by) = self.order_by {
            select = select.order_by(order_by);
        }

        if let Some(limit) = self.limit {
            select = select.limit(limit?);
        }

        Ok(select)
    }
}
