use crate::{Ident, Limit, NUM_ALIAS};

use ormlet_core::{Result, Value};

/// Composes an ad-hoc `SELECT` on top of a pre-rendered base statement.
///
/// Clauses are always emitted in `WHERE`, `ORDER BY`, `LIMIT` order
/// regardless of the order the builder methods are called in, and arguments
/// are returned in the order their placeholders appear.
#[derive(Debug, Clone)]
pub struct Select {
    base: String,
    filter: Option<String>,
    args: Vec<Value>,
    order_by: Option<String>,
    limit: Option<Limit>,
}

impl Select {
    pub fn new(base: impl Into<String>) -> Select {
        Select {
            base: base.into(),
            filter: None,
            args: vec![],
            order_by: None,
            limit: None,
        }
    }

    /// Selects a single scalar expression, aliased so it can be read back by
    /// name, instead of the entity's columns.
    pub fn scalar(expr: &str, table: &str) -> Select {
        Select::new(format!(
            "SELECT {expr} {} FROM {}",
            Ident(NUM_ALIAS),
            Ident(table)
        ))
    }

    /// Sets the `WHERE` clause. An empty expression leaves the scan
    /// unrestricted, but `args` are still bound.
    pub fn filter(
        mut self,
        expr: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Select {
        let expr = expr.into();
        self.filter = (!expr.trim().is_empty()).then_some(expr);
        self.args = args.into_iter().collect();
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Select {
        let expr = expr.into();
        self.order_by = (!expr.trim().is_empty()).then_some(expr);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Select {
        self.limit = Some(limit);
        self
    }

    /// Renders the statement. Fails if the limit does not fit a signed
    /// 64-bit integer.
    pub fn build(self) -> Result<(String, Vec<Value>)> {
        let mut sql = vec![self.base];
        let mut params = self.args;

        if let Some(expr) = self.filter {
            sql.push("WHERE".to_string());
            sql.push(expr);
        }

        if let Some(expr) = self.order_by {
            sql.push("ORDER BY".to_string());
            sql.push(expr);
        }

        if let Some(limit) = self.limit {
            let (fragment, args) = limit.to_sql()?;
            sql.push("LIMIT".to_string());
            sql.push(fragment.to_string());
            params.extend(args);
        }

        Ok((sql.join(" "), params))
    }
}
