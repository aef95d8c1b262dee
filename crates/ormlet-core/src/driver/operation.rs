use crate::Value;

/// A single statement to run on a connection.
///
/// SQL uses the portable `?` placeholder; drivers translate it to their
/// native syntax.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Run a statement that returns rows, keeping at most `limit` of them.
    Query {
        sql: String,
        params: Vec<Value>,
        limit: Option<usize>,
    },

    /// Run a mutating statement and report the affected-row count.
    Execute { sql: String, params: Vec<Value> },
}

impl Operation {
    pub fn query(sql: impl Into<String>, params: Vec<Value>, limit: Option<usize>) -> Operation {
        Operation::Query {
            sql: sql.into(),
            params,
            limit,
        }
    }

    pub fn execute(sql: impl Into<String>, params: Vec<Value>) -> Operation {
        Operation::Execute {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        match self {
            Operation::Query { sql, .. } | Operation::Execute { sql, .. } => sql,
        }
    }

    pub fn params(&self) -> &[Value] {
        match self {
            Operation::Query { params, .. } | Operation::Execute { params, .. } => params,
        }
    }
}
