mod value;
pub(crate) use value::Value;

use ormlet_core::{
    async_trait,
    driver::{Driver, Operation, Response},
    Error, Result, Row,
};
use ormlet_sql::Flavor;
use rusqlite::Connection as RusqliteConnection;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database file, creating it if missing
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    async fn connect(&self) -> Result<Box<dyn ormlet_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    /// Every in-memory connection is its own database, so the pool must
    /// hand out the same one.
    fn max_connections(&self) -> Option<usize> {
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::connection)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::connection)?;
        Ok(Self { connection })
    }

    fn query(&mut self, sql: &str, params: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        while limit.map_or(true, |limit| ret.len() < limit) {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut record = Row::with_capacity(columns.len());

                    for (index, column) in columns.iter().enumerate() {
                        let value = row.get_ref(index).map_err(Error::driver_operation_failed)?;
                        record.insert(column.clone(), Value::from_sql(value).into_inner());
                    }

                    ret.push(record);
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver_operation_failed(err)),
            }
        }

        Ok(ret)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        Ok(count as u64)
    }
}

#[async_trait]
impl ormlet_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let sql = Flavor::Sqlite.translate(op.sql()).into_owned();
        let params = op
            .params()
            .iter()
            .cloned()
            .map(Value::from)
            .collect::<Vec<_>>();

        match op {
            Operation::Query { limit, .. } => {
                Ok(Response::rows(self.query(&sql, &params, limit)?))
            }
            Operation::Execute { .. } => Ok(Response::count(self.execute(&sql, &params)?)),
        }
    }
}
