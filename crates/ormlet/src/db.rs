mod pool;
pub use pool::*;

use crate::{
    driver::{Connection, Driver, Operation, Response},
    Result, Row, Value,
};

#[cfg(feature = "mysql")]
use crate::Config;

/// A database handle: runs statements on connections borrowed from its
/// [`Pool`].
///
/// Every call borrows a connection for exactly one statement and returns it
/// before completing, whether the statement succeeded or not. Cloning the
/// handle shares the pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: Pool,
}

impl Db {
    /// Creates the MySQL connection pool described by `config`.
    #[cfg(feature = "mysql")]
    pub async fn initialize(config: &Config) -> Result<Db> {
        tracing::info!(
            host = %config.connect.host,
            port = config.connect.port,
            db = %config.connect.db,
            "create database connection pool..."
        );
        let driver = ormlet_driver_mysql::MySQL::new(&config.connect);
        Db::with_driver(driver, config.pool_config()).await
    }

    /// Creates a MySQL connection pool from a `mysql://` URL.
    #[cfg(feature = "mysql")]
    pub async fn connect(url: &str) -> Result<Db> {
        Db::initialize(&Config::from_url(url)?).await
    }

    pub async fn with_driver(driver: impl Driver, config: PoolConfig) -> Result<Db> {
        Ok(Db {
            pool: Pool::new(driver, config).await?,
        })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Runs a query and returns its rows, at most `limit` of them if given.
    pub async fn select(
        &self,
        sql: &str,
        args: &[Value],
        limit: Option<usize>,
    ) -> Result<Vec<Row>> {
        tracing::debug!(sql, ?args, "SQL");

        let rows = self
            .exec(Operation::query(sql, args.to_vec(), limit))
            .await?
            .into_rows()?;

        tracing::debug!(rows = rows.len(), "rows returned");
        Ok(rows)
    }

    /// Runs a mutating statement and returns the affected-row count.
    pub async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        tracing::debug!(sql, ?args, "SQL");

        self.exec(Operation::execute(sql, args.to_vec()))
            .await?
            .into_count()
    }

    /// Waits for in-flight statements to finish, then closes every
    /// connection. Any later call fails with a connection error.
    pub async fn shutdown(&self) -> Result<()> {
        self.pool.shutdown().await
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut connection = self.pool.acquire().await?;
        connection.exec(op).await
    }
}

impl From<Pool> for Db {
    fn from(pool: Pool) -> Self {
        Db { pool }
    }
}
