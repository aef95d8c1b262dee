mod value;
pub(crate) use value::Value;

use mysql_async::{prelude::Queryable, prelude::ToValue, Conn, Opts, OptsBuilder};
use ormlet_core::{
    async_trait,
    driver::{ConnectOptions, Driver, Operation, Response},
    Error, Result, Row,
};
use ormlet_sql::Flavor;

#[derive(Debug)]
pub struct MySQL {
    opts: Opts,
}

impl MySQL {
    pub fn new(options: &ConnectOptions) -> Self {
        let mut init = vec![format!("SET NAMES {}", options.charset)];
        init.push(format!(
            "SET autocommit = {}",
            if options.autocommit { 1 } else { 0 }
        ));

        let opts = OptsBuilder::default()
            .ip_or_hostname(options.host.clone())
            .tcp_port(options.port)
            .user(Some(options.user.clone()))
            .pass(Some(options.password.clone()))
            .db_name(Some(options.db.clone()))
            .init(init)
            .client_found_rows(true);

        Self { opts: opts.into() }
    }
}

#[async_trait]
impl Driver for MySQL {
    async fn connect(&self) -> Result<Box<dyn ormlet_core::Connection>> {
        let conn = Conn::new(self.opts.clone())
            .await
            .map_err(Error::connection)?;

        tracing::debug!(
            host = %self.opts.ip_or_hostname(),
            db = ?self.opts.db_name(),
            "opened mysql connection"
        );
        Ok(Box::new(Connection::new(conn)))
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    async fn query(
        &mut self,
        sql: &str,
        args: Vec<mysql_async::Value>,
        limit: Option<usize>,
    ) -> Result<Vec<Row>> {
        let mut result = self
            .conn
            .exec_iter(sql, mysql_async::Params::Positional(args))
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut raw = vec![];

        while limit.map_or(true, |limit| raw.len() < limit) {
            let Some(row) = result.next().await.map_err(Error::driver_operation_failed)? else {
                break;
            };
            raw.push(row);
        }

        // Discard whatever is left past the limit so the connection is clean
        // for its next user.
        result
            .drop_result()
            .await
            .map_err(Error::driver_operation_failed)?;

        raw.into_iter().map(into_row).collect()
    }
}

fn into_row(row: mysql_async::Row) -> Result<Row> {
    let columns = row.columns();
    let values = row.unwrap();

    columns
        .iter()
        .zip(values)
        .map(|(column, value)| {
            Ok((
                column.name_str().into_owned(),
                Value::from_sql(value)?.into_inner(),
            ))
        })
        .collect()
}

#[async_trait]
impl ormlet_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let sql = Flavor::Mysql.translate(op.sql()).into_owned();
        let args = op
            .params()
            .iter()
            .map(|param| Value::from(param.clone()).to_value())
            .collect::<Vec<_>>();

        match op {
            Operation::Query { limit, .. } => {
                Ok(Response::rows(self.query(&sql, args, limit).await?))
            }
            Operation::Execute { .. } => {
                self.conn
                    .exec_drop(&sql, mysql_async::Params::Positional(args))
                    .await
                    .map_err(Error::driver_operation_failed)?;

                Ok(Response::count(self.conn.affected_rows()))
            }
        }
    }
}
