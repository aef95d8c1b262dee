pub use ormlet_core::{
    async_trait,
    driver::{ConnectOptions, Connection, Driver, Operation, Response},
};

#[cfg(feature = "mysql")]
pub use ormlet_driver_mysql::MySQL;

#[cfg(feature = "sqlite")]
pub use ormlet_driver_sqlite::Sqlite;
