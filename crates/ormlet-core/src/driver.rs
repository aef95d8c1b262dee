mod connect_options;
pub use connect_options::ConnectOptions;

mod operation;
pub use operation::Operation;

mod response;
pub use response::Response;

use crate::async_trait;

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Opens a new connection to the database.
    ///
    /// Failures to reach or authenticate against the server are reported as
    /// connection errors.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Upper bound on simultaneously open connections imposed by the backend
    /// itself, if any.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;
}
