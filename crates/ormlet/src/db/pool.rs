//! Connection pooling for database connections.

use std::{
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicU8, AtomicUsize, Ordering::SeqCst},
        Arc,
    },
};

use deadpool::managed::{self, PoolError};
pub use deadpool::managed::Status;
use tokio::sync::Notify;

use crate::{
    driver::{Connection, Driver},
    Error, Result,
};

/// Configuration for connection pool behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Hard ceiling on simultaneously open connections.
    pub max_size: usize,

    /// Connections opened eagerly when the pool is created.
    pub min_size: usize,
}

impl PoolConfig {
    /// Creates a new pool configuration with default settings.
    pub fn new() -> Self {
        Self {
            max_size: 10,
            min_size: 1,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a [`Pool`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolState {
    /// Opening the minimum number of connections.
    Uninitialized = 0,
    /// Handing out connections.
    Ready = 1,
    /// Shutdown requested; waiting for borrowed connections to come back.
    Draining = 2,
    /// All connections closed; every operation fails.
    Closed = 3,
}

impl PoolState {
    fn from_u8(state: u8) -> PoolState {
        match state {
            0 => PoolState::Uninitialized,
            1 => PoolState::Ready,
            2 => PoolState::Draining,
            _ => PoolState::Closed,
        }
    }
}

/// A bounded pool of database connections.
///
/// Cloning the pool produces another handle to the same set of connections.
#[derive(Debug, Clone)]
pub struct Pool {
    inner: managed::Pool<Manager>,
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    state: AtomicU8,

    /// Connections currently borrowed through [`Pool::acquire`].
    in_use: AtomicUsize,

    /// Signalled when `in_use` drops to zero.
    released: Notify,
}

impl Pool {
    /// Creates a new connection pool from the given driver and opens
    /// `min_size` connections before returning.
    ///
    /// Fails with a connection error if any of those connections cannot be
    /// established.
    pub async fn new(driver: impl Driver, config: PoolConfig) -> Result<Self> {
        if config.max_size == 0 {
            return Err(Error::invalid_driver_configuration(
                "maxsize must be at least 1",
            ));
        }

        if config.min_size > config.max_size {
            return Err(Error::invalid_driver_configuration(format!(
                "minsize ({}) is larger than maxsize ({})",
                config.min_size, config.max_size
            )));
        }

        let mut max_size = config.max_size;
        if let Some(max_connections) = driver.max_connections() {
            max_size = max_size.min(max_connections);
        }
        let min_size = config.min_size.min(max_size);

        let inner = managed::Pool::builder(Manager {
            driver: Box::new(driver),
        })
        .max_size(max_size)
        .runtime(deadpool::Runtime::Tokio1)
        .build()
        .map_err(Error::connection)?;

        let shared = Arc::new(Shared {
            state: AtomicU8::new(PoolState::Uninitialized as u8),
            in_use: AtomicUsize::new(0),
            released: Notify::new(),
        });

        // Hold every connection until all are open so each `get` creates a
        // new one instead of reusing the previous.
        let mut warm = Vec::with_capacity(min_size);
        for _ in 0..min_size {
            warm.push(inner.get().await.map_err(pool_error)?);
        }
        drop(warm);

        shared.state.store(PoolState::Ready as u8, SeqCst);
        tracing::info!(max_size, min_size, "created database connection pool");

        Ok(Self { inner, shared })
    }

    /// Borrows a connection, waiting for one to be released if `max_size`
    /// connections are already in use.
    pub async fn acquire(&self) -> Result<PoolConnection> {
        if self.state() != PoolState::Ready {
            return Err(Error::connection_closed());
        }

        let inner = self.inner.get().await.map_err(pool_error)?;

        self.shared.in_use.fetch_add(1, SeqCst);
        let connection = PoolConnection {
            inner,
            shared: self.shared.clone(),
        };

        // Shutdown may have started while this call was waiting
        if self.state() != PoolState::Ready {
            return Err(Error::connection_closed());
        }

        Ok(connection)
    }

    /// Returns a connection to the pool. Dropping the connection does the
    /// same.
    pub fn release(&self, connection: PoolConnection) {
        drop(connection);
    }

    /// Stops handing out connections, waits for borrowed ones to be
    /// released, then closes every connection.
    pub async fn shutdown(&self) -> Result<()> {
        if self
            .shared
            .state
            .compare_exchange(
                PoolState::Ready as u8,
                PoolState::Draining as u8,
                SeqCst,
                SeqCst,
            )
            .is_err()
        {
            return Err(Error::connection_closed());
        }

        tracing::info!(
            in_use = self.shared.in_use.load(SeqCst),
            "draining database connection pool"
        );

        loop {
            let released = self.shared.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();

            if self.shared.in_use.load(SeqCst) == 0 {
                break;
            }

            released.await;
        }

        self.inner.close();
        self.shared.state.store(PoolState::Closed as u8, SeqCst);
        tracing::info!("closed database connection pool");

        Ok(())
    }

    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.shared.state.load(SeqCst))
    }

    /// Current size and availability of the pool.
    pub fn status(&self) -> Status {
        self.inner.status()
    }
}

fn pool_error(err: PoolError<Error>) -> Error {
    match err {
        PoolError::Backend(err) => err,
        PoolError::Closed => Error::connection_closed(),
        err => Error::connection(err),
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
}

impl managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = Error;

    async fn create(&self) -> Result<Self::Type> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &managed::Metrics,
    ) -> managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection borrowed from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
#[derive(Debug)]
pub struct PoolConnection {
    inner: managed::Object<Manager>,
    shared: Arc<Shared>,
}

impl Drop for PoolConnection {
    fn drop(&mut self) {
        if self.shared.in_use.fetch_sub(1, SeqCst) == 1 {
            self.shared.released.notify_waiters();
        }
    }
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
