use ormlet::{
    driver::{async_trait, Connection, Driver, Operation, Response},
    Error, Result,
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering::SeqCst},
        Arc,
    },
    time::Duration,
};

/// Connection bookkeeping shared by a [`CountingDriver`] and every
/// connection it opens.
#[derive(Debug, Default)]
pub struct Counters {
    /// Connections ever opened
    pub opened: AtomicUsize,

    /// Connections open right now
    pub open: AtomicUsize,

    /// Most connections open at the same time
    pub peak: AtomicUsize,

    /// Statements completed
    pub executed: AtomicUsize,

    /// Connections running a statement right now
    pub busy: AtomicUsize,

    /// Most connections running a statement at the same time
    pub peak_busy: AtomicUsize,
}

/// A driver with no database behind it. Queries return no rows and other
/// statements report one affected row, after an optional delay.
#[derive(Debug, Clone, Default)]
pub struct CountingDriver {
    counters: Arc<Counters>,
    delay: Duration,
    refuse: bool,
}

impl CountingDriver {
    pub fn new() -> CountingDriver {
        CountingDriver::default()
    }

    /// Every connection attempt fails, as with an unreachable server.
    pub fn refusing() -> CountingDriver {
        CountingDriver {
            refuse: true,
            ..CountingDriver::default()
        }
    }

    pub fn delay(mut self, delay: Duration) -> CountingDriver {
        self.delay = delay;
        self
    }

    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }
}

#[async_trait]
impl Driver for CountingDriver {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        if self.refuse {
            return Err(Error::connection(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        self.counters.opened.fetch_add(1, SeqCst);
        let open = self.counters.open.fetch_add(1, SeqCst) + 1;
        self.counters.peak.fetch_max(open, SeqCst);

        Ok(Box::new(CountingConnection {
            counters: self.counters.clone(),
            delay: self.delay,
        }))
    }
}

#[derive(Debug)]
pub struct CountingConnection {
    counters: Arc<Counters>,
    delay: Duration,
}

#[async_trait]
impl Connection for CountingConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let busy = self.counters.busy.fetch_add(1, SeqCst) + 1;
        self.counters.peak_busy.fetch_max(busy, SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.counters.busy.fetch_sub(1, SeqCst);
        self.counters.executed.fetch_add(1, SeqCst);

        if op.sql().contains("fail") {
            return Err(Error::driver_operation_failed(std::io::Error::other(
                "statement rejected",
            )));
        }

        match op {
            Operation::Query { .. } => Ok(Response::rows(vec![])),
            Operation::Execute { .. } => Ok(Response::count(1)),
        }
    }
}

impl Drop for CountingConnection {
    fn drop(&mut self) {
        self.counters.open.fetch_sub(1, SeqCst);
    }
}
