use super::Error;

/// Error when a database connection cannot be established or used.
///
/// This occurs when:
/// - The pool cannot open its minimum number of connections (unreachable
///   host, bad credentials, unknown database)
/// - A connection is requested from a pool that is draining or closed
#[derive(Debug)]
pub(super) struct ConnectionError {
    message: Option<Box<str>>,
    inner: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConnectionError {
    pub(super) fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_ref()
            .map(|err| err.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("connection error")?;

        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }

        // Walk the source chain of the wrapped error
        let mut source = self.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates a connection error wrapping the driver's connect failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: None,
            inner: Some(Box::new(err)),
        }))
    }

    /// Creates a connection error with a plain message.
    pub fn connection_message(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Connection(ConnectionError {
            message: Some(message.into().into()),
            inner: None,
        }))
    }

    /// The error returned by every pool operation once shutdown has begun.
    pub fn connection_closed() -> Error {
        Error::connection_message("connection pool is closed")
    }

    /// Returns `true` if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Connection(_)))
    }
}
