use crate::Error;

/// Error when pool or driver options are inconsistent, e.g. `minsize`
/// larger than `maxsize`.
#[derive(Debug)]
pub(super) struct InvalidDriverConfiguration {
    pub(super) message: Box<str>,
}

impl Error {
    pub fn invalid_driver_configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidDriverConfiguration(
            InvalidDriverConfiguration {
                message: message.into().into(),
            },
        ))
    }

    pub fn is_invalid_driver_configuration(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidDriverConfiguration(_)))
    }
}

impl std::fmt::Display for InvalidDriverConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid driver configuration: {}", self.message)
    }
}
