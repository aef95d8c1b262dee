use super::Error;

/// Error when a caller-supplied value has the wrong shape, such as a limit
/// that is neither a count nor an `(offset, count)` pair.
///
/// Raised before any statement is sent to the database.
#[derive(Debug)]
pub(super) struct InvalidValue {
    message: Box<str>,
}

impl std::error::Error for InvalidValue {}

impl core::fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid value: {}", self.message)
    }
}

impl Error {
    pub fn invalid_value(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidValue(InvalidValue {
            message: message.into().into(),
        }))
    }

    pub fn is_invalid_value(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidValue(_)))
    }
}
