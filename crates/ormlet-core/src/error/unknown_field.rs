use super::Error;

/// Error when a model is read or written through a field name its entity
/// does not declare.
#[derive(Debug)]
pub(super) struct UnknownField {
    entity: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownField {}

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "`{}` has no field named `{}`", self.entity, self.field)
    }
}

impl Error {
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownField {
            entity: entity.into().into(),
            field: field.into().into(),
        }))
    }

    pub fn is_unknown_field(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnknownField(_)))
    }
}
