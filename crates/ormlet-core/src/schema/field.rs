use crate::{Type, Value};

use std::{fmt, sync::Arc};

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name
    pub name: FieldName,

    /// Storage type of the backing column
    pub ty: Type,

    /// Declared kind, shown in diagnostics
    pub kind: FieldKind,

    /// Column definition, e.g. `varchar(50)`
    pub ddl: String,

    /// True if the field is the primary key
    pub primary_key: bool,

    /// How to fill the field when a model is saved without a value for it
    pub default: Option<DefaultRule>,
}

/// The kind a field was declared as. Several kinds can share a storage
/// [`Type`]: `string` and `text` are both stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Text,
    Integer,
    Boolean,
    Float,
}

impl From<Type> for FieldKind {
    fn from(ty: Type) -> FieldKind {
        match ty {
            Type::Bool => FieldKind::Boolean,
            Type::Integer => FieldKind::Integer,
            Type::Float => FieldKind::Float,
            Type::Text => FieldKind::String,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::String => "StringField",
            FieldKind::Text => "TextField",
            FieldKind::Integer => "IntegerField",
            FieldKind::Boolean => "BooleanField",
            FieldKind::Float => "FloatField",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub app_name: String,
    pub storage_name: Option<String>,
}

impl FieldName {
    pub fn storage_name(&self) -> &str {
        self.storage_name.as_ref().unwrap_or(&self.app_name)
    }
}

/// Default value for a field.
///
/// Only resolved when a model is saved or a caller explicitly asks for the
/// value-or-default of a field.
#[derive(Clone)]
pub enum DefaultRule {
    /// Used as-is.
    Constant(Value),

    /// Invoked once per resolution; the result is written back to the model.
    Provider(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultRule {
    pub fn resolve(&self) -> Value {
        match self {
            DefaultRule::Constant(value) => value.clone(),
            DefaultRule::Provider(provider) => provider(),
        }
    }
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultRule::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            DefaultRule::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Field {
        Field {
            name: FieldName {
                app_name: name.into(),
                storage_name: None,
            },
            ty,
            kind: FieldKind::from(ty),
            ddl: ty.default_ddl().to_string(),
            primary_key: false,
            default: None,
        }
    }

    /// A `varchar(100)` column.
    pub fn string(name: impl Into<String>) -> Field {
        Field::new(name, Type::Text)
    }

    /// A `mediumtext` column.
    pub fn text(name: impl Into<String>) -> Field {
        Field {
            kind: FieldKind::Text,
            ..Field::new(name, Type::Text).ddl("mediumtext")
        }
    }

    pub fn integer(name: impl Into<String>) -> Field {
        Field::new(name, Type::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Field {
        Field::new(name, Type::Bool)
    }

    pub fn float(name: impl Into<String>) -> Field {
        Field::new(name, Type::Float)
    }

    pub fn primary_key(mut self) -> Field {
        self.primary_key = true;
        self
    }

    /// Store the field in a column with a different name.
    pub fn column(mut self, name: impl Into<String>) -> Field {
        self.name.storage_name = Some(name.into());
        self
    }

    pub fn ddl(mut self, ddl: impl Into<String>) -> Field {
        self.ddl = ddl.into();
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Field {
        self.default = Some(DefaultRule::Constant(value.into()));
        self
    }

    pub fn default_with<F>(mut self, provider: F) -> Field
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultRule::Provider(Arc::new(provider)));
        self
    }

    pub fn app_name(&self) -> &str {
        &self.name.app_name
    }

    pub fn storage_name(&self) -> &str {
        self.name.storage_name()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}:{}>", self.kind, self.ddl, self.name.app_name)
    }
}
