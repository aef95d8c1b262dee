mod entity;
pub use entity::{Entity, EntityBuilder};

mod field;
pub use field::{DefaultRule, Field, FieldKind, FieldName};
