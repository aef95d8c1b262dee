pub mod config;
pub use config::Config;

pub mod db;
pub use db::Db;

pub mod driver;

mod model;
pub use model::Model;

mod query;
pub use query::Query;

pub mod schema;
pub use schema::{EntityType, Registry};

pub use ormlet_core::{
    bail, err,
    schema::{DefaultRule, Entity, EntityBuilder, Field, FieldKind},
    Error, Result, Row, Type, Value,
};
pub use ormlet_sql::{IntoLimit, Limit};
