mod counting_driver;
pub use counting_driver::{CountingDriver, Counters};

pub use setup::{counting_provider, create_table, init_tracing, next_id, users, Setup};

pub use ormlet::{
    db::{Pool, PoolConfig, PoolState},
    Db, Entity, EntityType, Error, Field, Model, Query, Registry, Result, Value,
};
pub use std::sync::Arc;
