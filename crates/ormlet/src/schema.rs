//! Entity registration.

use crate::{Entity, EntityBuilder, Error, Model, Query, Result, Value};
use crate::{db::Db, Field};

use indexmap::IndexMap;
use ormlet_sql::{Select, Templates, NUM_ALIAS};
use std::sync::Arc;

/// A registered entity: its validated definition and the statements
/// rendered from it.
///
/// Immutable once registered, and shared by every [`Model`] of the entity.
#[derive(Debug)]
pub struct EntityType {
    entity: Entity,
    templates: Templates,
}

impl EntityType {
    pub fn new(entity: Entity) -> EntityType {
        let templates = Templates::new(&entity);
        EntityType { entity, templates }
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    pub fn table(&self) -> &str {
        &self.entity.table
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    pub fn primary_key(&self) -> &Field {
        &self.entity.primary_key
    }

    /// Non-key fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.entity.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.entity.field(name)
    }

    /// A new, unsaved model with no field set.
    pub fn create(self: &Arc<Self>) -> Model {
        Model::new(self.clone())
    }

    /// Loads the row with the given primary key.
    pub async fn find(self: &Arc<Self>, db: &Db, pk: impl Into<Value>) -> Result<Option<Model>> {
        let rows = db.select(&self.templates.find, &[pk.into()], Some(1)).await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(Model::from_row(self.clone(), row)?)),
            None => Ok(None),
        }
    }

    /// Loads every row matching `query`, in result order.
    pub async fn find_all(self: &Arc<Self>, db: &Db, query: Query) -> Result<Vec<Model>> {
        let (sql, args) = query
            .into_select(Select::new(self.templates.select.as_str()))?
            .build()?;

        db.select(&sql, &args, None)
            .await?
            .into_iter()
            .map(|row| Model::from_row(self.clone(), row))
            .collect()
    }

    /// Evaluates a scalar expression such as `count(id)` over the rows
    /// matching `query`. Returns `None` when no row comes back.
    pub async fn find_number(&self, db: &Db, expr: &str, query: Query) -> Result<Option<Value>> {
        let (sql, args) = query
            .into_select(Select::scalar(expr, &self.entity.table))?
            .build()?;

        let rows = db.select(&sql, &args, Some(1)).await?;

        let Some(mut row) = rows.into_iter().next() else {
            return Ok(None);
        };

        match row.shift_remove(NUM_ALIAS) {
            Some(value) => Ok(Some(value)),
            None => Err(Error::invalid_result(format!(
                "scalar query did not return a `{NUM_ALIAS}` column"
            ))),
        }
    }
}

/// Every entity known to the application, keyed by entity name.
///
/// Entities are registered once at startup, before any query runs.
#[derive(Debug, Default)]
pub struct Registry {
    entities: IndexMap<String, Arc<EntityType>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Validates the entity, renders its statements and stores it.
    ///
    /// Fails if the definition is invalid (see [`EntityBuilder::build`]) or
    /// an entity of the same name was already registered.
    pub fn register(&mut self, entity: EntityBuilder) -> Result<Arc<EntityType>> {
        let entity = entity.build()?;

        if self.entities.contains_key(&entity.name) {
            return Err(Error::invalid_schema(format!(
                "entity `{}` is already registered",
                entity.name
            )));
        }

        tracing::info!(entity = %entity.name, table = %entity.table, "found model");
        for field in entity.columns() {
            tracing::debug!(
                entity = %entity.name,
                "found mapping: {} ==> {field}",
                field.app_name()
            );
        }

        let entity_type = Arc::new(EntityType::new(entity));
        self.entities
            .insert(entity_type.name().to_string(), entity_type.clone());

        Ok(entity_type)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EntityType>> {
        self.entities.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
