use crate::{db::Db, EntityType, Error, Field, Result, Row, Value};

use indexmap::IndexMap;
use std::sync::Arc;

/// An instance of a registered entity: field name to value.
///
/// Built either by the caller through [`EntityType::create`], with only the
/// fields it sets, or by hydrating a fetched row, with every stored field
/// present. Reading or writing a name the entity does not declare is an
/// error.
#[derive(Debug, Clone)]
pub struct Model {
    entity: Arc<EntityType>,
    values: IndexMap<String, Value>,
}

impl Model {
    pub(crate) fn new(entity: Arc<EntityType>) -> Model {
        Model {
            entity,
            values: IndexMap::new(),
        }
    }

    /// Maps a row's columns back onto field names, coercing each value to its
    /// field's storage type. Columns the entity does not declare are skipped.
    pub(crate) fn from_row(entity: Arc<EntityType>, row: Row) -> Result<Model> {
        let mut values = IndexMap::with_capacity(row.len());

        for (column, value) in row {
            let Some(field) = entity.entity().field_by_column(&column) else {
                continue;
            };

            values.insert(field.app_name().to_string(), value.cast(field.ty)?);
        }

        Ok(Model { entity, values })
    }

    pub fn entity(&self) -> &Arc<EntityType> {
        &self.entity
    }

    /// The current value of a field, or `None` if it was never set.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        self.field(name)?;
        Ok(self.values.get(name))
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?.app_name().to_string();
        self.values.insert(field, value.into());
        Ok(())
    }

    /// Chained form of [`Model::set`] for building new instances.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Model> {
        self.set(name, value)?;
        Ok(self)
    }

    /// The current value of a field, resolving and storing its default if
    /// the field is unset or null.
    ///
    /// A provider default is invoked at most once per model: the value it
    /// produces is written back, so later reads see the same value.
    pub fn get_or_default(&mut self, name: &str) -> Result<Option<Value>> {
        let entity = self.entity.clone();
        let field = match entity.field(name) {
            Some(field) => field,
            None => return Err(self.unknown_field(name)),
        };

        Ok(self.value_or_default(field))
    }

    pub fn primary_key(&self) -> Option<&Value> {
        self.values.get(self.entity.primary_key().app_name())
    }

    /// Fields that currently hold a value.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Inserts the model as a new row.
    ///
    /// Unset fields take their default, which is also written back onto the
    /// model; unset fields without a default are stored as NULL. A row count
    /// other than one is logged, not returned as an error.
    pub async fn save(&mut self, db: &Db) -> Result<()> {
        let entity = self.entity.clone();

        let mut args: Vec<Value> = entity
            .fields()
            .iter()
            .map(|field| self.value_or_default(field).unwrap_or_default())
            .collect();
        args.push(
            self.value_or_default(entity.primary_key())
                .unwrap_or_default(),
        );

        let rows = db.execute(&entity.templates().insert, &args).await?;
        if rows != 1 {
            tracing::warn!(
                entity = %entity.name(),
                affected = rows,
                "failed to insert record"
            );
        }

        Ok(())
    }

    /// Writes every non-key field's current value to the row with this
    /// model's primary key. Defaults are not applied.
    pub async fn update(&self, db: &Db) -> Result<()> {
        let entity = &self.entity;

        let mut args: Vec<Value> = entity
            .fields()
            .iter()
            .map(|field| self.current(field))
            .collect();
        args.push(self.current(entity.primary_key()));

        let rows = db.execute(&entity.templates().update, &args).await?;
        if rows != 1 {
            tracing::warn!(
                entity = %entity.name(),
                affected = rows,
                "failed to update by primary key"
            );
        }

        Ok(())
    }

    /// Deletes the row with this model's primary key. The model itself is
    /// left untouched and can be saved again.
    pub async fn remove(&self, db: &Db) -> Result<()> {
        let entity = &self.entity;
        let args = [self.current(entity.primary_key())];

        let rows = db.execute(&entity.templates().delete, &args).await?;
        if rows != 1 {
            tracing::warn!(
                entity = %entity.name(),
                affected = rows,
                "failed to remove by primary key"
            );
        }

        Ok(())
    }

    fn field(&self, name: &str) -> Result<&Field> {
        self.entity
            .field(name)
            .ok_or_else(|| self.unknown_field(name))
    }

    fn unknown_field(&self, name: &str) -> Error {
        Error::unknown_field(self.entity.name(), name)
    }

    fn current(&self, field: &Field) -> Value {
        self.values
            .get(field.app_name())
            .cloned()
            .unwrap_or_default()
    }

    fn value_or_default(&mut self, field: &Field) -> Option<Value> {
        match self.values.get(field.app_name()) {
            Some(value) if !value.is_null() => return Some(value.clone()),
            current => {
                let Some(default) = &field.default else {
                    return current.cloned();
                };

                let value = default.resolve();
                tracing::debug!(
                    entity = %self.entity.name(),
                    field = field.app_name(),
                    %value,
                    "using default value"
                );
                self.values.insert(field.app_name().to_string(), value.clone());
                Some(value)
            }
        }
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Model) -> bool {
        Arc::ptr_eq(&self.entity, &other.entity) && self.values == other.values
    }
}
