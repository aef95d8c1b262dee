use super::Field;
use crate::{Error, Result};

use std::collections::HashSet;

/// A validated entity definition: the table it maps to, its primary key and
/// its remaining fields in declaration order.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Logical name, used as the registry key
    pub name: String,

    /// Table the entity is stored in
    pub table: String,

    pub primary_key: Field,

    /// Non-key fields, in declaration order
    pub fields: Vec<Field>,
}

#[derive(Debug)]
pub struct EntityBuilder {
    name: String,
    table: Option<String>,
    fields: Vec<Field>,
}

impl Entity {
    pub fn builder(name: impl Into<String>) -> EntityBuilder {
        EntityBuilder {
            name: name.into(),
            table: None,
            fields: vec![],
        }
    }

    /// Looks a field up by name, primary key included.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.columns().find(|field| field.app_name() == name)
    }

    /// Looks a field up by the name of its column.
    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.columns().find(|field| field.storage_name() == column)
    }

    /// Every field, primary key first, in select-list order.
    pub fn columns(&self) -> impl Iterator<Item = &Field> {
        std::iter::once(&self.primary_key).chain(self.fields.iter())
    }
}

impl EntityBuilder {
    /// Overrides the table name. Defaults to the entity name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Entity> {
        let table = self.table.unwrap_or_else(|| self.name.clone());

        if self.name.is_empty() {
            return Err(Error::invalid_schema("entity name is empty"));
        }

        if table.is_empty() {
            return Err(Error::invalid_schema(format!(
                "table name for `{}` is empty",
                self.name
            )));
        }

        let mut names = HashSet::new();
        let mut columns = HashSet::new();

        for field in &self.fields {
            if field.app_name().is_empty() || field.storage_name().is_empty() {
                return Err(Error::invalid_schema(format!(
                    "`{}` declares a field with an empty name",
                    self.name
                )));
            }

            if !names.insert(field.app_name()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate field `{}` in `{}`",
                    field.app_name(),
                    self.name
                )));
            }

            if !columns.insert(field.storage_name()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate column `{}` in `{}`",
                    field.storage_name(),
                    self.name
                )));
            }
        }

        let mut primary_key: Option<Field> = None;
        let mut fields = Vec::with_capacity(self.fields.len());

        for field in self.fields {
            if !field.primary_key {
                fields.push(field);
                continue;
            }

            if let Some(existing) = &primary_key {
                return Err(Error::invalid_schema(format!(
                    "duplicate primary key for `{}`: `{}` and `{}`",
                    self.name,
                    existing.app_name(),
                    field.app_name()
                )));
            }

            primary_key = Some(field);
        }

        let Some(primary_key) = primary_key else {
            return Err(Error::invalid_schema(format!(
                "primary key not found for `{}`",
                self.name
            )));
        };

        Ok(Entity {
            name: self.name,
            table,
            primary_key,
            fields,
        })
    }
}
