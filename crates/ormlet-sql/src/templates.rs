use crate::{placeholders, Ident};

use ormlet_core::schema::{Entity, Field};

/// Statements pre-rendered once per entity.
///
/// Argument order for each:
/// - `find`, `delete`: primary key
/// - `insert`, `update`: every non-key field in declaration order, then the
///   primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    /// `SELECT` of every column, primary key first; base for ad-hoc queries
    pub select: String,

    /// `select` restricted to one primary key
    pub find: String,

    pub insert: String,

    pub update: String,

    pub delete: String,
}

impl Templates {
    pub fn new(entity: &Entity) -> Templates {
        let table = Ident(&entity.table);
        let pk = Ident(entity.primary_key.storage_name());

        let columns = comma(entity.columns().map(column));
        let select = format!("SELECT {columns} FROM {table}");
        let find = format!("{select} WHERE {pk} = ?");

        let insert_columns = comma(
            entity
                .fields
                .iter()
                .chain(std::iter::once(&entity.primary_key))
                .map(column),
        );
        let insert = format!(
            "INSERT INTO {table} ({insert_columns}) VALUES ({})",
            placeholders(entity.fields.len() + 1)
        );

        // An entity made of its key alone still gets a well-formed update
        // that binds only the key.
        let assignments = if entity.fields.is_empty() {
            format!("{pk} = {pk}")
        } else {
            comma(
                entity
                    .fields
                    .iter()
                    .map(|field| format!("{} = ?", column(field))),
            )
        };
        let update = format!("UPDATE {table} SET {assignments} WHERE {pk} = ?");

        let delete = format!("DELETE FROM {table} WHERE {pk} = ?");

        Templates {
            select,
            find,
            insert,
            update,
            delete,
        }
    }
}

fn column(field: &Field) -> String {
    Ident(field.storage_name()).to_string()
}

fn comma(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
