use crate::{ColumnDef, Error, Result, TableRef};

/// Resolved metadata describing how an entity maps to a table.
///
/// Built once per entity type (the derive publishes it through a `LazyLock`
/// static) and immutable afterwards; concurrent first access is safe because
/// publication is compute-once.
#[derive(Debug)]
pub struct EntityDescriptor {
    entity: &'static str,
    table: TableRef,
    columns: Box<[ColumnDef]>,
    primary_key: usize,
}

impl EntityDescriptor {
    /// Validates and assembles a descriptor.
    ///
    /// Two fields resolving to the same column name is a configuration error
    /// and is reported here rather than swallowed; the derive macro rejects
    /// the same situation at compile time already.
    pub fn try_new(
        entity: &'static str,
        table: TableRef,
        columns: Vec<ColumnDef>,
        primary_key: usize,
    ) -> Result<Self> {
        for (i, a) in columns.iter().enumerate() {
            if let Some(b) = columns[i + 1..].iter().find(|b| b.name() == a.name()) {
                return Err(Error::DuplicateColumn {
                    entity,
                    first: a.field,
                    second: b.field,
                    column: a.name().to_owned(),
                });
            }
        }
        if primary_key >= columns.len() {
            return Err(Error::UnknownField {
                entity,
                field: format!("primary key column #{}", primary_key),
            });
        }
        Ok(Self {
            entity,
            table,
            columns: columns.into_boxed_slice(),
            primary_key,
        })
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn primary_key_def(&self) -> &ColumnDef {
        &self.columns[self.primary_key]
    }

    /// Look a column up by its logical field name.
    pub fn column_by_field(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Look a column up by its resolved column name.
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Like [`Self::column_by_field`] but failing with a validation error.
    pub fn require_field(&self, field: &str) -> Result<&ColumnDef> {
        self.column_by_field(field).ok_or_else(|| Error::UnknownField {
            entity: self.entity,
            field: field.to_owned(),
        })
    }
}
