use crate::{
    ColumnDef, EntityColumn, EntityDescriptor, QueryBuilder, Record, Result, RowLabeled, TableRef,
    Value,
};

/// A struct mapped to a table, as generated by `#[derive(Entity)]`.
///
/// The descriptor is built once per type and cached for the process
/// lifetime; all metadata accessors read from it.
pub trait Entity: Sized + Send + Sync + 'static {
    /// Typed column references for this entity.
    type Column: EntityColumn;

    fn descriptor() -> &'static EntityDescriptor;

    fn table_ref() -> &'static TableRef {
        Self::descriptor().table()
    }

    fn columns() -> &'static [ColumnDef] {
        Self::descriptor().columns()
    }

    fn primary_key_def() -> &'static ColumnDef {
        Self::descriptor().primary_key_def()
    }

    /// Map a labeled row into an entity.
    ///
    /// Lookup is lenient: a column that is missing from the row, or whose
    /// value cannot be coerced into the field type, leaves the field at its
    /// default value.
    fn from_row(row: &RowLabeled) -> Result<Self>;

    /// The mirror of [`Self::from_row`]: persistable fields as
    /// column-name-keyed values, NULLs skipped.
    fn to_record(&self) -> Record;

    fn primary_key_value(&self) -> Value;

    /// Start building a query against this entity.
    fn query() -> QueryBuilder<Self> {
        QueryBuilder::new()
    }
}
