use crate::{
    Expression, OpPrecedence, SqlWriter, TableRef, Value,
    writer::Context,
};

/// Typed field reference generated alongside each entity.
///
/// The derive macro produces one enum variant per persistable field, so query
/// code names columns through the type system instead of string literals.
pub trait EntityColumn: Copy + Send + Sync + 'static {
    /// Logical definition (column metadata).
    fn def(&self) -> &'static ColumnDef;
    /// Reference used in expressions.
    fn column_ref(&self) -> ColumnRef {
        self.def().column_ref
    }
}

/// Fully-qualified reference to a table column.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    /// Column name.
    pub name: &'static str,
    /// Table name.
    pub table: &'static str,
    /// Schema name (may be empty).
    pub schema: &'static str,
}

impl ColumnRef {
    pub fn table(&self) -> TableRef {
        TableRef {
            name: self.table,
            schema: self.schema,
        }
    }
}

/// Indicates whether a column is the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    PrimaryKey,
    #[default]
    None,
}

/// Declarative specification of a table column.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Logical field name on the entity.
    pub field: &'static str,
    /// Column identity.
    pub column_ref: ColumnRef,
    /// `Value` template describing the column type.
    pub value: Value,
    /// Nullability flag.
    pub nullable: bool,
    /// Primary key participation.
    pub primary_key: PrimaryKeyType,
    /// Unique constraint.
    pub unique: bool,
}

impl ColumnDef {
    pub fn name(&self) -> &'static str {
        self.column_ref.name
    }
    pub fn table(&self) -> &'static str {
        self.column_ref.table
    }
    pub fn schema(&self) -> &'static str {
        self.column_ref.schema
    }
    pub fn is_primary_key(&self) -> bool {
        self.primary_key == PrimaryKeyType::PrimaryKey
    }
}

impl<'a> From<&'a ColumnDef> for &'a ColumnRef {
    fn from(value: &'a ColumnDef) -> Self {
        &value.column_ref
    }
}

impl OpPrecedence for ColumnRef {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000
    }
}

impl Expression for ColumnRef {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_column_ref(context, out, self);
    }
}

impl OpPrecedence for ColumnDef {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000
    }
}

impl Expression for ColumnDef {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_column_ref(context, out, &self.column_ref);
    }
}
