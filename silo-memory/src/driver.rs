use silo_core::{DatabaseKind, DialectStrategy, GenericSqlWriter, Query, SqlWriter, Statement};

/// Strategy for the in-memory backend.
///
/// There is no SQL dialect to render: planned statements pass through and
/// the connection interprets them. The generic writer is still exposed so
/// logging can display a readable rendition.
pub struct MemoryDialect {
    writer: GenericSqlWriter,
}

impl MemoryDialect {
    pub const fn new() -> Self {
        Self {
            writer: GenericSqlWriter::new(),
        }
    }
}

impl Default for MemoryDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectStrategy for MemoryDialect {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Memory
    }

    fn dialect(&self) -> &'static str {
        "memory"
    }

    fn sql_writer(&self) -> &dyn SqlWriter {
        &self.writer
    }

    fn prepare(&self, statement: Statement) -> Query {
        Query::Planned(statement)
    }
}
