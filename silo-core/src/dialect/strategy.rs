use crate::{DatabaseKind, Query, SqlWriter, Statement};

/// Everything the engine needs to address one database kind: the dialect
/// identifier, the writer that renders it, and the translation of a planned
/// statement into the query form the backend accepts.
pub trait DialectStrategy: Send + Sync {
    /// The database kind this strategy serves.
    fn kind(&self) -> DatabaseKind;

    /// Identifier of the SQL dialect used for rendering.
    fn dialect(&self) -> &'static str;

    fn sql_writer(&self) -> &dyn SqlWriter;

    /// Turn a planned statement into an executable query.
    ///
    /// SQL dialects render text here; backends that interpret plans directly
    /// pass the statement through instead.
    fn prepare(&self, statement: Statement) -> Query {
        let mut out = String::with_capacity(256);
        self.sql_writer().write_statement(&mut out, &statement);
        Query::Raw(out)
    }
}
