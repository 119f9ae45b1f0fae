use crate::{Database, interpret};
use anyhow::anyhow;
use silo_core::{
    DatabaseKind, Error, Executor, Query, QueryResult, Result, truncate_long,
    stream::{self, Stream},
};

/// A connection into the shared in-memory storage.
///
/// Interpretation is synchronous under the storage lock; results are
/// materialized before streaming, so the lock is never held across awaits.
pub struct MemoryConnection {
    database: Database,
}

impl MemoryConnection {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl Executor for MemoryConnection {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Memory
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let results = match query {
            Query::Planned(statement) => interpret::run(&self.database, statement),
            Query::Raw(sql) => vec![Err(Error::execution(anyhow!(
                "the memory backend cannot execute raw SQL: {}",
                truncate_long!(sql)
            )))],
        };
        stream::iter(results)
    }
}
