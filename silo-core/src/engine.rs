use crate::{
    DialectRegistry, DialectStrategy, Entity, Executor, Pool, Query, Repository, Result,
    RowLabeled, RowsAffected, Statement,
    stream::TryStreamExt,
};
use std::sync::Arc;

/// Executes planned statements against a pooled backend.
///
/// The dialect strategy is resolved once at construction from the pool's
/// kind — an unsupported kind fails here, before any query is attempted.
/// Rendering happens entirely before submission; the borrowed connection is
/// returned by its guard on success and failure alike.
pub struct Engine<P: Pool> {
    strategy: Arc<dyn DialectStrategy>,
    pool: P,
}

impl<P: Pool> Engine<P> {
    pub fn new(registry: &DialectRegistry, pool: P) -> Result<Self> {
        let strategy = registry.get(pool.kind())?;
        Ok(Self { strategy, pool })
    }

    pub fn strategy(&self) -> &dyn DialectStrategy {
        self.strategy.as_ref()
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// A facade over this engine for one entity type.
    pub fn repository<E: Entity>(&self) -> Repository<'_, E, P> {
        Repository::new(self)
    }

    /// Run a planned statement and collect the resulting rows.
    pub async fn fetch(&self, statement: Statement) -> Result<Vec<RowLabeled>> {
        self.fetch_query(self.strategy.prepare(statement)).await
    }

    /// Run a planned statement and collect its modify effect.
    pub async fn execute(&self, statement: Statement) -> Result<RowsAffected> {
        self.execute_query(self.strategy.prepare(statement)).await
    }

    /// Row query from hand-written SQL.
    pub async fn fetch_raw(&self, sql: impl Into<String>) -> Result<Vec<RowLabeled>> {
        self.fetch_query(Query::Raw(sql.into())).await
    }

    /// Modify statement from hand-written SQL.
    pub async fn execute_raw(&self, sql: impl Into<String>) -> Result<RowsAffected> {
        self.execute_query(Query::Raw(sql.into())).await
    }

    async fn fetch_query(&self, query: Query) -> Result<Vec<RowLabeled>> {
        log::debug!("fetch [{}]: {}", self.strategy.dialect(), query);
        let mut connection = self.pool.acquire().await?;
        connection.fetch(query).try_collect().await
    }

    async fn execute_query(&self, query: Query) -> Result<RowsAffected> {
        log::debug!("execute [{}]: {}", self.strategy.dialect(), query);
        let mut connection = self.pool.acquire().await?;
        connection.execute(query).await
    }
}
