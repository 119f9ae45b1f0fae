use crate::{DatabaseKind, DialectStrategy, Error, MySqlDialect, PostgresDialect, Result, SqliteDialect};
use std::{collections::HashMap, sync::Arc};

/// Explicitly constructed mapping from database kind to dialect strategy.
///
/// Built once at startup and passed down to the engines that need it; the
/// read path takes no lock because the map is never mutated after
/// construction. `Default` registers the built-in SQL dialects.
pub struct DialectRegistry {
    strategies: HashMap<DatabaseKind, Arc<dyn DialectStrategy>>,
}

impl DialectRegistry {
    /// A registry with no strategies at all.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register a strategy under its own kind, replacing any previous entry.
    pub fn register(&mut self, strategy: Arc<dyn DialectStrategy>) -> &mut Self {
        self.strategies.insert(strategy.kind(), strategy);
        self
    }

    pub fn supports(&self, kind: DatabaseKind) -> bool {
        self.strategies.contains_key(&kind)
    }

    /// The strategy for `kind`, or `Error::UnsupportedKind` — never a
    /// guessed default.
    pub fn get(&self, kind: DatabaseKind) -> Result<Arc<dyn DialectStrategy>> {
        self.strategies
            .get(&kind)
            .cloned()
            .ok_or(Error::UnsupportedKind(kind))
    }

    pub fn kinds(&self) -> impl Iterator<Item = DatabaseKind> + '_ {
        self.strategies.keys().copied()
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Arc::new(MySqlDialect::new()))
            .register(Arc::new(PostgresDialect::new()))
            .register(Arc::new(SqliteDialect::new()));
        registry
    }
}
