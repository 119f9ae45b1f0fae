mod mysql;
mod postgres;
mod registry;
mod sqlite;
mod strategy;

pub use mysql::*;
pub use postgres::*;
pub use registry::*;
pub use sqlite::*;
pub use strategy::*;

use std::fmt::{self, Display};

/// Closed set of database kinds the layer can address.
///
/// The kind is the key under which a pool selects its dialect strategy; an
/// unregistered kind is a hard error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    MySql,
    Postgres,
    Sqlite,
    /// Process-local reference backend, used by tests and tooling.
    Memory,
}

impl Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatabaseKind::MySql => "mysql",
            DatabaseKind::Postgres => "postgres",
            DatabaseKind::Sqlite => "sqlite",
            DatabaseKind::Memory => "memory",
        })
    }
}
