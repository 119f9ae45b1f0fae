//! Silo: the typed data layer.
//!
//! Silo turns annotated structs into table metadata, lets callers compose
//! predicates, ordering, projection and paging through a fluent builder that
//! only accepts fields the entity actually has, renders the result in the
//! SQL dialect of the connected database, and executes it asynchronously
//! over a pooled connection. Rows map back into entities through a single,
//! deliberately lenient coercion funnel.
//!
//! The pieces compose left to right:
//!
//! 1. `#[derive(Entity)]` resolves every field to a column once and caches
//!    the resulting descriptor for the process lifetime.
//! 2. [`QueryBuilder`] accumulates a condition tree against those columns
//!    and finalizes into an immutable [`QuerySpec`].
//! 3. A [`DialectRegistry`] maps the pool's [`DatabaseKind`] to the
//!    [`DialectStrategy`] that renders the statement.
//! 4. The [`Engine`] borrows a pooled connection, runs the query, and hands
//!    rows to the entity mapper.
//!
//! ```
//! use silo::{DatabaseKind, DialectRegistry, Entity, Statement};
//!
//! #[derive(Entity, Default, Clone)]
//! #[silo(name = "users")]
//! struct User {
//!     id: i64,
//!     status: Option<String>,
//! }
//!
//! let spec = User::query()
//!     .eq(UserColumn::Status, "ACTIVE")
//!     .order_by_asc(UserColumn::Id)
//!     .build()
//!     .unwrap();
//! let registry = DialectRegistry::default();
//! let strategy = registry.get(DatabaseKind::Postgres).unwrap();
//! let query = strategy.prepare(Statement::Select(spec));
//! assert!(query.to_string().starts_with("SELECT"));
//! ```

pub use silo_core::*;
pub use silo_macros::Entity;
