use crate::DatabaseKind;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures produced by the query layer.
///
/// Validation variants are raised synchronously, before any statement reaches
/// a connection. Execution variants travel through the result future with the
/// backend cause preserved; nothing is retried here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("unknown field `{field}` on entity `{entity}`")]
    UnknownField {
        entity: &'static str,
        field: String,
    },
    #[error(
        "fields `{first}` and `{second}` of entity `{entity}` both resolve to column `{column}`"
    )]
    DuplicateColumn {
        entity: &'static str,
        first: &'static str,
        second: &'static str,
        column: String,
    },
    #[error("no dialect strategy registered for database kind `{0}`")]
    UnsupportedKind(DatabaseKind),
    #[error("invalid page request: number {number} and size {size} must both be positive")]
    InvalidPage { number: u64, size: u64 },
    #[error("operator on column `{column}` requires non-null bounds")]
    NullBound { column: &'static str },
    #[error("cannot convert {value} into {target}")]
    Conversion {
        value: String,
        target: &'static str,
    },
    #[error("connection pool exhausted")]
    PoolExhausted,
    #[error("no row found")]
    NotFound,
    #[error("query execution failed: {0}")]
    Execution(Arc<anyhow::Error>),
}

impl Error {
    pub fn execution(cause: anyhow::Error) -> Self {
        Self::Execution(Arc::new(cause))
    }

    /// Whether this failure was raised by validation, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. }
                | Self::DuplicateColumn { .. }
                | Self::UnsupportedKind(..)
                | Self::InvalidPage { .. }
                | Self::NullBound { .. }
        )
    }
}

impl From<anyhow::Error> for Error {
    fn from(cause: anyhow::Error) -> Self {
        Self::Execution(Arc::new(cause))
    }
}
