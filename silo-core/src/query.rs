use crate::{GenericSqlWriter, SqlWriter, Statement, truncate_long};
use std::fmt::{self, Display};

/// A query ready to be executed by an [`Executor`](crate::Executor).
///
/// `Raw` carries already-rendered SQL text; `Planned` carries the abstract
/// statement for backends that interpret it directly.
#[derive(Debug, Clone)]
pub enum Query {
    /// SQL text.
    Raw(String),
    /// Abstract statement.
    Planned(Statement),
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        Query::Raw(value)
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Query::Raw(value.to_owned())
    }
}

impl From<Statement> for Query {
    fn from(value: Statement) -> Self {
        Query::Planned(value)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(query) => write!(f, "{}", truncate_long!(query)),
            Query::Planned(statement) => {
                let mut out = String::with_capacity(256);
                GenericSqlWriter.write_statement(&mut out, statement);
                write!(f, "{}", truncate_long!(out))
            }
        }
    }
}
