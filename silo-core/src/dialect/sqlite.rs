use crate::{DatabaseKind, DialectStrategy, SqlWriter, Value};
use std::fmt::Write;

pub struct SqliteDialect {
    writer: SqliteSqlWriter,
}

impl SqliteDialect {
    pub const fn new() -> Self {
        Self {
            writer: SqliteSqlWriter {},
        }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectStrategy for SqliteDialect {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Sqlite
    }
    fn dialect(&self) -> &'static str {
        "sqlite"
    }
    fn sql_writer(&self) -> &dyn SqlWriter {
        &self.writer
    }
}

pub struct SqliteSqlWriter;

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    /// Everything maps onto SQLite's storage affinities.
    fn write_column_type(&self, out: &mut String, value: &Value) {
        match value {
            Value::Boolean(..)
            | Value::Int8(..)
            | Value::Int16(..)
            | Value::Int32(..)
            | Value::Int64(..)
            | Value::UInt8(..)
            | Value::UInt16(..)
            | Value::UInt32(..)
            | Value::UInt64(..) => out.push_str("INTEGER"),
            Value::Float32(..) | Value::Float64(..) => out.push_str("REAL"),
            Value::Decimal(.., precision, scale) => {
                out.push_str("REAL");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            Value::Blob(..) => out.push_str("BLOB"),
            _ => out.push_str("TEXT"),
        };
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    /// SQLite accepts `OFFSET` only after a `LIMIT`; `-1` means unbounded.
    fn write_limit_offset(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (Some(limit), Some(offset)) => {
                let _ = write!(out, "\nLIMIT {}\nOFFSET {}", limit, offset);
            }
            (Some(limit), None) => {
                let _ = write!(out, "\nLIMIT {}", limit);
            }
            (None, Some(offset)) => {
                let _ = write!(out, "\nLIMIT -1\nOFFSET {}", offset);
            }
            (None, None) => {}
        }
    }
}
