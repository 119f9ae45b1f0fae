use crate::{DatabaseKind, DialectStrategy, SqlWriter, Value};
use std::fmt::Write;

pub struct MySqlDialect {
    writer: MySqlSqlWriter,
}

impl MySqlDialect {
    pub const fn new() -> Self {
        Self {
            writer: MySqlSqlWriter {},
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectStrategy for MySqlDialect {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::MySql
    }
    fn dialect(&self) -> &'static str {
        "mysql"
    }
    fn sql_writer(&self) -> &dyn SqlWriter {
        &self.writer
    }
}

pub struct MySqlSqlWriter;

impl SqlWriter for MySqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_column_type(&self, out: &mut String, value: &Value) {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) => out.push_str("TINYINT"),
            Value::Int16(..) => out.push_str("SMALLINT"),
            Value::Int32(..) => out.push_str("INTEGER"),
            Value::Int64(..) => out.push_str("BIGINT"),
            Value::UInt8(..) => out.push_str("TINYINT UNSIGNED"),
            Value::UInt16(..) => out.push_str("SMALLINT UNSIGNED"),
            Value::UInt32(..) => out.push_str("INTEGER UNSIGNED"),
            Value::UInt64(..) => out.push_str("BIGINT UNSIGNED"),
            Value::Float32(..) => out.push_str("FLOAT"),
            Value::Float64(..) => out.push_str("DOUBLE"),
            Value::Decimal(.., precision, scale) => {
                out.push_str("DECIMAL");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            Value::Varchar(..) => out.push_str("TEXT"),
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) => out.push_str("DATETIME"),
            Value::Uuid(..) => out.push_str("CHAR(36)"),
            Value::Null => out.push_str("TEXT"),
        };
    }

    /// MySQL's `LIMIT offset, count` form. An offset without a limit needs
    /// the documented all-rows sentinel.
    fn write_limit_offset(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (Some(limit), Some(offset)) => {
                let _ = write!(out, "\nLIMIT {}, {}", offset, limit);
            }
            (Some(limit), None) => {
                let _ = write!(out, "\nLIMIT {}", limit);
            }
            (None, Some(offset)) => {
                let _ = write!(out, "\nLIMIT {}, 18446744073709551615", offset);
            }
            (None, None) => {}
        }
    }
}
