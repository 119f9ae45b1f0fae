use crate::{
    BinaryOp, BinaryOpType, ColumnDef, ColumnRef, Cond, DeleteSpec, EntityDescriptor, Expression,
    InsertSpec, OpPrecedence, Operand, OrderKey, QuerySpec, Statement, TableRef, UnaryOp, UnaryOpType,
    UpdateSpec, Value, possibly_parenthesized, separated_by,
    statement::Direction,
    writer::Context,
};
use std::fmt::Write;
use time::{Date, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($out, $value < 0.0);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Renders planned statements as SQL text.
///
/// Default methods produce the portable flavor; dialect writers override the
/// points where their SQL diverges (identifier quoting, column types, literal
/// forms, LIMIT/OFFSET syntax).
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_table_ref(&self, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(out, value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(out, value.name);
    }

    fn write_column_ref(&self, context: &mut Context, out: &mut String, value: &ColumnRef) {
        if context.qualify_columns && !value.table.is_empty() {
            if !value.schema.is_empty() {
                self.write_identifier_quoted(out, value.schema);
                out.push('.');
            }
            self.write_identifier_quoted(out, value.table);
            out.push('.');
        }
        self.write_identifier_quoted(out, value.name);
    }

    fn write_column_type(&self, out: &mut String, value: &Value) {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) => out.push_str("TINYINT"),
            Value::Int16(..) => out.push_str("SMALLINT"),
            Value::Int32(..) => out.push_str("INTEGER"),
            Value::Int64(..) => out.push_str("BIGINT"),
            Value::UInt8(..) => out.push_str("UTINYINT"),
            Value::UInt16(..) => out.push_str("USMALLINT"),
            Value::UInt32(..) => out.push_str("UINTEGER"),
            Value::UInt64(..) => out.push_str("UBIGINT"),
            Value::Float32(..) => out.push_str("FLOAT"),
            Value::Float64(..) => out.push_str("DOUBLE"),
            Value::Decimal(.., precision, scale) => {
                out.push_str("DECIMAL");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            Value::Varchar(..) => out.push_str("VARCHAR"),
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) => out.push_str("TIMESTAMP"),
            Value::Uuid(..) => out.push_str("UUID"),
            Value::Null => out.push_str("VARCHAR"),
        };
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        if value.is_null() {
            return self.write_value_none(out);
        }
        match value {
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, out, *v),
            Value::Float64(Some(v)) => write_float!(self, out, *v),
            Value::Decimal(Some(v), ..) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push(' ');
                self.write_value_time(out, &v.time());
                out.push('\'');
            }
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{}'", v);
            }
            _ => self.write_value_none(out),
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL")
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize])
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// `HH:MM:SS`, fractional seconds appended only when present.
    fn write_value_time(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond, width = width);
        }
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Negative => 1250,
            UnaryOpType::Not => 250,
        }
    }

    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
        }
    }

    fn write_expression_operand(&self, context: &mut Context, out: &mut String, value: &Operand) {
        match value {
            Operand::Null => out.push_str("NULL"),
            Operand::Asterisk => out.push('*'),
            Operand::LitBool(v) => self.write_value_bool(out, *v),
            Operand::LitInt(v) => write_integer!(out, *v),
            Operand::Column(v) => self.write_column_ref(context, out, v),
            Operand::Variable(v) => self.write_value(out, v),
        }
    }

    fn write_expression_unary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UnaryOp<&dyn Expression>,
    ) {
        match value.op {
            UnaryOpType::Negative => out.push('-'),
            UnaryOpType::Not => out.push_str("NOT "),
        };
        possibly_parenthesized!(
            out,
            value.v.precedence(self.as_dyn()) <= self.expression_unary_op_precedence(&value.op),
            value.v.write_query(self.as_dyn(), context, out)
        );
    }

    fn write_expression_binary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &BinaryOp<&dyn Expression, &dyn Expression>,
    ) {
        let infix = match value.op {
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " != ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::Like => " LIKE ",
            BinaryOpType::NotLike => " NOT LIKE ",
            BinaryOpType::Is => " IS ",
            BinaryOpType::IsNot => " IS NOT ",
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
        };
        let precedence = self.expression_binary_op_precedence(&value.op);
        possibly_parenthesized!(
            out,
            value.lhs.precedence(self.as_dyn()) < precedence,
            value.lhs.write_query(self.as_dyn(), context, out)
        );
        out.push_str(infix);
        possibly_parenthesized!(
            out,
            value.rhs.precedence(self.as_dyn()) <= precedence,
            value.rhs.write_query(self.as_dyn(), context, out)
        );
    }

    fn write_condition(&self, context: &mut Context, out: &mut String, cond: &Cond) {
        match cond {
            Cond::All => self.write_value_bool(out, true),
            Cond::Cmp { column, op, value } => {
                let lhs = Operand::Column(*column);
                let rhs = Operand::Variable(value.clone());
                let op = BinaryOp {
                    op: (*op).into(),
                    lhs: &lhs as &dyn Expression,
                    rhs: &rhs as &dyn Expression,
                };
                self.write_expression_binary_op(context, out, &op);
            }
            Cond::Between {
                column,
                low,
                high,
                negated,
            } => self.write_condition_between(context, out, column, low, high, *negated),
            Cond::In {
                column,
                values,
                negated,
            } => self.write_condition_in(context, out, column, values, *negated),
            Cond::Like {
                column,
                pattern,
                negated,
            } => {
                let lhs = Operand::Column(*column);
                let rhs = Operand::Variable(Value::Varchar(Some(pattern.clone())));
                let op = BinaryOp {
                    op: if *negated {
                        BinaryOpType::NotLike
                    } else {
                        BinaryOpType::Like
                    },
                    lhs: &lhs as &dyn Expression,
                    rhs: &rhs as &dyn Expression,
                };
                self.write_expression_binary_op(context, out, &op);
            }
            Cond::Null { column, negated } => {
                let lhs = Operand::Column(*column);
                let rhs = Operand::Null;
                let op = BinaryOp {
                    op: if *negated {
                        BinaryOpType::IsNot
                    } else {
                        BinaryOpType::Is
                    },
                    lhs: &lhs as &dyn Expression,
                    rhs: &rhs as &dyn Expression,
                };
                self.write_expression_binary_op(context, out, &op);
            }
            Cond::And(lhs, rhs) => {
                self.write_condition_connector(context, out, lhs, rhs, BinaryOpType::And)
            }
            Cond::Or(lhs, rhs) => {
                self.write_condition_connector(context, out, lhs, rhs, BinaryOpType::Or)
            }
            Cond::Not(inner) => {
                let op = UnaryOp {
                    op: UnaryOpType::Not,
                    v: inner.as_ref() as &dyn Expression,
                };
                self.write_expression_unary_op(context, out, &op);
            }
        }
    }

    /// AND/OR chains of the same connector stay flat; a nested group of the
    /// other connector is parenthesized explicitly.
    fn write_condition_connector(
        &self,
        context: &mut Context,
        out: &mut String,
        lhs: &Cond,
        rhs: &Cond,
        op: BinaryOpType,
    ) {
        let precedence = self.expression_binary_op_precedence(&op);
        let grouped = |cond: &Cond| {
            matches!(cond, Cond::And(..) | Cond::Or(..))
                && cond.precedence(self.as_dyn()) != precedence
        };
        possibly_parenthesized!(
            out,
            grouped(lhs),
            self.write_condition(context, out, lhs)
        );
        out.push_str(if op == BinaryOpType::And {
            " AND "
        } else {
            " OR "
        });
        possibly_parenthesized!(
            out,
            grouped(rhs),
            self.write_condition(context, out, rhs)
        );
    }

    /// Membership over an empty collection degenerates to a constant
    /// predicate instead of invalid SQL.
    fn write_condition_in(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &ColumnRef,
        values: &[Value],
        negated: bool,
    ) {
        if values.is_empty() {
            out.push_str(if negated { "1 = 1" } else { "1 = 0" });
            return;
        }
        self.write_column_ref(context, out, column);
        out.push_str(if negated { " NOT IN (" } else { " IN (" });
        separated_by(out, values, |out, v| self.write_value(out, v), ", ");
        out.push(')');
    }

    fn write_condition_between(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &ColumnRef,
        low: &Value,
        high: &Value,
        negated: bool,
    ) {
        self.write_column_ref(context, out, column);
        out.push_str(if negated { " NOT BETWEEN " } else { " BETWEEN " });
        self.write_value(out, low);
        out.push_str(" AND ");
        self.write_value(out, high);
    }

    fn write_order_key(&self, context: &mut Context, out: &mut String, key: &OrderKey) {
        self.write_column_ref(context, out, &key.column);
        out.push_str(match key.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
    }

    fn write_limit_offset(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        if let Some(limit) = limit {
            out.push_str("\nLIMIT ");
            write_integer!(out, limit);
        }
        if let Some(offset) = offset {
            out.push_str("\nOFFSET ");
            write_integer!(out, offset);
        }
    }

    fn write_select(&self, out: &mut String, select: &QuerySpec) {
        let mut context = Context::default();
        out.push_str("SELECT ");
        if select.projection.is_empty() {
            separated_by(
                out,
                select.descriptor.columns(),
                |out, column| self.write_column_ref(&mut context, out, &column.column_ref),
                ", ",
            );
        } else {
            separated_by(
                out,
                &select.projection,
                |out, column| self.write_column_ref(&mut context, out, column),
                ", ",
            );
        }
        out.push_str("\nFROM ");
        self.write_table_ref(out, select.descriptor.table());
        if !select.cond.is_all() {
            out.push_str("\nWHERE ");
            self.write_condition(&mut context, out, &select.cond);
        }
        if !select.order.is_empty() {
            out.push_str("\nORDER BY ");
            separated_by(
                out,
                &select.order,
                |out, key| self.write_order_key(&mut context, out, key),
                ", ",
            );
        }
        self.write_limit_offset(out, select.limit, select.offset);
        out.push(';');
    }

    fn write_count(&self, out: &mut String, select: &QuerySpec) {
        let mut context = Context::default();
        out.push_str("SELECT COUNT(*) AS ");
        self.write_identifier_quoted(out, "count");
        out.push_str("\nFROM ");
        self.write_table_ref(out, select.descriptor.table());
        if !select.cond.is_all() {
            out.push_str("\nWHERE ");
            self.write_condition(&mut context, out, &select.cond);
        }
        out.push(';');
    }

    fn write_exists(&self, out: &mut String, select: &QuerySpec) {
        let mut context = Context::default();
        out.push_str("SELECT EXISTS(SELECT 1 FROM ");
        self.write_table_ref(out, select.descriptor.table());
        if !select.cond.is_all() {
            out.push_str(" WHERE ");
            self.write_condition(&mut context, out, &select.cond);
        }
        out.push_str(") AS ");
        self.write_identifier_quoted(out, "exists");
        out.push(';');
    }

    fn write_insert(&self, out: &mut String, insert: &InsertSpec) {
        let Some(first) = insert.rows.first() else {
            return;
        };
        let single = insert.rows.len() == 1;
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, insert.descriptor.table());
        out.push_str(" (");
        if single {
            // A single row lists only the columns it carries.
            separated_by(
                out,
                first,
                |out, (name, _)| self.write_identifier_quoted(out, name),
                ", ",
            );
        } else {
            // Several rows list every column; absent values become DEFAULT.
            separated_by(
                out,
                insert.descriptor.columns(),
                |out, column| self.write_identifier_quoted(out, column.name()),
                ", ",
            );
        }
        out.push_str(") VALUES\n");
        separated_by(
            out,
            &insert.rows,
            |out, row| {
                out.push('(');
                if single {
                    separated_by(out, row, |out, (_, value)| self.write_value(out, value), ", ");
                } else {
                    separated_by(
                        out,
                        insert.descriptor.columns(),
                        |out, column| match row.iter().find(|(name, _)| *name == column.name()) {
                            Some((_, value)) => self.write_value(out, value),
                            None => out.push_str("DEFAULT"),
                        },
                        ", ",
                    );
                }
                out.push(')');
            },
            ",\n",
        );
        out.push(';');
    }

    fn write_update(&self, out: &mut String, update: &UpdateSpec) {
        let mut context = Context::default();
        out.push_str("UPDATE ");
        self.write_table_ref(out, update.descriptor.table());
        out.push_str(" SET ");
        separated_by(
            out,
            &update.assignments,
            |out, (name, value)| {
                self.write_identifier_quoted(out, name);
                out.push_str(" = ");
                self.write_value(out, value);
            },
            ", ",
        );
        if !update.cond.is_all() {
            out.push_str("\nWHERE ");
            self.write_condition(&mut context, out, &update.cond);
        }
        out.push(';');
    }

    fn write_delete(&self, out: &mut String, delete: &DeleteSpec) {
        let mut context = Context::default();
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, delete.descriptor.table());
        if !delete.cond.is_all() {
            out.push_str("\nWHERE ");
            self.write_condition(&mut context, out, &delete.cond);
        }
        out.push(';');
    }

    fn write_create_table(
        &self,
        out: &mut String,
        descriptor: &EntityDescriptor,
        if_not_exists: bool,
    ) {
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_table_ref(out, descriptor.table());
        out.push_str(" (\n");
        separated_by(
            out,
            descriptor.columns(),
            |out, column| self.write_create_table_column_fragment(out, column),
            ",\n",
        );
        out.push_str("\n);");
    }

    fn write_create_table_column_fragment(&self, out: &mut String, column: &ColumnDef) {
        self.write_identifier_quoted(out, column.name());
        out.push(' ');
        self.write_column_type(out, &column.value);
        if !column.nullable && !column.is_primary_key() {
            out.push_str(" NOT NULL");
        }
        if column.is_primary_key() {
            out.push_str(" PRIMARY KEY");
        }
        if column.unique && !column.is_primary_key() {
            out.push_str(" UNIQUE");
        }
    }

    fn write_drop_table(&self, out: &mut String, descriptor: &EntityDescriptor, if_exists: bool) {
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_ref(out, descriptor.table());
        out.push(';');
    }

    fn write_statement(&self, out: &mut String, statement: &Statement) {
        match statement {
            Statement::Select(select) => self.write_select(out, select),
            Statement::Count(select) => self.write_count(out, select),
            Statement::Exists(select) => self.write_exists(out, select),
            Statement::Insert(insert) => self.write_insert(out, insert),
            Statement::Update(update) => self.write_update(out, update),
            Statement::Delete(delete) => self.write_delete(out, delete),
            Statement::CreateTable {
                descriptor,
                if_not_exists,
            } => self.write_create_table(out, descriptor, *if_not_exists),
            Statement::DropTable {
                descriptor,
                if_exists,
            } => self.write_drop_table(out, descriptor, *if_exists),
        }
    }
}

/// Portable writer used when no dialect-specific rendering is required.
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
