use crate::{ColumnRef, Expression, OpPrecedence, SqlWriter, Value, writer::Context};

/// Leaf expression nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Asterisk,
    LitBool(bool),
    LitInt(i128),
    Column(ColumnRef),
    Variable(Value),
}

impl OpPrecedence for Operand {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000_000
    }
}

impl Expression for Operand {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_operand(context, out, self);
    }
}
