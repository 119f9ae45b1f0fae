use crate::{
    BinaryOpType, ColumnRef, Expression, OpPrecedence, RowLabeled, SqlWriter, UnaryOpType, Value,
    writer::Context,
};
use std::cmp::Ordering;

/// Comparison operators usable in a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl From<CmpOp> for BinaryOpType {
    fn from(value: CmpOp) -> Self {
        match value {
            CmpOp::Eq => BinaryOpType::Equal,
            CmpOp::Ne => BinaryOpType::NotEqual,
            CmpOp::Lt => BinaryOpType::Less,
            CmpOp::Le => BinaryOpType::LessEqual,
            CmpOp::Gt => BinaryOpType::Greater,
            CmpOp::Ge => BinaryOpType::GreaterEqual,
        }
    }
}

/// Abstract WHERE clause: predicate leaves under AND/OR connectors.
///
/// `All` is the empty tree and matches every row. Leaves always reference a
/// column of the owning entity because they are only built from typed column
/// enums or descriptor-validated field names.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    All,
    Cmp {
        column: ColumnRef,
        op: CmpOp,
        value: Value,
    },
    Between {
        column: ColumnRef,
        low: Value,
        high: Value,
        negated: bool,
    },
    In {
        column: ColumnRef,
        values: Vec<Value>,
        negated: bool,
    },
    Like {
        column: ColumnRef,
        pattern: String,
        negated: bool,
    },
    Null {
        column: ColumnRef,
        negated: bool,
    },
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
    Not(Box<Cond>),
}

impl Cond {
    pub fn is_all(&self) -> bool {
        matches!(self, Cond::All)
    }

    /// Conjunction with the empty tree as the neutral element.
    pub fn and(lhs: Cond, rhs: Cond) -> Cond {
        match (lhs, rhs) {
            (Cond::All, rhs) => rhs,
            (lhs, Cond::All) => lhs,
            (lhs, rhs) => Cond::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Disjunction with the empty tree as the neutral element.
    pub fn or(lhs: Cond, rhs: Cond) -> Cond {
        match (lhs, rhs) {
            (Cond::All, rhs) => rhs,
            (lhs, Cond::All) => lhs,
            (lhs, rhs) => Cond::Or(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn not(inner: Cond) -> Cond {
        Cond::Not(Box::new(inner))
    }

    /// Evaluate the tree against a labeled row.
    ///
    /// Comparisons against NULL (missing column included) never match, the
    /// way the rendered SQL would behave.
    pub fn matches(&self, row: &RowLabeled) -> bool {
        match self {
            Cond::All => true,
            Cond::Cmp { column, op, value } => {
                let Some(ordering) = row
                    .get_column(column.name)
                    .and_then(|actual| actual.compare(value))
                else {
                    return false;
                };
                match op {
                    CmpOp::Eq => ordering == Ordering::Equal,
                    CmpOp::Ne => ordering != Ordering::Equal,
                    CmpOp::Lt => ordering == Ordering::Less,
                    CmpOp::Le => ordering != Ordering::Greater,
                    CmpOp::Gt => ordering == Ordering::Greater,
                    CmpOp::Ge => ordering != Ordering::Less,
                }
            }
            Cond::Between {
                column,
                low,
                high,
                negated,
            } => {
                let Some(actual) = row.get_column(column.name) else {
                    return false;
                };
                let Some((to_low, to_high)) = actual.compare(low).zip(actual.compare(high)) else {
                    return false;
                };
                (to_low != Ordering::Less && to_high != Ordering::Greater) != *negated
            }
            Cond::In {
                column,
                values,
                negated,
            } => {
                let Some(actual) = row.get_column(column.name) else {
                    return false;
                };
                if actual.is_null() {
                    return false;
                }
                values
                    .iter()
                    .any(|v| actual.compare(v) == Some(Ordering::Equal))
                    != *negated
            }
            Cond::Like {
                column,
                pattern,
                negated,
            } => match row.get_column(column.name) {
                Some(Value::Varchar(Some(text))) => like_match(pattern, text) != *negated,
                _ => false,
            },
            Cond::Null { column, negated } => {
                let is_null = row.get_column(column.name).is_none_or(Value::is_null);
                is_null != *negated
            }
            Cond::And(lhs, rhs) => lhs.matches(row) && rhs.matches(row),
            Cond::Or(lhs, rhs) => lhs.matches(row) || rhs.matches(row),
            Cond::Not(inner) => !inner.matches(row),
        }
    }
}

impl OpPrecedence for Cond {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        match self {
            Cond::All => 1_000_000_000,
            Cond::Cmp { op, .. } => writer.expression_binary_op_precedence(&(*op).into()),
            Cond::Between { .. } | Cond::In { .. } => {
                writer.expression_binary_op_precedence(&BinaryOpType::Equal)
            }
            Cond::Like { .. } => writer.expression_binary_op_precedence(&BinaryOpType::Like),
            Cond::Null { .. } => writer.expression_binary_op_precedence(&BinaryOpType::Is),
            Cond::And(..) => writer.expression_binary_op_precedence(&BinaryOpType::And),
            Cond::Or(..) => writer.expression_binary_op_precedence(&BinaryOpType::Or),
            Cond::Not(..) => writer.expression_unary_op_precedence(&UnaryOpType::Not),
        }
    }
}

impl Expression for Cond {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_condition(context, out, self);
    }
}

/// SQL `LIKE` matching: `%` spans any sequence, `_` a single character.
pub(crate) fn like_match(pattern: &str, input: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let input: Vec<char> = input.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<usize> = None;
    let mut mark = 0;
    while ti < input.len() {
        if pi < pattern.len() && (pattern[pi] == '_' || pattern[pi] == input[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < pattern.len() && pattern[pi] == '%' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }
    while pi < pattern.len() && pattern[pi] == '%' {
        pi += 1;
    }
    pi == pattern.len()
}
