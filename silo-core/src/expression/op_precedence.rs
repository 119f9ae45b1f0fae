use crate::SqlWriter;

/// Binding strength of an expression node, used to decide parenthesization.
///
/// Delegated to the writer so a dialect can reorder its own operator table.
pub trait OpPrecedence {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32;
}

impl<T: OpPrecedence + ?Sized> OpPrecedence for &T {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        (**self).precedence(writer)
    }
}
