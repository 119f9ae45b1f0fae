//! Row-to-entity mapping helpers shared by the generated `from_row` code.
//!
//! Lookup tolerates the case folding different drivers apply to column
//! labels, and coercion failure deliberately leaves a field unset instead of
//! failing the row: partial projections and stray driver types must not take
//! the whole result set down. The miss is logged at trace level.

use crate::{AsValue, Entity, Result, RowLabeled, Value};

/// Find a column under its canonical name, then its upper-case and
/// lower-case variants. First hit wins.
pub fn lookup<'r>(row: &'r RowLabeled, column: &str) -> Option<&'r Value> {
    row.get_column(column)
        .or_else(|| row.get_column(&column.to_uppercase()))
        .or_else(|| row.get_column(&column.to_lowercase()))
}

/// Coerce a raw value into a field type, treating failure as absence.
pub fn coerce<T: AsValue>(value: &Value, entity: &str, field: &str) -> Option<T> {
    match T::try_from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::trace!("leaving `{}.{}` unset: {}", entity, field, e);
            None
        }
    }
}

/// Map every row of a result set.
pub fn map_entities<E: Entity>(rows: &[RowLabeled]) -> Result<Vec<E>> {
    rows.iter().map(E::from_row).collect()
}

/// Map the first row of a result set, if any.
pub fn first_entity<E: Entity>(rows: &[RowLabeled]) -> Result<Option<E>> {
    rows.first().map(E::from_row).transpose()
}
