use crate::{
    AsValue, CmpOp, ColumnRef, Cond, Direction, Entity, EntityColumn, Error, OrderKey, QuerySpec,
    Result, Value,
};
use std::marker::PhantomData;

/// Fluent condition builder for one entity type.
///
/// Every call appends to the accumulated state and returns the builder, with
/// AND as the implicit connector between sequential top-level calls. Columns
/// are referenced through the generated `E::Column` enum, so a predicate can
/// only name fields that exist; the by-name escape hatches validate against
/// the descriptor and surface `Error::UnknownField` at `build` time, before
/// any query is submitted.
///
/// `build` consumes the builder: a finalized [`QuerySpec`] can no longer be
/// mutated. To keep building from the same state, `clone` first.
pub struct QueryBuilder<E: Entity> {
    cond: Cond,
    order: Vec<OrderKey>,
    projection: Vec<ColumnRef>,
    limit: Option<u64>,
    offset: Option<u64>,
    error: Option<Error>,
    marker: PhantomData<fn() -> E>,
}

impl<E: Entity> QueryBuilder<E> {
    pub fn new() -> Self {
        Self {
            cond: Cond::All,
            order: Vec::new(),
            projection: Vec::new(),
            limit: None,
            offset: None,
            error: None,
            marker: PhantomData,
        }
    }

    fn record_error(mut self, error: Error) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    fn append(mut self, cond: Cond) -> Self {
        self.cond = Cond::and(self.cond, cond);
        self
    }

    fn compare(self, column: ColumnRef, op: CmpOp, value: impl AsValue) -> Self {
        let value = value.as_value();
        if value.is_null() {
            return self.record_error(Error::NullBound {
                column: column.name,
            });
        }
        self.append(Cond::Cmp { column, op, value })
    }

    pub fn eq(self, column: E::Column, value: impl AsValue) -> Self {
        self.compare(column.column_ref(), CmpOp::Eq, value)
    }

    pub fn ne(self, column: E::Column, value: impl AsValue) -> Self {
        self.compare(column.column_ref(), CmpOp::Ne, value)
    }

    pub fn lt(self, column: E::Column, value: impl AsValue) -> Self {
        self.compare(column.column_ref(), CmpOp::Lt, value)
    }

    pub fn le(self, column: E::Column, value: impl AsValue) -> Self {
        self.compare(column.column_ref(), CmpOp::Le, value)
    }

    pub fn gt(self, column: E::Column, value: impl AsValue) -> Self {
        self.compare(column.column_ref(), CmpOp::Gt, value)
    }

    pub fn ge(self, column: E::Column, value: impl AsValue) -> Self {
        self.compare(column.column_ref(), CmpOp::Ge, value)
    }

    /// Comparison against a field referenced by its logical name, for the
    /// dynamic cases where a typed column reference is not available.
    pub fn filter_field(self, field: &str, op: CmpOp, value: impl AsValue) -> Self {
        match E::descriptor().require_field(field) {
            Ok(def) => self.compare(def.column_ref, op, value),
            Err(error) => self.record_error(error),
        }
    }

    fn within(self, column: ColumnRef, values: Vec<Value>, negated: bool) -> Self {
        if values.iter().any(Value::is_null) {
            return self.record_error(Error::NullBound {
                column: column.name,
            });
        }
        self.append(Cond::In {
            column,
            values,
            negated,
        })
    }

    /// Membership test. An empty collection builds an always-false predicate
    /// (always-true for [`Self::not_in`]) rather than invalid SQL.
    pub fn is_in<I, V>(self, column: E::Column, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsValue,
    {
        let values = values.into_iter().map(AsValue::as_value).collect();
        self.within(column.column_ref(), values, false)
    }

    pub fn not_in<I, V>(self, column: E::Column, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsValue,
    {
        let values = values.into_iter().map(AsValue::as_value).collect();
        self.within(column.column_ref(), values, true)
    }

    fn range(
        self,
        column: ColumnRef,
        low: impl AsValue,
        high: impl AsValue,
        negated: bool,
    ) -> Self {
        let (low, high) = (low.as_value(), high.as_value());
        if low.is_null() || high.is_null() {
            return self.record_error(Error::NullBound {
                column: column.name,
            });
        }
        self.append(Cond::Between {
            column,
            low,
            high,
            negated,
        })
    }

    pub fn between(self, column: E::Column, low: impl AsValue, high: impl AsValue) -> Self {
        self.range(column.column_ref(), low, high, false)
    }

    pub fn not_between(self, column: E::Column, low: impl AsValue, high: impl AsValue) -> Self {
        self.range(column.column_ref(), low, high, true)
    }

    pub fn like(self, column: E::Column, pattern: impl Into<String>) -> Self {
        self.append(Cond::Like {
            column: column.column_ref(),
            pattern: pattern.into(),
            negated: false,
        })
    }

    pub fn not_like(self, column: E::Column, pattern: impl Into<String>) -> Self {
        self.append(Cond::Like {
            column: column.column_ref(),
            pattern: pattern.into(),
            negated: true,
        })
    }

    pub fn is_null(self, column: E::Column) -> Self {
        self.append(Cond::Null {
            column: column.column_ref(),
            negated: false,
        })
    }

    pub fn is_not_null(self, column: E::Column) -> Self {
        self.append(Cond::Null {
            column: column.column_ref(),
            negated: true,
        })
    }

    fn group(
        self,
        f: impl FnOnce(QueryBuilder<E>) -> QueryBuilder<E>,
        connect: fn(Cond, Cond) -> Cond,
    ) -> Self {
        let sub = f(QueryBuilder::new());
        if let Some(error) = sub.error {
            return self.record_error(error);
        }
        let mut this = self;
        this.cond = connect(this.cond, sub.cond);
        this
    }

    /// Nest the sub-builder's predicates under an AND connector.
    pub fn and(self, f: impl FnOnce(QueryBuilder<E>) -> QueryBuilder<E>) -> Self {
        self.group(f, Cond::and)
    }

    /// Nest the sub-builder's predicates under an OR connector.
    pub fn or(self, f: impl FnOnce(QueryBuilder<E>) -> QueryBuilder<E>) -> Self {
        self.group(f, Cond::or)
    }

    /// Negate the sub-builder's predicates as one group.
    pub fn not(self, f: impl FnOnce(QueryBuilder<E>) -> QueryBuilder<E>) -> Self {
        let sub = f(QueryBuilder::new());
        if let Some(error) = sub.error {
            return self.record_error(error);
        }
        self.append(Cond::not(sub.cond))
    }

    pub fn order_by_asc(mut self, column: E::Column) -> Self {
        self.order.push(OrderKey {
            column: column.column_ref(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_by_desc(mut self, column: E::Column) -> Self {
        self.order.push(OrderKey {
            column: column.column_ref(),
            direction: Direction::Desc,
        });
        self
    }

    /// Ordering by a field referenced by its logical name.
    pub fn order_by_field(mut self, field: &str, direction: Direction) -> Self {
        match E::descriptor().require_field(field) {
            Ok(def) => {
                self.order.push(OrderKey {
                    column: def.column_ref,
                    direction,
                });
                self
            }
            Err(error) => self.record_error(error),
        }
    }

    /// Restrict the selected columns; an empty projection selects all.
    /// Subsequent calls replace the projection.
    pub fn select(mut self, columns: impl IntoIterator<Item = E::Column>) -> Self {
        self.projection = columns.into_iter().map(|c| c.column_ref()).collect();
        self
    }

    /// Projection by logical field names.
    pub fn select_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let descriptor = E::descriptor();
        let mut projection = Vec::new();
        for field in fields {
            match descriptor.require_field(field.as_ref()) {
                Ok(def) => projection.push(def.column_ref),
                Err(error) => return self.record_error(error),
            }
        }
        self.projection = projection;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Finalize into an immutable [`QuerySpec`], surfacing the first recorded
    /// validation error.
    pub fn build(self) -> Result<QuerySpec> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(QuerySpec {
            descriptor: E::descriptor(),
            cond: self.cond,
            order: self.order,
            projection: self.projection,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

impl<E: Entity> Default for QueryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for QueryBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            cond: self.cond.clone(),
            order: self.order.clone(),
            projection: self.projection.clone(),
            limit: self.limit,
            offset: self.offset,
            error: self.error.clone(),
            marker: PhantomData,
        }
    }
}
