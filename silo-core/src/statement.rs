use crate::{ColumnRef, Cond, EntityDescriptor, Record};

/// Sort direction of one ORDER BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub column: ColumnRef,
    pub direction: Direction,
}

/// Finalized state of one query.
///
/// Immutable once produced by `QueryBuilder::build`; execution renders it
/// fully before submitting anything, so a spec can never change mid-flight.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub descriptor: &'static EntityDescriptor,
    pub cond: Cond,
    /// Sort keys in declaration order, the first being the primary key of the
    /// sort.
    pub order: Vec<OrderKey>,
    /// Selected columns; empty means all columns of the descriptor.
    pub projection: Vec<ColumnRef>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl QuerySpec {
    /// A spec with an empty condition tree: matches every row.
    pub fn match_all(descriptor: &'static EntityDescriptor) -> Self {
        Self {
            descriptor,
            cond: Cond::All,
            order: Vec::new(),
            projection: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsertSpec {
    pub descriptor: &'static EntityDescriptor,
    /// One record per row to insert; records list only the columns that carry
    /// a value.
    pub rows: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct UpdateSpec {
    pub descriptor: &'static EntityDescriptor,
    pub assignments: Record,
    pub cond: Cond,
}

#[derive(Debug, Clone)]
pub struct DeleteSpec {
    pub descriptor: &'static EntityDescriptor,
    pub cond: Cond,
}

/// A fully planned statement, ready for a dialect strategy to turn into a
/// backend query.
#[derive(Debug, Clone)]
pub enum Statement {
    Select(QuerySpec),
    /// `SELECT COUNT(*)` over the same WHERE clause as the spec.
    Count(QuerySpec),
    Exists(QuerySpec),
    Insert(InsertSpec),
    Update(UpdateSpec),
    Delete(DeleteSpec),
    CreateTable {
        descriptor: &'static EntityDescriptor,
        if_not_exists: bool,
    },
    DropTable {
        descriptor: &'static EntityDescriptor,
        if_exists: bool,
    },
}
