//! Process-local reference backend for Silo.
//!
//! Tables live in a shared in-memory map and planned statements are
//! interpreted directly, without SQL text in between. This is the backend
//! the integration tests run the full pipeline against; raw SQL is rejected
//! so the execution-error path stays honest.

mod connection;
mod driver;
mod interpret;
mod pool;

pub use connection::*;
pub use driver::*;
pub use pool::*;

use silo_core::{Row, RowNames};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// One stored table: canonical column labels plus row data.
#[derive(Debug, Clone)]
pub struct MemTable {
    pub labels: RowNames,
    pub rows: Vec<Row>,
}

/// Shared storage behind every connection of one pool.
pub type Database = Arc<Mutex<HashMap<String, MemTable>>>;
