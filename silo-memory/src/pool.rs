use crate::{Database, MemoryConnection};
use silo_core::{DatabaseKind, Error, Pool, Result};
use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
    sync::{Arc, Mutex},
};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Fixed-size pool of [`MemoryConnection`]s over one shared database.
///
/// `acquire` waits until a connection is free; the guard returns it on drop
/// whatever the exit path. `close` releases no further connections, turning
/// subsequent acquisitions into `PoolExhausted`.
pub struct MemoryPool {
    database: Database,
    semaphore: Semaphore,
    idle: Mutex<Vec<MemoryConnection>>,
}

impl MemoryPool {
    pub fn new(connections: usize) -> Self {
        Self::with_database(Arc::new(Mutex::new(HashMap::new())), connections)
    }

    pub fn with_database(database: Database, connections: usize) -> Self {
        let idle = (0..connections)
            .map(|_| MemoryConnection::new(database.clone()))
            .collect();
        Self {
            database,
            semaphore: Semaphore::new(connections),
            idle: Mutex::new(idle),
        }
    }

    /// Handle on the shared storage, to build further pools over it.
    pub fn database(&self) -> Database {
        self.database.clone()
    }

    /// Stop handing out connections.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Non-waiting variant of `acquire`: an empty pool is an error instead
    /// of a suspension point.
    pub fn try_acquire(&self) -> Result<MemoryPoolGuard<'_>> {
        let permit = self
            .semaphore
            .try_acquire()
            .map_err(|_| Error::PoolExhausted)?;
        Ok(self.guard(permit))
    }

    fn guard<'p>(&'p self, permit: SemaphorePermit<'p>) -> MemoryPoolGuard<'p> {
        let connection = self
            .idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .expect("permit count matches idle connections");
        MemoryPoolGuard {
            pool: self,
            connection: Some(connection),
            _permit: permit,
        }
    }
}

impl Pool for MemoryPool {
    type Connection = MemoryConnection;
    type Guard<'p> = MemoryPoolGuard<'p>;

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Memory
    }

    async fn acquire(&self) -> Result<MemoryPoolGuard<'_>> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| Error::PoolExhausted)?;
        Ok(self.guard(permit))
    }
}

/// Borrowed connection; returns itself to the pool on drop.
pub struct MemoryPoolGuard<'p> {
    pool: &'p MemoryPool,
    connection: Option<MemoryConnection>,
    _permit: SemaphorePermit<'p>,
}

impl Deref for MemoryPoolGuard<'_> {
    type Target = MemoryConnection;
    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("connection is present until drop")
    }
}

impl DerefMut for MemoryPoolGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("connection is present until drop")
    }
}

impl Drop for MemoryPoolGuard<'_> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.pool
                .idle
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(connection);
        }
    }
}
