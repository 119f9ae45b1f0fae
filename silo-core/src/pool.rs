use crate::{DatabaseKind, Executor, Result};
use std::{future::Future, ops::DerefMut};

/// A source of pooled connections.
///
/// `acquire` borrows a connection; the guard returns it on drop, on every
/// exit path, so the engine can never leak one. The pool alone governs
/// concurrent borrow/release; callers hold a guard only for the duration of
/// one statement.
pub trait Pool: Send + Sync {
    type Connection: Executor;
    type Guard<'p>: DerefMut<Target = Self::Connection> + Send
    where
        Self: 'p;

    /// Kind of the backend the pooled connections talk to, used to resolve
    /// the dialect strategy.
    fn kind(&self) -> DatabaseKind;

    fn acquire(&self) -> impl Future<Output = Result<Self::Guard<'_>>> + Send;
}
