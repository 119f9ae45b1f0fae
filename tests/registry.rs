use silo::{DatabaseKind, DialectRegistry, Engine, Error};
use silo_memory::{MemoryDialect, MemoryPool};
use std::sync::Arc;

#[test]
fn built_in_dialects_are_registered_by_default() {
    let registry = DialectRegistry::default();
    assert!(registry.supports(DatabaseKind::MySql));
    assert!(registry.supports(DatabaseKind::Postgres));
    assert!(registry.supports(DatabaseKind::Sqlite));
    assert!(!registry.supports(DatabaseKind::Memory));
    assert_eq!(registry.kinds().count(), 3);
}

#[test]
fn lookup_of_an_unregistered_kind_is_an_explicit_error() {
    let registry = DialectRegistry::default();
    match registry.get(DatabaseKind::Memory) {
        Err(e @ Error::UnsupportedKind(kind)) => {
            assert_eq!(kind, DatabaseKind::Memory);
            assert!(e.is_validation());
            assert!(e.to_string().contains("memory"));
        }
        Ok(_) => panic!("an unregistered kind must never resolve to a strategy"),
        Err(other) => panic!("unexpected error: {}", other),
    }
    assert!(matches!(
        DialectRegistry::empty().get(DatabaseKind::Postgres),
        Err(Error::UnsupportedKind(DatabaseKind::Postgres))
    ));
}

#[test]
fn registration_is_keyed_on_the_strategy_kind() {
    let mut registry = DialectRegistry::default();
    registry.register(Arc::new(MemoryDialect::new()));
    assert!(registry.supports(DatabaseKind::Memory));
    let strategy = registry.get(DatabaseKind::Memory).unwrap();
    assert_eq!(strategy.kind(), DatabaseKind::Memory);
    assert_eq!(strategy.dialect(), "memory");
}

#[test]
fn engine_construction_fails_fast_on_an_unsupported_pool() {
    let registry = DialectRegistry::default();
    let pool = MemoryPool::new(1);
    match Engine::new(&registry, pool) {
        Err(Error::UnsupportedKind(DatabaseKind::Memory)) => {}
        _ => panic!("expected the engine to reject a pool without a strategy"),
    }
}
