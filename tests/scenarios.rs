use rust_decimal::Decimal;
use silo::{DialectRegistry, Engine, Entity, Error, QuerySpec, Repository};
use silo_memory::{MemoryDialect, MemoryPool};
use std::sync::Arc;
use time::PrimitiveDateTime;

#[derive(Entity, Default, Clone, Debug, PartialEq)]
#[silo(name = "users")]
struct User {
    id: i64,
    status: Option<String>,
    age: Option<i32>,
    balance: Option<Decimal>,
    verified: Option<bool>,
    created_at: Option<PrimitiveDateTime>,
}

fn engine(connections: usize) -> Engine<MemoryPool> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = DialectRegistry::default();
    registry.register(Arc::new(MemoryDialect::new()));
    Engine::new(&registry, MemoryPool::new(connections)).unwrap()
}

fn user(id: i64, status: &str, age: i32, balance: i64, verified: bool) -> User {
    User {
        id,
        status: Some(status.to_owned()),
        age: Some(age),
        balance: Some(Decimal::new(balance, 0)),
        verified: Some(verified),
        created_at: None,
    }
}

/// Five rows, three of which match the scenario condition.
async fn seed(repository: &Repository<'_, User, MemoryPool>) {
    repository.create_table(false).await.unwrap();
    let users = [
        user(1, "ACTIVE", 20, 10, false),
        user(2, "ACTIVE", 16, 150, true),
        user(3, "INACTIVE", 30, 200, true),
        user(4, "INACTIVE", 25, 50, true),
        user(5, "ACTIVE", 17, 10, false),
    ];
    let affected = repository.insert_many(users.iter()).await.unwrap();
    assert_eq!(affected.rows_affected, 5);
}

fn scenario_condition() -> QuerySpec {
    User::query()
        .eq(UserColumn::Status, "ACTIVE")
        .ge(UserColumn::Age, 18)
        .or(|sub| {
            sub.ge(UserColumn::Balance, 100)
                .eq(UserColumn::Verified, true)
        })
        .order_by_asc(UserColumn::Id)
        .build()
        .unwrap()
}

#[tokio::test]
async fn condition_tree_selects_exactly_the_matching_rows() {
    let engine = engine(4);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let found = repository.find_by(scenario_condition()).await.unwrap();
    let ids: Vec<i64> = found.iter().map(|u| u.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(found[1], user(2, "ACTIVE", 16, 150, true));
}

#[tokio::test]
async fn empty_condition_behaves_like_find_all() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let all = repository.find_all().await.unwrap();
    let matched = repository
        .find_by(QuerySpec::match_all(User::descriptor()))
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all, matched);
}

#[tokio::test]
async fn paging_yields_bounded_pages_and_correct_totals() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let spec = User::query().order_by_asc(UserColumn::Id).build().unwrap();

    let mut sizes = Vec::new();
    for number in 1..=3 {
        let page = repository.page(spec.clone(), number, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.number, number);
        assert!(page.items.len() <= page.size as usize);
        sizes.push(page.items.len());
    }
    assert_eq!(sizes, [2, 2, 1]);

    let beyond = repository.page(spec.clone(), 4, 2).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);

    assert!(matches!(
        repository.page(spec.clone(), 1, 0).await,
        Err(Error::InvalidPage { .. })
    ));
    assert!(matches!(
        repository.page(spec, 0, 2).await,
        Err(Error::InvalidPage { .. })
    ));
}

#[tokio::test]
async fn empty_membership_matches_no_rows() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let spec = User::query()
        .is_in(UserColumn::Id, Vec::<i64>::new())
        .build()
        .unwrap();
    assert!(repository.find_by(spec.clone()).await.unwrap().is_empty());
    assert_eq!(repository.count_by(spec).await.unwrap(), 0);
}

#[tokio::test]
async fn count_and_exists() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    assert_eq!(repository.count().await.unwrap(), 5);
    assert_eq!(
        repository.count_by(scenario_condition()).await.unwrap(),
        3
    );
    assert!(repository.exists(3i64).await.unwrap());
    assert!(!repository.exists(999i64).await.unwrap());
    assert!(repository.exists_by(scenario_condition()).await.unwrap());
    let none = User::query()
        .eq(UserColumn::Status, "MISSING")
        .build()
        .unwrap();
    assert!(!repository.exists_by(none).await.unwrap());
}

#[tokio::test]
async fn find_by_id_and_first() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let found = repository.find_by_id(2i64).await.unwrap().unwrap();
    assert_eq!(found, user(2, "ACTIVE", 16, 150, true));
    assert_eq!(repository.find_by_id(42i64).await.unwrap(), None);

    let spec = User::query()
        .eq(UserColumn::Status, "INACTIVE")
        .order_by_desc(UserColumn::Age)
        .build()
        .unwrap();
    let first = repository.find_first(spec).await.unwrap().unwrap();
    assert_eq!(first.id, 3);
}

#[tokio::test]
async fn update_addresses_rows_by_primary_key() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let mut target = repository.find_by_id(4i64).await.unwrap().unwrap();
    target.status = Some("ACTIVE".into());
    target.age = Some(26);
    let affected = repository.update(&target).await.unwrap();
    assert_eq!(affected.rows_affected, 1);
    let reloaded = repository.find_by_id(4i64).await.unwrap().unwrap();
    assert_eq!(reloaded.status.as_deref(), Some("ACTIVE"));
    assert_eq!(reloaded.age, Some(26));
    assert_eq!(repository.count().await.unwrap(), 5);
}

#[tokio::test]
async fn delete_by_primary_key() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let affected = repository.delete(5i64).await.unwrap();
    assert_eq!(affected.rows_affected, 1);
    assert_eq!(repository.count().await.unwrap(), 4);
    assert!(!repository.exists(5i64).await.unwrap());
    let affected = repository.delete(5i64).await.unwrap();
    assert_eq!(affected.rows_affected, 0);
}

#[tokio::test]
async fn projection_maps_partial_entities() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let spec = User::query()
        .select([UserColumn::Id, UserColumn::Status])
        .order_by_asc(UserColumn::Id)
        .build()
        .unwrap();
    let found = repository.find_by(spec).await.unwrap();
    assert_eq!(found.len(), 5);
    assert_eq!(found[0].id, 1);
    assert_eq!(found[0].status.as_deref(), Some("ACTIVE"));
    // Projected-away columns stay unset.
    assert_eq!(found[0].age, None);
    assert_eq!(found[0].balance, None);
}

#[tokio::test]
async fn ordering_applies_keys_in_declaration_order() {
    let engine = engine(2);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let spec = User::query()
        .order_by_asc(UserColumn::Status)
        .order_by_desc(UserColumn::Age)
        .build()
        .unwrap();
    let found = repository.find_by(spec).await.unwrap();
    let ids: Vec<i64> = found.iter().map(|u| u.id).collect();
    // ACTIVE by age descending first, then INACTIVE by age descending.
    assert_eq!(ids, [1, 5, 2, 3, 4]);
}

#[tokio::test]
async fn raw_sql_is_an_execution_error_on_the_memory_backend() {
    let engine = engine(1);
    let error = engine.fetch_raw("SELECT 1").await.unwrap_err();
    assert!(matches!(error, Error::Execution(..)));
    assert!(!error.is_validation());
}

#[tokio::test]
async fn a_closed_pool_surfaces_exhaustion() {
    let engine = engine(1);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    engine.pool().close();
    assert!(matches!(
        repository.count().await,
        Err(Error::PoolExhausted)
    ));
}

#[tokio::test]
async fn concurrent_queries_share_the_pool() {
    let engine = engine(1);
    let repository = engine.repository::<User>();
    seed(&repository).await;
    let (all, count) = tokio::join!(repository.find_all(), repository.count());
    assert_eq!(all.unwrap().len(), 5);
    assert_eq!(count.unwrap(), 5);
}

#[tokio::test]
async fn create_table_twice_respects_if_not_exists() {
    let engine = engine(1);
    let repository = engine.repository::<User>();
    repository.create_table(false).await.unwrap();
    assert!(repository.create_table(false).await.is_err());
    repository.create_table(true).await.unwrap();
    repository.drop_table(false).await.unwrap();
    assert!(repository.drop_table(false).await.is_err());
    repository.drop_table(true).await.unwrap();
}
