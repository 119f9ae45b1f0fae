use futures::StreamExt;
use silo_core::{
    CmpOp, ColumnDef, ColumnRef, Cond, DeleteSpec, Direction, EntityDescriptor, Executor,
    InsertSpec, OrderKey, Pool, PrimaryKeyType, Query, QueryResult, QuerySpec, Record, Statement,
    TableRef, UpdateSpec, Value,
};
use silo_memory::{MemoryConnection, MemoryPool};
use std::sync::LazyLock;

fn column(field: &'static str, value: Value, primary_key: bool) -> ColumnDef {
    ColumnDef {
        field,
        column_ref: ColumnRef {
            name: field,
            table: "items",
            schema: "",
        },
        value,
        nullable: !primary_key,
        primary_key: if primary_key {
            PrimaryKeyType::PrimaryKey
        } else {
            PrimaryKeyType::None
        },
        unique: false,
    }
}

static DESCRIPTOR: LazyLock<EntityDescriptor> = LazyLock::new(|| {
    EntityDescriptor::try_new(
        "Item",
        TableRef {
            name: "items",
            schema: "",
        },
        vec![
            column("id", Value::Int64(None), true),
            column("label", Value::Varchar(None), false),
            column("rank", Value::Int32(None), false),
        ],
        0,
    )
    .unwrap()
});

fn record(id: i64, label: &str, rank: i32) -> Record {
    vec![
        ("id", Value::Int64(Some(id))),
        ("label", Value::Varchar(Some(label.to_owned()))),
        ("rank", Value::Int32(Some(rank))),
    ]
}

async fn collect(connection: &mut MemoryConnection, statement: Statement) -> Vec<QueryResult> {
    connection
        .run(Query::Planned(statement))
        .map(|v| v.unwrap())
        .collect()
        .await
}

async fn seeded(pool: &MemoryPool) {
    let mut connection = pool.acquire().await.unwrap();
    collect(
        &mut connection,
        Statement::CreateTable {
            descriptor: &DESCRIPTOR,
            if_not_exists: false,
        },
    )
    .await;
    collect(
        &mut connection,
        Statement::Insert(InsertSpec {
            descriptor: &DESCRIPTOR,
            rows: vec![record(1, "b", 20), record(2, "a", 10), record(3, "c", 30)],
        }),
    )
    .await;
}

fn select_all() -> QuerySpec {
    QuerySpec::match_all(&DESCRIPTOR)
}

#[tokio::test]
async fn select_orders_projects_and_bounds() {
    let pool = MemoryPool::new(2);
    seeded(&pool).await;
    let mut connection = pool.acquire().await.unwrap();

    let mut spec = select_all();
    spec.order = vec![OrderKey {
        column: ColumnRef {
            name: "rank",
            table: "items",
            schema: "",
        },
        direction: Direction::Desc,
    }];
    spec.projection = vec![ColumnRef {
        name: "label",
        table: "items",
        schema: "",
    }];
    spec.limit = Some(2);
    let rows = collect(&mut connection, Statement::Select(spec)).await;
    let labels: Vec<String> = rows
        .into_iter()
        .map(|v| match v {
            QueryResult::Row(row) => {
                assert_eq!(row.names(), ["label"]);
                match row.get_column("label") {
                    Some(Value::Varchar(Some(label))) => label.clone(),
                    other => panic!("unexpected value {:?}", other),
                }
            }
            other => panic!("unexpected result {:?}", other),
        })
        .collect();
    assert_eq!(labels, ["c", "b"]);
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() {
    let pool = MemoryPool::new(2);
    seeded(&pool).await;
    let mut connection = pool.acquire().await.unwrap();

    let cond = Cond::Cmp {
        column: ColumnRef {
            name: "rank",
            table: "items",
            schema: "",
        },
        op: CmpOp::Ge,
        value: Value::Int32(Some(20)),
    };
    let results = collect(
        &mut connection,
        Statement::Update(UpdateSpec {
            descriptor: &DESCRIPTOR,
            assignments: vec![("label", Value::Varchar(Some("bumped".into())))],
            cond: cond.clone(),
        }),
    )
    .await;
    assert!(matches!(
        results.as_slice(),
        [QueryResult::Affected(a)] if a.rows_affected == 2
    ));

    let results = collect(
        &mut connection,
        Statement::Delete(DeleteSpec {
            descriptor: &DESCRIPTOR,
            cond,
        }),
    )
    .await;
    assert!(matches!(
        results.as_slice(),
        [QueryResult::Affected(a)] if a.rows_affected == 2
    ));

    let rows = collect(&mut connection, Statement::Count(select_all())).await;
    assert!(matches!(
        rows.as_slice(),
        [QueryResult::Row(row)] if row.get_column("count") == Some(&Value::Int64(Some(1)))
    ));
}

#[tokio::test]
async fn unknown_tables_and_columns_are_execution_errors() {
    let pool = MemoryPool::new(1);
    let mut connection = pool.acquire().await.unwrap();
    let results: Vec<_> = connection
        .run(Query::Planned(Statement::Select(select_all())))
        .collect()
        .await;
    assert!(matches!(results.as_slice(), [Err(_)]));
    drop(connection);

    seeded(&pool).await;
    let mut connection = pool.acquire().await.unwrap();
    let results: Vec<_> = connection
        .run(Query::Planned(Statement::Insert(InsertSpec {
            descriptor: &DESCRIPTOR,
            rows: vec![vec![("ghost", Value::Int64(Some(1)))]],
        })))
        .collect()
        .await;
    assert!(matches!(results.as_slice(), [Err(_)]));
}

#[tokio::test]
async fn guards_return_connections_to_the_pool() {
    let pool = MemoryPool::new(1);
    {
        let _guard = pool.acquire().await.unwrap();
        assert!(pool.try_acquire().is_err());
    }
    assert!(pool.try_acquire().is_ok());
}
