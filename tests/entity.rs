use rust_decimal::Decimal;
use silo::{
    ColumnDef, ColumnRef, Entity, EntityColumn, EntityDescriptor, Error, PrimaryKeyType, TableRef,
    Value,
};
use time::PrimitiveDateTime;

#[derive(Entity, Default, Clone)]
#[silo(name = "users")]
struct User {
    id: i64,
    status: Option<String>,
    age: Option<i32>,
    balance: Option<Decimal>,
    verified: Option<bool>,
    created_at: Option<PrimitiveDateTime>,
    #[silo(skip)]
    cached_score: u32,
}

#[derive(Entity, Default, Clone)]
#[silo(name = "accounts", rename_all = "camelCase")]
struct Account {
    #[silo(primary_key)]
    account_id: i64,
    display_name: Option<String>,
    #[silo(name = "legacy_balance")]
    balance_cents: i64,
    #[silo(unique)]
    login: Option<String>,
}

#[test]
fn descriptor_is_cached_and_idempotent() {
    let first = User::descriptor();
    let second = User::descriptor();
    assert!(std::ptr::eq(first, second));
    let a = first.column_by_field("created_at").unwrap().name();
    let b = second.column_by_field("created_at").unwrap().name();
    assert_eq!(a, b);
    assert_eq!(a, "created_at");
}

#[test]
fn snake_case_is_the_default_convention() {
    let descriptor = User::descriptor();
    assert_eq!(descriptor.table().name, "users");
    let names: Vec<_> = descriptor.columns().iter().map(ColumnDef::name).collect();
    assert_eq!(
        names,
        ["id", "status", "age", "balance", "verified", "created_at"]
    );
}

#[test]
fn skipped_fields_never_persist() {
    assert!(User::descriptor().column_by_field("cached_score").is_none());
}

#[test]
fn field_named_id_becomes_the_key_by_convention() {
    let pk = User::primary_key_def();
    assert_eq!(pk.name(), "id");
    assert_eq!(pk.primary_key, PrimaryKeyType::PrimaryKey);
    assert!(!pk.nullable);
}

#[test]
fn column_resolution_precedence() {
    let descriptor = Account::descriptor();
    // Explicit override beats the table convention.
    assert_eq!(
        descriptor.column_by_field("balance_cents").unwrap().name(),
        "legacy_balance"
    );
    // Table-level rename_all applies otherwise.
    assert_eq!(
        descriptor.column_by_field("display_name").unwrap().name(),
        "displayName"
    );
    assert_eq!(descriptor.primary_key_def().name(), "accountId");
    assert!(descriptor.column_by_field("login").unwrap().unique);
}

#[test]
fn typed_columns_resolve_to_their_defs() {
    assert_eq!(UserColumn::Status.def().name(), "status");
    assert_eq!(UserColumn::CreatedAt.def().name(), "created_at");
    assert!(matches!(&UserColumn::Age.def().value, Value::Int32(None)));
    assert_eq!(UserColumn::Id.column_ref().table, "users");
}

#[test]
fn nullability_tracks_option() {
    let descriptor = User::descriptor();
    assert!(!descriptor.column_by_field("id").unwrap().nullable);
    assert!(descriptor.column_by_field("status").unwrap().nullable);
}

fn column(field: &'static str, name: &'static str) -> ColumnDef {
    ColumnDef {
        field,
        column_ref: ColumnRef {
            name,
            table: "broken",
            schema: "",
        },
        value: Value::Int64(None),
        nullable: false,
        primary_key: PrimaryKeyType::None,
        unique: false,
    }
}

#[test]
fn duplicate_column_names_are_a_configuration_error() {
    let table = TableRef {
        name: "broken",
        schema: "",
    };
    let result = EntityDescriptor::try_new(
        "Broken",
        table,
        vec![column("a", "same"), column("b", "same")],
        0,
    );
    match result {
        Err(e @ Error::DuplicateColumn { first, second, .. }) => {
            assert_eq!((first, second), ("a", "b"));
            assert!(e.is_validation());
        }
        other => panic!("expected a duplicate column error, got {:?}", other.err()),
    }
}

#[test]
fn primary_key_index_is_validated() {
    let table = TableRef {
        name: "broken",
        schema: "",
    };
    let result = EntityDescriptor::try_new("Broken", table, vec![column("a", "a")], 7);
    assert!(matches!(result, Err(Error::UnknownField { .. })));
}
