use rust_decimal::Decimal;
use silo::{AsValue, Entity, Error, RowLabeled, RowNames, Value, mapping};
use std::sync::Arc;
use time::{PrimitiveDateTime, macros::datetime};
use uuid::Uuid;

/// Enum stored as text, the way entity enums persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tier {
    #[default]
    Free,
    Paid,
}

impl AsValue for Tier {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(
            match self {
                Tier::Free => "FREE",
                Tier::Paid => "PAID",
            }
            .to_owned(),
        ))
    }
    fn try_from_value(value: Value) -> silo::Result<Self> {
        match &value {
            Value::Varchar(Some(v)) if v == "FREE" => Ok(Tier::Free),
            Value::Varchar(Some(v)) if v == "PAID" => Ok(Tier::Paid),
            _ => Err(Error::Conversion {
                value: format!("{:?}", value),
                target: "Tier",
            }),
        }
    }
}

#[derive(Entity, Default, Clone, Debug, PartialEq)]
#[silo(name = "subscribers")]
struct Subscriber {
    id: i64,
    name: Option<String>,
    age: Option<i32>,
    balance: Option<Decimal>,
    active: Option<bool>,
    tier: Tier,
    since: Option<PrimitiveDateTime>,
    token: Option<Uuid>,
}

fn row_from_record(record: &[(&'static str, Value)]) -> RowLabeled {
    RowLabeled::new(
        record
            .iter()
            .map(|(name, _)| name.to_string())
            .collect::<RowNames>(),
        record.iter().map(|(_, value)| value.clone()).collect(),
    )
}

fn sample() -> Subscriber {
    Subscriber {
        id: 7,
        name: Some("Ada".into()),
        age: Some(36),
        balance: Some(Decimal::new(12_345, 2)),
        active: Some(true),
        tier: Tier::Paid,
        since: Some(datetime!(2023-06-01 08:30:00)),
        token: Some(Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap()),
    }
}

#[test]
fn record_skips_null_fields() {
    let mut subscriber = sample();
    subscriber.age = None;
    let record = subscriber.to_record();
    assert!(record.iter().all(|(name, _)| *name != "age"));
    assert!(record.iter().any(|(name, _)| *name == "tier"));
}

#[test]
fn round_trip_preserves_non_null_fields() {
    let original = sample();
    let row = row_from_record(&original.to_record());
    let mapped = Subscriber::from_row(&row).unwrap();
    assert_eq!(mapped, original);
}

#[test]
fn upper_cased_driver_labels_still_map() {
    let original = sample();
    let record = original.to_record();
    let row = RowLabeled::new(
        record
            .iter()
            .map(|(name, _)| name.to_uppercase())
            .collect::<Arc<[String]>>(),
        record.iter().map(|(_, value)| value.clone()).collect(),
    );
    let mapped = Subscriber::from_row(&row).unwrap();
    assert_eq!(mapped, original);
}

#[test]
fn missing_columns_leave_fields_unset() {
    let row = row_from_record(&[("id", Value::Int64(Some(9)))]);
    let mapped = Subscriber::from_row(&row).unwrap();
    assert_eq!(mapped.id, 9);
    assert_eq!(mapped.name, None);
    assert_eq!(mapped.tier, Tier::Free);
}

/// Coercion failure is deliberately lenient: the value is treated as absent
/// instead of failing the row.
#[test]
fn non_coercible_values_are_treated_as_absent() {
    let row = row_from_record(&[
        ("id", Value::Int64(Some(3))),
        ("age", Value::Blob(Some(vec![1, 2].into_boxed_slice()))),
        ("tier", Value::Varchar(Some("GOLD".into()))),
    ]);
    let mapped = Subscriber::from_row(&row).unwrap();
    assert_eq!(mapped.id, 3);
    assert_eq!(mapped.age, None);
    assert_eq!(mapped.tier, Tier::Free);
}

#[test]
fn textual_values_coerce_into_typed_fields() {
    let row = row_from_record(&[
        ("id", Value::Varchar(Some("42".into()))),
        ("age", Value::Varchar(Some(" 36 ".into()))),
        ("active", Value::Varchar(Some("true".into()))),
        ("balance", Value::Varchar(Some("123.45".into()))),
        ("since", Value::Varchar(Some("2023-06-01 08:30:00".into()))),
    ]);
    let mapped = Subscriber::from_row(&row).unwrap();
    assert_eq!(mapped.id, 42);
    assert_eq!(mapped.age, Some(36));
    assert_eq!(mapped.active, Some(true));
    assert_eq!(mapped.balance, Some(Decimal::new(12_345, 2)));
    assert_eq!(mapped.since, Some(datetime!(2023-06-01 08:30:00)));
}

#[test]
fn numeric_widths_convert_with_range_checks() {
    assert_eq!(i32::try_from_value(Value::Int64(Some(7))).unwrap(), 7);
    assert_eq!(u8::try_from_value(Value::Int32(Some(255))).unwrap(), 255);
    assert!(u8::try_from_value(Value::Int32(Some(256))).is_err());
    assert!(i16::try_from_value(Value::Int64(Some(70_000))).is_err());
    let error = i32::try_from_value(Value::Boolean(Some(true))).unwrap_err();
    assert!(matches!(error, Error::Conversion { .. }));
}

#[test]
fn lookup_prefers_the_canonical_label() {
    let row = RowLabeled::new(
        ["age".to_string(), "AGE".to_string()]
            .into_iter()
            .collect::<RowNames>(),
        vec![Value::Int32(Some(1)), Value::Int32(Some(2))].into_boxed_slice(),
    );
    assert_eq!(
        mapping::lookup(&row, "age"),
        Some(&Value::Int32(Some(1)))
    );
    assert_eq!(
        mapping::lookup(&row, "Age"),
        Some(&Value::Int32(Some(2)))
    );
}

#[test]
fn map_entities_and_first_entity() {
    let rows: Vec<RowLabeled> = (1..=3)
        .map(|i| row_from_record(&[("id", Value::Int64(Some(i)))]))
        .collect();
    let mapped: Vec<Subscriber> = mapping::map_entities(&rows).unwrap();
    assert_eq!(mapped.len(), 3);
    let first: Option<Subscriber> = mapping::first_entity(&rows).unwrap();
    assert_eq!(first.unwrap().id, 1);
    let none: Option<Subscriber> = mapping::first_entity(&[]).unwrap();
    assert!(none.is_none());
}
