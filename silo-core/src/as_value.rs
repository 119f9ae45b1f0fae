use crate::{Error, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::any;
use time::{
    Date, PrimitiveDateTime, Time,
    format_description::BorrowedFormatItem,
    macros::format_description,
};
use uuid::Uuid;

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
pub const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
/// Canonical textual form of a timestamp: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const TIMESTAMP_SUBSECOND_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");

fn conversion_error<T>(value: &Value) -> Error {
    Error::Conversion {
        value: format!("{:?}", value),
        target: any::type_name::<T>(),
    }
}

/// Central conversion between native Rust types and [`Value`].
///
/// `try_from_value` is the single coercion funnel used by row mapping: it
/// accepts the canonical variant for the type, alternate numeric widths with
/// range checks, and textual renditions (string to number, string to temporal
/// in the canonical formats). A failed conversion is an [`Error::Conversion`];
/// the mapper treats it as an absent value rather than a failure.
pub trait AsValue {
    /// A typed NULL for this type, usable as a column type template.
    fn as_empty_value() -> Value;
    /// Convert into the owned dynamic representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

macro_rules! impl_as_value_integer {
    ($ty:ty, $variant:ident) => {
        impl AsValue for $ty {
            fn as_empty_value() -> Value {
                Value::$variant(None)
            }
            fn as_value(self) -> Value {
                Value::$variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let Some(v) = value.integer_value() {
                    return <$ty>::try_from(v).map_err(|_| conversion_error::<$ty>(&value));
                }
                match &value {
                    Value::Varchar(Some(v)) => v
                        .trim()
                        .parse::<$ty>()
                        .map_err(|_| conversion_error::<$ty>(&value)),
                    Value::Decimal(Some(v), ..) => v
                        .to_i128()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| conversion_error::<$ty>(&value)),
                    _ => Err(conversion_error::<$ty>(&value)),
                }
            }
        }
    };
}

impl_as_value_integer!(i8, Int8);
impl_as_value_integer!(i16, Int16);
impl_as_value_integer!(i32, Int32);
impl_as_value_integer!(i64, Int64);
impl_as_value_integer!(u8, UInt8);
impl_as_value_integer!(u16, UInt16);
impl_as_value_integer!(u32, UInt32);
impl_as_value_integer!(u64, UInt64);

macro_rules! impl_as_value_float {
    ($ty:ty, $variant:ident) => {
        impl AsValue for $ty {
            fn as_empty_value() -> Value {
                Value::$variant(None)
            }
            fn as_value(self) -> Value {
                Value::$variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let Some(v) = value.float_value() {
                    return Ok(v as $ty);
                }
                match &value {
                    Value::Varchar(Some(v)) => v
                        .trim()
                        .parse::<$ty>()
                        .map_err(|_| conversion_error::<$ty>(&value)),
                    _ => Err(conversion_error::<$ty>(&value)),
                }
            }
        }
    };
}

impl_as_value_float!(f32, Float32);
impl_as_value_float!(f64, Float64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => match v.trim() {
                "true" | "TRUE" | "1" => Ok(true),
                "false" | "FALSE" | "0" => Ok(false),
                _ => Err(conversion_error::<bool>(&value)),
            },
            _ => match value.integer_value() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(conversion_error::<bool>(&value)),
            },
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self), 0, 0)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Decimal(Some(v), ..) => Ok(*v),
            Value::Float32(Some(v)) => {
                Decimal::from_f32(*v).ok_or_else(|| conversion_error::<Decimal>(&value))
            }
            Value::Float64(Some(v)) => {
                Decimal::from_f64(*v).ok_or_else(|| conversion_error::<Decimal>(&value))
            }
            Value::Varchar(Some(v)) => v
                .trim()
                .parse::<Decimal>()
                .map_err(|_| conversion_error::<Decimal>(&value)),
            _ => value
                .integer_value()
                .and_then(Decimal::from_i128)
                .ok_or_else(|| conversion_error::<Decimal>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Uuid(Some(v)) => Ok(v.to_string()),
            _ => Err(conversion_error::<String>(&value)),
        }
    }
}

/// Write-only impl allowing string literals as query bounds.
impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.to_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(conversion_error::<&str>(&value))
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            _ => Err(conversion_error::<Vec<u8>>(&value)),
        }
    }
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Date(Some(v)) => Ok(*v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::Varchar(Some(v)) => Date::parse(v.trim(), DATE_FORMAT)
                .map_err(|_| conversion_error::<Date>(&value)),
            _ => Err(conversion_error::<Date>(&value)),
        }
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Time(Some(v)) => Ok(*v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::Varchar(Some(v)) => Time::parse(v.trim(), TIME_FORMAT)
                .map_err(|_| conversion_error::<Time>(&value)),
            _ => Err(conversion_error::<Time>(&value)),
        }
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Timestamp(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => {
                let v = v.trim();
                PrimitiveDateTime::parse(v, TIMESTAMP_FORMAT)
                    .or_else(|_| PrimitiveDateTime::parse(v, TIMESTAMP_SUBSECOND_FORMAT))
                    .map_err(|_| conversion_error::<PrimitiveDateTime>(&value))
            }
            _ => Err(conversion_error::<PrimitiveDateTime>(&value)),
        }
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Uuid(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => {
                Uuid::parse_str(v.trim()).map_err(|_| conversion_error::<Uuid>(&value))
            }
            _ => Err(conversion_error::<Uuid>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
