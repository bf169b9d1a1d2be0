use crate::{Error, Result};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// A raw result-set cell.
///
/// Every variant wraps an `Option` so a typed null (column known, value
/// missing) is distinct from `Null` (no type information at all).
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Int128(Option<i128>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    UInt128(Option<u128>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>, /* prec: */ u8, /* scale: */ u8),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Int128(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::UInt128(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v, ..) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// The numeric payload of any integer variant, widened to `i128`.
    pub(crate) fn integer(&self) -> Option<i128> {
        match self {
            Value::Int8(Some(v)) => Some(*v as i128),
            Value::Int16(Some(v)) => Some(*v as i128),
            Value::Int32(Some(v)) => Some(*v as i128),
            Value::Int64(Some(v)) => Some(*v as i128),
            Value::Int128(Some(v)) => Some(*v),
            Value::UInt8(Some(v)) => Some(*v as i128),
            Value::UInt16(Some(v)) => Some(*v as i128),
            Value::UInt32(Some(v)) => Some(*v as i128),
            Value::UInt64(Some(v)) => Some(*v as i128),
            Value::UInt128(Some(v)) => i128::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// An owned result row, positionally aligned with the mapper tree.
pub type Row = Box<[Value]>;

/// Conversion between `Value` and plain Rust types.
pub trait AsValue: Sized {
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>;
    /// Null-tolerant variant for optional columns.
    fn try_from_value_optional(value: Value) -> Result<Option<Self>> {
        if value.is_null() {
            Ok(None)
        } else {
            Self::try_from_value(value).map(Some)
        }
    }
}

macro_rules! scalar_as_value {
    ($type:ty, $variant:ident) => {
        impl AsValue for $type {
            fn as_value(self) -> Value {
                Value::$variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(Some(v)) => Ok(v),
                    other => Err(Error::msg(format!(
                        "Cannot decode {:?} into {}",
                        other,
                        stringify!($type),
                    ))),
                }
            }
        }
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::$variant(Some(value))
            }
        }
    };
}

macro_rules! integer_as_value {
    ($type:ty, $variant:ident) => {
        impl AsValue for $type {
            fn as_value(self) -> Value {
                Value::$variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                value
                    .integer()
                    .and_then(|v| <$type>::try_from(v).ok())
                    .ok_or_else(|| {
                        Error::msg(format!(
                            "Cannot decode {:?} into {}",
                            value,
                            stringify!($type),
                        ))
                    })
            }
        }
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::$variant(Some(value))
            }
        }
    };
}

scalar_as_value!(bool, Boolean);
integer_as_value!(i8, Int8);
integer_as_value!(i16, Int16);
integer_as_value!(i32, Int32);
integer_as_value!(i64, Int64);
integer_as_value!(i128, Int128);
integer_as_value!(u8, UInt8);
integer_as_value!(u16, UInt16);
integer_as_value!(u32, UInt32);
integer_as_value!(u64, UInt64);
integer_as_value!(u128, UInt128);
scalar_as_value!(f32, Float32);
scalar_as_value!(f64, Float64);
scalar_as_value!(String, Varchar);
scalar_as_value!(Date, Date);
scalar_as_value!(Time, Time);
scalar_as_value!(PrimitiveDateTime, Timestamp);
scalar_as_value!(OffsetDateTime, TimestampWithTimezone);
scalar_as_value!(Uuid, Uuid);

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(Some(self), 0, 0)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v), ..) => Ok(v),
            other => Err(Error::msg(format!("Cannot decode {:?} into Decimal", other))),
        }
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(Some(value), 0, 0)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.to_owned()))
    }
}

/// Builds a [`Row`] from a list of values convertible into [`Value`].
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {{
        let row: $crate::Row = ::std::boxed::Box::new([$($crate::Value::from($value)),*]);
        row
    }};
}
