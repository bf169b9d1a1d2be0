use crate::{Error, Value};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Identity-map key: the hashable shapes a primary-key value can take.
///
/// Integer variants are widened so that, for example, an `Int32` and an
/// `Int64` cell holding the same number identify the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    Boolean(bool),
    Int(i128),
    UInt(u128),
    Text(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    TimestampWithTimezone(OffsetDateTime),
    Uuid(Uuid),
}

impl TryFrom<&Value> for PrimaryKey {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        if value.is_null() {
            // Null primary keys signal an outer-join miss and are filtered out
            // before identity lookup; reaching this point is a caller bug.
            return Err(Error::msg("Cannot derive a row identity from a null value"));
        }
        Ok(match value {
            Value::Boolean(Some(v)) => PrimaryKey::Boolean(*v),
            Value::UInt128(Some(v)) => PrimaryKey::UInt(*v),
            Value::Varchar(Some(v)) => PrimaryKey::Text(v.clone()),
            Value::Blob(Some(v)) => PrimaryKey::Blob(v.clone()),
            Value::Date(Some(v)) => PrimaryKey::Date(*v),
            Value::Time(Some(v)) => PrimaryKey::Time(*v),
            Value::Timestamp(Some(v)) => PrimaryKey::Timestamp(*v),
            Value::TimestampWithTimezone(Some(v)) => PrimaryKey::TimestampWithTimezone(*v),
            Value::Uuid(Some(v)) => PrimaryKey::Uuid(*v),
            v => match v.integer() {
                Some(v) => PrimaryKey::Int(v),
                None => {
                    return Err(Error::msg(format!(
                        "{:?} cannot key an identity map, primary keys require exact equality",
                        value,
                    )));
                }
            },
        })
    }
}
