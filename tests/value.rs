use marrow::{AsValue, Row, Value, row};
use rust_decimal::Decimal;
use time::macros::date;
use uuid::Uuid;

#[test]
fn value_null() {
    assert!(Value::Null.is_null());
    assert!(Value::Int64(None).is_null());
    assert!(Value::Varchar(None).is_null());
    assert!(!Value::Int64(Some(0)).is_null());
}

#[test]
fn value_integers_widen() {
    let val: Value = 42_i16.as_value();
    assert_eq!(val, Value::Int16(Some(42)));
    assert_eq!(i64::try_from_value(val).unwrap(), 42);
    assert_eq!(u8::try_from_value(300_i64.as_value()).ok(), None);
    assert_eq!(i32::try_from_value(7_u64.as_value()).unwrap(), 7);
}

#[test]
fn value_varchar() {
    let val: Value = "hello".into();
    assert_eq!(val, Value::Varchar(Some("hello".into())));
    assert_eq!(String::try_from_value(val).unwrap(), "hello");
    assert!(String::try_from_value(Value::Int64(Some(1))).is_err());
}

#[test]
fn value_optional() {
    assert_eq!(String::try_from_value_optional(Value::Null).unwrap(), None);
    assert_eq!(
        String::try_from_value_optional(Value::Varchar(None)).unwrap(),
        None
    );
    assert_eq!(
        String::try_from_value_optional("x".into()).unwrap(),
        Some("x".into())
    );
}

#[test]
fn value_typed() {
    let id = Uuid::parse_str("f938f818-0a40-4ce3-8fbc-259ac252a1b5").unwrap();
    assert_eq!(Uuid::try_from_value(id.as_value()).unwrap(), id);
    let day = date!(2024 - 02 - 29);
    assert_eq!(time::Date::try_from_value(day.as_value()).unwrap(), day);
    let price = Decimal::new(1999, 2);
    assert_eq!(Decimal::try_from_value(price.as_value()).unwrap(), price);
    assert!(bool::try_from_value(Value::Float32(Some(0.5))).is_err());
}

#[test]
fn row_macro_builds_positional_rows() {
    let row: Row = row![1_i64, "a", Value::Null];
    assert_eq!(row.len(), 3);
    assert_eq!(row[0], Value::Int64(Some(1)));
    assert_eq!(row[1], Value::Varchar(Some("a".into())));
    assert!(row[2].is_null());
}
