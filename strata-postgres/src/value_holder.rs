use bytes::{BufMut, BytesMut};
use rust_decimal::Decimal;
use std::{error::Error, str::FromStr};
use strata_core::{BindValue, DriverError, Value};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use uuid::Uuid;

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]");
const TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);
const TIMESTAMP_TZ: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
);

type BoxError = Box<dyn Error + Sync + Send>;

/// Decoded column value.
#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Self::from_sql_nullable(ty, Some(raw))
    }
    fn from_sql_null(ty: &Type) -> Result<Self, BoxError> {
        Self::from_sql_nullable(ty, None)
    }
    fn from_sql_nullable(ty: &Type, raw: Option<&'a [u8]>) -> Result<Self, BoxError> {
        let Some(raw) = raw else {
            return Ok(ValueHolder(Value::Null));
        };
        macro_rules! to_value {
            ($($($ty:path)|+ => $source:ty => $convert:expr,)+) => {
                match *ty {
                    $($($ty)|+ => {
                        let v = <$source>::from_sql(ty, raw)?;
                        $convert(v)
                    })+
                    Type::JSON => Value::String(String::from_utf8(raw.to_vec())?),
                    Type::JSONB => Value::String(String::from_utf8(raw.get(1..).unwrap_or_default().to_vec())?),
                    _ => {
                        return Err(format!(
                            "Cannot decode sql type `{}`, value: `{}`",
                            ty,
                            String::from_utf8_lossy(raw)
                        )
                        .into());
                    }
                }
            };
        }
        let value = to_value!(
            Type::BOOL => bool => Value::Boolean,
            Type::CHAR => i8 => |v: i8| Value::Int(v as i64),
            Type::INT2 => i16 => |v: i16| Value::Int(v as i64),
            Type::INT4 => i32 => |v: i32| Value::Int(v as i64),
            Type::INT8 => i64 => Value::Int,
            Type::OID => u32 => |v: u32| Value::Int(v as i64),
            Type::FLOAT4 => f32 => |v: f32| Value::Float(v as f64),
            Type::FLOAT8 => f64 => Value::Float,
            Type::NUMERIC => Decimal => |v: Decimal| Value::String(v.to_string()),
            Type::VARCHAR
            | Type::TEXT
            | Type::NAME
            | Type::BPCHAR
            | Type::UNKNOWN => String => Value::String,
            Type::BYTEA => Vec<u8> => Value::Blob,
            Type::DATE => Date => |v: Date| Value::String(v.format(DATE).unwrap_or_default()),
            Type::TIME => Time => |v: Time| Value::String(v.format(TIME).unwrap_or_default()),
            Type::TIMESTAMP => PrimitiveDateTime => |v: PrimitiveDateTime| {
                Value::String(v.format(TIMESTAMP).unwrap_or_default())
            },
            Type::TIMESTAMPTZ => OffsetDateTime => |v: OffsetDateTime| {
                Value::String(v.format(TIMESTAMP_TZ).unwrap_or_default())
            },
            Type::UUID => Uuid => |v: Uuid| Value::String(v.to_string()),
        );
        Ok(ValueHolder(value))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Parameter converted to the type the server inferred for its placeholder.
#[derive(Debug)]
pub(crate) struct BindHolder(pub(crate) BindValue);

impl BindHolder {
    fn text_to_sql(value: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        fn parse<T: FromStr>(value: &str, ty: &Type) -> Result<T, BoxError> {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| invalid_cast(value, ty))
        }
        match *ty {
            Type::BOOL => match value.trim().to_ascii_lowercase().as_str() {
                "t" | "true" | "y" | "yes" | "on" | "1" => true.to_sql(ty, out),
                "f" | "false" | "n" | "no" | "off" | "0" => false.to_sql(ty, out),
                _ => Err(invalid_cast(value, ty)),
            },
            Type::CHAR => parse::<i8>(value, ty)?.to_sql(ty, out),
            Type::INT2 => parse::<i16>(value, ty)?.to_sql(ty, out),
            Type::INT4 => parse::<i32>(value, ty)?.to_sql(ty, out),
            Type::INT8 => parse::<i64>(value, ty)?.to_sql(ty, out),
            Type::OID => parse::<u32>(value, ty)?.to_sql(ty, out),
            Type::FLOAT4 => parse::<f32>(value, ty)?.to_sql(ty, out),
            Type::FLOAT8 => parse::<f64>(value, ty)?.to_sql(ty, out),
            Type::NUMERIC => Decimal::from_str_exact(value.trim())
                .or_else(|_| Decimal::from_scientific(value.trim()))
                .map_err(|_| invalid_cast(value, ty))?
                .to_sql(ty, out),
            Type::BYTEA => value.as_bytes().to_sql(ty, out),
            Type::DATE => Date::parse(value.trim(), DATE)
                .map_err(|_| invalid_cast(value, ty))?
                .to_sql(ty, out),
            Type::TIME => Time::parse(value.trim(), TIME)
                .map_err(|_| invalid_cast(value, ty))?
                .to_sql(ty, out),
            Type::TIMESTAMP => PrimitiveDateTime::parse(value.trim(), TIMESTAMP)
                .map_err(|_| invalid_cast(value, ty))?
                .to_sql(ty, out),
            Type::TIMESTAMPTZ => OffsetDateTime::parse(value.trim(), TIMESTAMP_TZ)
                .or_else(|_| {
                    PrimitiveDateTime::parse(value.trim(), TIMESTAMP).map(|v| v.assume_utc())
                })
                .map_err(|_| invalid_cast(value, ty))?
                .to_sql(ty, out),
            Type::UUID => Uuid::parse_str(value.trim())
                .map_err(|_| invalid_cast(value, ty))?
                .to_sql(ty, out),
            Type::JSON => {
                out.put_slice(value.as_bytes());
                Ok(IsNull::No)
            }
            Type::JSONB => {
                out.put_u8(1);
                out.put_slice(value.as_bytes());
                Ok(IsNull::No)
            }
            _ => value.to_sql(ty, out),
        }
    }
}

impl ToSql for BindHolder {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match &self.0 {
            BindValue::Null => Ok(IsNull::Yes),
            BindValue::Bool(v) => match *ty {
                Type::BOOL => v.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 | Type::NUMERIC => {
                    BindHolder(BindValue::Int(*v as i64)).to_sql(ty, out)
                }
                _ => Self::text_to_sql(if *v { "true" } else { "false" }, ty, out),
            },
            BindValue::Int(v) => match *ty {
                Type::BOOL => (*v != 0).to_sql(ty, out),
                Type::INT8 => v.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)
                    .map_err(|_| out_of_range(*v, ty))?
                    .to_sql(ty, out),
                Type::INT2 => i16::try_from(*v)
                    .map_err(|_| out_of_range(*v, ty))?
                    .to_sql(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*v).to_sql(ty, out),
                _ => Self::text_to_sql(&v.to_string(), ty, out),
            },
            BindValue::Text(v) => Self::text_to_sql(v, ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}

fn invalid_cast(value: &str, ty: &Type) -> BoxError {
    Box::new(DriverError::new(
        DriverError::INVALID_CAST,
        None,
        format!("Cannot bind `{}` as {}", value, ty),
    ))
}

fn out_of_range(value: i64, ty: &Type) -> BoxError {
    Box::new(DriverError::new(
        "22003",
        None,
        format!("The value {} is out of range for {}", value, ty),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: BindValue, ty: &Type) -> Result<BytesMut, BoxError> {
        let mut out = BytesMut::new();
        BindHolder(value).to_sql(ty, &mut out)?;
        Ok(out)
    }

    fn decode(bytes: &[u8], ty: &Type) -> Value {
        ValueHolder::from_sql(ty, bytes).unwrap().0
    }

    #[test]
    fn text_follows_the_inferred_type() {
        let out = encode(BindValue::Text("42".into()), &Type::INT4).unwrap();
        assert_eq!(decode(&out, &Type::INT4), Value::Int(42));
        let out = encode(BindValue::Text("9.90".into()), &Type::NUMERIC).unwrap();
        assert_eq!(decode(&out, &Type::NUMERIC), Value::String("9.90".into()));
        let out = encode(BindValue::Text("2024-02-29".into()), &Type::DATE).unwrap();
        assert_eq!(decode(&out, &Type::DATE), Value::String("2024-02-29".into()));
        let out = encode(BindValue::Text("t".into()), &Type::BOOL).unwrap();
        assert_eq!(decode(&out, &Type::BOOL), Value::Boolean(true));
    }

    #[test]
    fn integers_fit_their_column() {
        let out = encode(BindValue::Int(7), &Type::INT2).unwrap();
        assert_eq!(decode(&out, &Type::INT2), Value::Int(7));
        let out = encode(BindValue::Int(7), &Type::TEXT).unwrap();
        assert_eq!(decode(&out, &Type::TEXT), Value::String("7".into()));
        let error = encode(BindValue::Int(1 << 40), &Type::INT4).unwrap_err();
        let details = error.downcast_ref::<DriverError>().unwrap();
        assert_eq!(details.sqlstate, "22003");
    }

    #[test]
    fn invalid_text() {
        let error = encode(BindValue::Text("abc".into()), &Type::INT8).unwrap_err();
        let details = error.downcast_ref::<DriverError>().unwrap();
        assert_eq!(details.sqlstate, DriverError::INVALID_CAST);
    }

    #[test]
    fn nulls() {
        assert_eq!(
            ValueHolder::from_sql_null(&Type::INT4).unwrap().0,
            Value::Null
        );
        let mut out = BytesMut::new();
        assert!(matches!(
            BindHolder(BindValue::Null).to_sql(&Type::INT4, &mut out),
            Ok(IsNull::Yes)
        ));
    }
}
