use mysql_async::consts::ColumnType;
use strata_core::{BindValue, Error, Result, Row, RowNames, Value};

pub(crate) fn bind_value(value: BindValue) -> mysql_async::Value {
    match value {
        BindValue::Null => mysql_async::Value::NULL,
        BindValue::Bool(v) => mysql_async::Value::Int(v as i64),
        BindValue::Int(v) => mysql_async::Value::Int(v),
        BindValue::Text(v) => mysql_async::Value::Bytes(v.into_bytes()),
    }
}

/// Decode a column as returned by the binary protocol.
pub(crate) fn extract_value(value: mysql_async::Value, ty: ColumnType) -> Value {
    match value {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(v) => match String::from_utf8(v) {
            Ok(v) => Value::String(v),
            Err(e) => Value::Blob(e.into_bytes()),
        },
        mysql_async::Value::Int(v) => Value::Int(v),
        mysql_async::Value::UInt(v) => match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(..) => Value::String(v.to_string()),
        },
        mysql_async::Value::Float(v) => Value::Float(v as f64),
        mysql_async::Value::Double(v) => Value::Float(v),
        mysql_async::Value::Date(year, month, day, hour, minute, second, micros) => {
            let date = format!("{:04}-{:02}-{:02}", year, month, day);
            Value::String(match ty {
                ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => date,
                _ if micros > 0 => format!(
                    "{} {:02}:{:02}:{:02}.{:06}",
                    date, hour, minute, second, micros
                ),
                _ => format!("{} {:02}:{:02}:{:02}", date, hour, minute, second),
            })
        }
        mysql_async::Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let hours = days as u64 * 24 + hours as u64;
            let sign = if negative { "-" } else { "" };
            Value::String(if micros > 0 {
                format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    sign, hours, minutes, seconds, micros
                )
            } else {
                format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
            })
        }
    }
}

pub(crate) fn row_to_strata_row(labels: &RowNames, mut row: mysql_async::Row) -> Result<Row> {
    let types = row
        .columns_ref()
        .iter()
        .map(|c| c.column_type())
        .collect::<Vec<_>>();
    let values = types
        .into_iter()
        .enumerate()
        .map(|(i, ty)| {
            row.take::<mysql_async::Value, _>(i)
                .map(|v| extract_value(v, ty))
                .ok_or_else(|| Error::msg(format!("The column {} was already taken", i)))
        })
        .collect::<Result<Box<[_]>>>()?;
    Ok(Row::new(labels.clone(), values))
}
