use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use mysql_async::Value;

use crate::types::RowValues;

/// Convert a single `RowValues` into a `mysql_async` parameter value.
#[must_use]
pub fn row_value_to_mysql_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::UInt(u) => Value::UInt(*u),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => timestamp_to_mysql(dt),
        RowValues::Null => Value::NULL,
        RowValues::JSON(jval) => Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    }
}

fn timestamp_to_mysql(dt: &NaiveDateTime) -> Value {
    let narrow = |v: u32| u8::try_from(v).unwrap_or(u8::MAX);
    Value::Date(
        u16::try_from(dt.year()).unwrap_or(0),
        narrow(dt.month()),
        narrow(dt.day()),
        narrow(dt.hour()),
        narrow(dt.minute()),
        narrow(dt.second()),
        dt.nanosecond() / 1_000,
    )
}

/// Convert a column value read by `mysql_async` into `RowValues`.
///
/// Text comes back from the server as bytes; valid UTF-8 becomes `Text`, anything else
/// stays a `Blob`. Dates that chrono cannot represent (such as `0000-00-00`) and `TIME`
/// values are rendered as text.
#[must_use]
pub fn mysql_value_to_row_value(value: Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text),
            Err(e) => RowValues::Blob(e.into_bytes()),
        },
        Value::Int(i) => RowValues::Int(i),
        Value::UInt(u) => i64::try_from(u).map_or(RowValues::UInt(u), RowValues::Int),
        Value::Float(f) => RowValues::Float(f64::from(f)),
        Value::Double(d) => RowValues::Float(d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(hour),
                        u32::from(minute),
                        u32::from(second),
                        micros,
                    )
                })
                .map_or_else(
                    || {
                        RowValues::Text(format!(
                            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                        ))
                    },
                    RowValues::Timestamp,
                )
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let total_hours = days * 24 + u32::from(hours);
            let text = if micros == 0 {
                format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}")
            } else {
                format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
            };
            RowValues::Text(text)
        }
    }
}

/// Positional `mysql_async` parameters.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_mysql_value).collect())
    }

    #[must_use]
    pub fn into_driver_params(self) -> mysql_async::Params {
        if self.0.is_empty() {
            mysql_async::Params::Empty
        } else {
            mysql_async::Params::Positional(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FromRowValue;

    #[test]
    fn bytes_become_text_or_blob() {
        assert_eq!(
            mysql_value_to_row_value(Value::Bytes(b"Alice".to_vec())),
            RowValues::Text("Alice".into())
        );
        assert_eq!(
            mysql_value_to_row_value(Value::Bytes(vec![0xff, 0xfe])),
            RowValues::Blob(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn unsigned_values_above_i64_stay_unsigned() {
        assert_eq!(mysql_value_to_row_value(Value::UInt(7)), RowValues::Int(7));
        let big = mysql_value_to_row_value(Value::UInt(u64::MAX));
        assert_eq!(big, RowValues::UInt(u64::MAX));
        assert_eq!(u64::from_row_value(big.clone()), Ok(u64::MAX));
        assert!(i64::from_row_value(big.clone()).is_err());
        assert!(matches!(row_value_to_mysql_value(&big), Value::UInt(u64::MAX)));
    }

    #[test]
    fn dates_round_trip_and_zero_dates_fall_back_to_text() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 6)
            .and_then(|d| d.and_hms_micro_opt(7, 8, 9, 10))
            .unwrap();
        let value = row_value_to_mysql_value(&RowValues::Timestamp(ts));
        assert_eq!(mysql_value_to_row_value(value), RowValues::Timestamp(ts));
        assert_eq!(
            mysql_value_to_row_value(Value::Date(0, 0, 0, 0, 0, 0, 0)),
            RowValues::Text("0000-00-00 00:00:00".into())
        );
    }

    #[test]
    fn time_values_render_as_text() {
        assert_eq!(
            mysql_value_to_row_value(Value::Time(true, 1, 2, 3, 4, 0)),
            RowValues::Text("-26:03:04".into())
        );
    }

    #[test]
    fn empty_params_are_empty() {
        assert!(matches!(
            Params::convert(&[]).into_driver_params(),
            mysql_async::Params::Empty
        ));
    }
}
