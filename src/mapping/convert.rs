use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::types::RowValues;

/// Conversion from a driver-produced [`RowValues`] into a Rust field type.
///
/// Only conversions the drivers already perform natively are accepted; anything else
/// is reported as an error string that the mapper wraps into a scan failure.
pub trait FromRowValue: Sized {
    /// # Errors
    /// Returns a reason when `value` cannot be represented as `Self`.
    fn from_row_value(value: RowValues) -> Result<Self, String>;
}

fn mismatch(value: &RowValues, target: &str) -> String {
    if value.is_null() {
        format!("NULL cannot be stored in {target}")
    } else {
        format!("cannot store {} value in {target}", value.kind())
    }
}

impl FromRowValue for RowValues {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        Ok(value)
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        match value {
            RowValues::Int(i) => Ok(i),
            RowValues::UInt(u) => {
                i64::try_from(u).map_err(|_| format!("value {u} out of range for i64"))
            }
            RowValues::Bool(b) => Ok(i64::from(b)),
            other => Err(mismatch(&other, "i64")),
        }
    }
}

macro_rules! impl_narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromRowValue for $ty {
                fn from_row_value(value: RowValues) -> Result<Self, String> {
                    let wide = i64::from_row_value(value).map_err(|e| e.replace("i64", stringify!($ty)))?;
                    <$ty>::try_from(wide)
                        .map_err(|_| format!("value {wide} out of range for {}", stringify!($ty)))
                }
            }
        )*
    };
}

impl_narrow_int!(i8, i16, i32, u8, u16, u32, usize);

impl FromRowValue for u64 {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        match value {
            RowValues::UInt(u) => Ok(u),
            RowValues::Int(i) => {
                u64::try_from(i).map_err(|_| format!("value {i} out of range for u64"))
            }
            RowValues::Bool(b) => Ok(u64::from(b)),
            other => Err(mismatch(&other, "u64")),
        }
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        match value {
            RowValues::Float(f) => Ok(f),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(i) => Ok(i as f64),
            #[allow(clippy::cast_precision_loss)]
            RowValues::UInt(u) => Ok(u as f64),
            other => Err(mismatch(&other, "f64")),
        }
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        value
            .as_bool()
            .copied()
            .ok_or_else(|| mismatch(&value, "bool"))
    }
}

impl FromRowValue for String {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        match value {
            RowValues::Text(s) => Ok(s),
            other => Err(mismatch(&other, "String")),
        }
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        match value {
            RowValues::Blob(bytes) => Ok(bytes),
            RowValues::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch(&other, "Vec<u8>")),
        }
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch(&value, "NaiveDateTime"))
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        match value {
            RowValues::JSON(v) => Ok(v),
            RowValues::Text(s) => {
                serde_json::from_str(&s).map_err(|e| format!("invalid JSON text: {e}"))
            }
            other => Err(mismatch(&other, "serde_json::Value")),
        }
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: RowValues) -> Result<Self, String> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}

/// A caller-owned scalar output slot, written positionally on the single-row path.
pub trait ScalarSlot: Send {
    /// Convert and store `value`.
    ///
    /// # Errors
    /// Returns the conversion failure reason; the slot is left unchanged.
    fn scan(&mut self, value: RowValues) -> Result<(), String>;
}

impl<T: FromRowValue + Send> ScalarSlot for T {
    fn scan(&mut self, value: RowValues) -> Result<(), String> {
        *self = T::from_row_value(value)?;
        Ok(())
    }
}
