//! Rich value serialization.
//!
//! Caller values enter the logger through `serde::Serialize`, so types such as
//! `chrono::DateTime`, sets or maps bring their own encoding and can be
//! rebuilt on the reading side with `serde_json::from_value`. The resulting
//! fields then pass through a [`RichSerializer`] before reaching the sinks.
//!
//! - `non_finite` - value conversion keeping `NaN` and the infinities

pub mod non_finite;

use serde::Serialize;
use serde_json::Value;

use crate::record::Fields;

/// Key used when a caller value is not a JSON object.
pub const WRAPPED_VALUE_KEY: &str = "value";
/// Key used when a caller value cannot be serialized at all.
pub const SERIALIZATION_ERROR_KEY: &str = "serialization_error";

/// Encodes session and data fields into the JSON stored on a record, and
/// decodes them back.
pub trait RichSerializer: Send + Sync {
    fn encode(&self, fields: &Fields) -> Value;

    fn decode(&self, value: &Value) -> Option<Fields>;
}

/// Plain JSON objects in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl RichSerializer for JsonSerializer {
    fn encode(&self, fields: &Fields) -> Value {
        Value::Object(fields.clone())
    }

    fn decode(&self, value: &Value) -> Option<Fields> {
        value.as_object().cloned()
    }
}

/// Convert any serializable value into fields.
///
/// Objects are used as-is, `null` becomes empty fields, anything else is
/// wrapped under `"value"`. Non-finite floats are kept as `"NaN"`,
/// `"Infinity"` and `"-Infinity"`. Serialization never fails from the
/// caller's point of view: errors are recorded under `"serialization_error"`.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> Fields {
    match non_finite::to_value(value) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Fields::new(),
        Ok(other) => {
            let mut fields = Fields::new();
            fields.insert(WRAPPED_VALUE_KEY.to_string(), other);
            fields
        }
        Err(e) => {
            log::warn!("SERIALIZE_FAILED error={}", e);
            let mut fields = Fields::new();
            fields.insert(
                SERIALIZATION_ERROR_KEY.to_string(),
                Value::String(e.to_string()),
            );
            fields
        }
    }
}
