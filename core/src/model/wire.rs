//! Typed conversion between Rust values and JSON wire values.
//!
//! `WireValue` is implemented here for primitives and containers; the
//! declaration macros implement it for models, enums and unions. Every
//! implementor also names its `FieldKind`, so descriptor tables can be built
//! from field types alone.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::schema::FieldKind;
use crate::error::ModelError;

/// A type that can travel as a JSON value.
pub trait WireValue: Sized {
    /// Declared kind used in descriptor tables.
    const KIND: FieldKind;

    /// `KIND` behind a `'static` reference, for nesting inside container kinds.
    const KIND_REF: &'static FieldKind = &Self::KIND;

    /// Convert from a raw value. `path` locates the value for error messages.
    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError>;

    fn to_wire(&self) -> Value;
}

impl WireValue for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ModelError::mismatch(path, "string", value))
    }

    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }
}

impl WireValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        value
            .as_bool()
            .ok_or_else(|| ModelError::mismatch(path, "boolean", value))
    }

    fn to_wire(&self) -> Value {
        Value::Bool(*self)
    }
}

impl WireValue for i64 {
    const KIND: FieldKind = FieldKind::Integer;

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        value
            .as_i64()
            .ok_or_else(|| ModelError::mismatch(path, "integer", value))
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for u32 {
    const KIND: FieldKind = FieldKind::Integer;

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ModelError::mismatch(path, "unsigned 32-bit integer", value))
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for f64 {
    const KIND: FieldKind = FieldKind::Number;

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        value
            .as_f64()
            .ok_or_else(|| ModelError::mismatch(path, "number", value))
    }

    /// NaN and infinities have no JSON form and encode as `null`;
    /// `Builder::build` rejects them before that can reach the wire.
    fn to_wire(&self) -> Value {
        serde_json::Number::from_f64(*self)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl WireValue for Uuid {
    const KIND: FieldKind = FieldKind::String;

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ModelError::mismatch(path, "uuid string", value))
    }

    fn to_wire(&self) -> Value {
        Value::String(self.to_string())
    }
}

/// Arbitrary JSON passes through unchanged.
impl WireValue for Value {
    const KIND: FieldKind = FieldKind::Any;

    fn from_wire(value: &Value, _path: &str) -> Result<Self, ModelError> {
        Ok(value.clone())
    }

    fn to_wire(&self) -> Value {
        self.clone()
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    const KIND: FieldKind = FieldKind::List(T::KIND_REF);

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        let items = value
            .as_array()
            .ok_or_else(|| ModelError::mismatch(path, "list", value))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::from_wire(item, &format!("{path}[{index}]")))
            .collect()
    }

    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire).collect())
    }
}

impl<T: WireValue> WireValue for BTreeMap<String, T> {
    const KIND: FieldKind = FieldKind::Map(T::KIND_REF);

    fn from_wire(value: &Value, path: &str) -> Result<Self, ModelError> {
        let entries = value
            .as_object()
            .ok_or_else(|| ModelError::mismatch(path, "map", value))?;
        entries
            .iter()
            .map(|(key, item)| Ok((key.clone(), T::from_wire(item, &format!("{path}.{key}"))?)))
            .collect()
    }

    fn to_wire(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(key, item)| (key.clone(), item.to_wire()))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_errors_point_at_the_element() {
        let err = Vec::<String>::from_wire(&json!(["a", 2]), "tags").unwrap_err();
        assert_eq!(
            err,
            ModelError::TypeMismatch {
                path: "tags[1]".to_string(),
                expected: "string".to_string(),
                found: "number",
            }
        );
    }

    #[test]
    fn map_values_convert_elementwise() {
        let map = BTreeMap::<String, i64>::from_wire(&json!({"a": 1, "b": 2}), "m").unwrap();
        assert_eq!(map["b"], 2);
        assert_eq!(map.to_wire(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn u32_rejects_negative_and_oversized() {
        assert!(u32::from_wire(&json!(-1), "n").is_err());
        assert!(u32::from_wire(&json!(5_000_000_000u64), "n").is_err());
        assert_eq!(u32::from_wire(&json!(20), "n").unwrap(), 20);
    }

    #[test]
    fn uuid_parses_from_string() {
        let id = Uuid::from_wire(&json!("00000000-0000-0000-0000-000000000001"), "id").unwrap();
        assert_eq!(id.to_wire(), json!("00000000-0000-0000-0000-000000000001"));
        assert!(Uuid::from_wire(&json!("not-a-uuid"), "id").is_err());
    }
}
