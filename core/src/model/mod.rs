//! Generic typed-model conversion engine.
//!
//! # Overview
//! A model is a plain Rust struct paired with a static `ModelSchema`. The
//! engine in this module turns raw JSON objects into models and back:
//!
//! - `decode` validates the raw object against the schema (presence,
//!   nullability, kind) in declaration order, then hands a `FieldReader` to
//!   the model, which converts each field through `WireValue`.
//! - `encode` hands a `FieldWriter` to the model; the writer maps each field
//!   name to its wire key, omits unset optionals and writes `null` only for
//!   nullable fields.
//!
//! # Design
//! Models are declared with the `wire_model!` macro, which emits the struct, its
//! descriptor table, a builder guarding required fields, and copy-on-write
//! `with_*` mutators. Enums and unions use `wire_enum!` and `wire_union!`.

pub mod schema;
pub mod union;
pub mod wire;

mod macros;

use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::error::ModelError;

pub use schema::{FieldDescriptor, FieldKind, ModelSchema, Presence};
pub use union::{Resolution, UnionSchema};
pub use wire::WireValue;

/// A field that may be absent, explicitly `null`, or set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nullable<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Nullable::Absent
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable::Value(value)
    }
}

impl From<&str> for Nullable<String> {
    fn from(value: &str) -> Self {
        Nullable::Value(value.to_string())
    }
}

impl<T> Nullable<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Nullable::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Nullable::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// A struct backed by a static descriptor table.
pub trait Model: Sized + Clone {
    fn schema() -> &'static ModelSchema;

    /// Build the model from an already validated object.
    fn read_fields(reader: &FieldReader<'_>) -> Result<Self, ModelError>;

    fn write_fields(&self, writer: &mut FieldWriter);
}

/// Decode a model from a raw JSON value.
pub fn decode<M: Model>(raw: &Value) -> Result<M, ModelError> {
    decode_at(raw, M::schema().name)
}

/// Decode a model located at `path` inside a larger document.
pub fn decode_at<M: Model>(raw: &Value, path: &str) -> Result<M, ModelError> {
    let schema = M::schema();
    let object = raw
        .as_object()
        .ok_or_else(|| ModelError::mismatch(path, format!("object {}", schema.name), raw))?;
    schema::validate(schema, object, path, false)?;
    M::read_fields(&FieldReader {
        schema,
        object,
        path,
    })
}

/// Encode a model into a raw JSON object.
pub fn encode<M: Model>(model: &M) -> Value {
    Value::Object(encode_map(model))
}

pub fn encode_map<M: Model>(model: &M) -> Map<String, Value> {
    let mut writer = FieldWriter {
        schema: M::schema(),
        object: Map::new(),
    };
    model.write_fields(&mut writer);
    writer.object
}

/// Incremental construction of a model.
///
/// Setters are generated per model by `wire_model!`; values are stored under
/// their wire keys and `build` runs the same validation as `decode`, so a
/// missing required field fails here with the first missing field named.
/// A value with no wire form (a non-finite `f64`) fails `build` with a
/// `TypeMismatch` at that field.
#[derive(Debug, Clone)]
pub struct Builder<M> {
    fields: Map<String, Value>,
    invalid: Option<ModelError>,
    model: PhantomData<M>,
}

impl<M: Model> Default for Builder<M> {
    fn default() -> Self {
        Self {
            fields: Map::new(),
            invalid: None,
            model: PhantomData,
        }
    }
}

impl<M: Model> Builder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    fn wire_key(name: &'static str) -> &'static str {
        M::schema()
            .field(name)
            .map(|field| field.wire_key)
            .unwrap_or(name)
    }

    fn store<T: WireValue>(&mut self, name: &'static str, value: &T) {
        let wire = value.to_wire();
        if wire.is_null() && !matches!(T::KIND, FieldKind::Any) && self.invalid.is_none() {
            self.invalid = Some(ModelError::TypeMismatch {
                path: format!("{}.{name}", M::schema().name),
                expected: T::KIND.describe(),
                found: "value without a JSON form",
            });
        }
        self.fields.insert(Self::wire_key(name).to_string(), wire);
    }

    #[doc(hidden)]
    pub fn required<T: WireValue>(mut self, name: &'static str, value: T) -> Self {
        self.store(name, &value);
        self
    }

    #[doc(hidden)]
    pub fn optional<T: WireValue>(self, name: &'static str, value: T) -> Self {
        self.required(name, value)
    }

    #[doc(hidden)]
    pub fn nullable<T: WireValue>(mut self, name: &'static str, value: Nullable<T>) -> Self {
        let key = Self::wire_key(name).to_string();
        match value {
            Nullable::Absent => {
                self.fields.remove(&key);
            }
            Nullable::Null => {
                self.fields.insert(key, Value::Null);
            }
            Nullable::Value(value) => self.store(name, &value),
        }
        self
    }

    /// Validate and construct the model.
    pub fn build(self) -> Result<M, ModelError> {
        if let Some(err) = self.invalid {
            return Err(err);
        }
        decode(&Value::Object(self.fields))
    }
}

/// Typed access to the fields of a validated raw object.
pub struct FieldReader<'a> {
    schema: &'static ModelSchema,
    object: &'a Map<String, Value>,
    path: &'a str,
}

impl FieldReader<'_> {
    fn lookup(&self, name: &'static str) -> (Option<&Value>, String) {
        let wire_key = self
            .schema
            .field(name)
            .map(|field| field.wire_key)
            .unwrap_or(name);
        (self.object.get(wire_key), format!("{}.{name}", self.path))
    }

    pub fn required<T: WireValue>(&self, name: &'static str) -> Result<T, ModelError> {
        match self.lookup(name) {
            (Some(value), path) => T::from_wire(value, &path),
            (None, _) => Err(ModelError::MissingRequiredField {
                model: self.schema.name,
                field: name,
            }),
        }
    }

    pub fn optional<T: WireValue>(&self, name: &'static str) -> Result<Option<T>, ModelError> {
        match self.lookup(name) {
            (None, _) => Ok(None),
            (Some(value), path) => T::from_wire(value, &path).map(Some),
        }
    }

    pub fn nullable<T: WireValue>(&self, name: &'static str) -> Result<Nullable<T>, ModelError> {
        match self.lookup(name) {
            (None, _) => Ok(Nullable::Absent),
            (Some(Value::Null), _) => Ok(Nullable::Null),
            (Some(value), path) => T::from_wire(value, &path).map(Nullable::Value),
        }
    }
}

/// Collects encoded fields under their wire keys.
pub struct FieldWriter {
    schema: &'static ModelSchema,
    object: Map<String, Value>,
}

impl FieldWriter {
    fn descriptor(&self, name: &'static str) -> Option<&'static FieldDescriptor> {
        let field = self.schema.field(name);
        debug_assert!(field.is_some(), "{} declares no field `{name}`", self.schema.name);
        field
    }

    pub fn required<T: WireValue>(&mut self, name: &'static str, value: &T) {
        if let Some(field) = self.descriptor(name) {
            self.object.insert(field.wire_key.to_string(), value.to_wire());
        }
    }

    pub fn optional<T: WireValue>(&mut self, name: &'static str, value: &Option<T>) {
        if let (Some(field), Some(value)) = (self.descriptor(name), value) {
            self.object.insert(field.wire_key.to_string(), value.to_wire());
        }
    }

    pub fn nullable<T: WireValue>(&mut self, name: &'static str, value: &Nullable<T>) {
        let Some(field) = self.descriptor(name) else {
            return;
        };
        match value {
            Nullable::Absent => {}
            Nullable::Null if field.presence.is_nullable() => {
                self.object.insert(field.wire_key.to_string(), Value::Null);
            }
            Nullable::Null => {}
            Nullable::Value(value) => {
                self.object.insert(field.wire_key.to_string(), value.to_wire());
            }
        }
    }
}
