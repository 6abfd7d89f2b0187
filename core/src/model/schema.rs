//! Static field metadata and the descriptor-driven validator.
//!
//! # Design
//! Every model owns one `ModelSchema`: an ordered table of `FieldDescriptor`s
//! built at compile time by the `wire_model!` macro. The table is the only place
//! where an in-memory field name is paired with its wire key, so decode and
//! encode both consult it and can never drift apart.
//!
//! Validation walks the table in declaration order. In shallow mode nested
//! models and unions are only checked for being objects; their own decode
//! validates the next level. Deep mode recurses all the way down and is used
//! by the union resolver, which must know whether a whole candidate fits
//! before committing to it.

use serde_json::{Map, Value};

use super::union::{self, UnionSchema};
use crate::error::ModelError;

/// Whether a field must be present and whether it may carry `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Optional, and an explicit `null` is a distinct, meaningful value.
    Nullable,
}

impl Presence {
    pub fn is_required(self) -> bool {
        matches!(self, Presence::Required)
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, Presence::Nullable)
    }
}

/// Declared wire type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// Arbitrary JSON, passed through untouched.
    Any,
    /// A string restricted to the listed literals.
    Enum(&'static [&'static str]),
    Model(fn() -> &'static ModelSchema),
    Union(fn() -> &'static UnionSchema),
    List(&'static FieldKind),
    Map(&'static FieldKind),
}

impl FieldKind {
    /// Human readable name used in mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Any => "any".to_string(),
            FieldKind::Enum(literals) => format!("one of [{}]", literals.join(", ")),
            FieldKind::Model(schema) => format!("object {}", schema().name),
            FieldKind::Union(schema) => format!("union {}", schema().name),
            FieldKind::List(inner) => format!("list of {}", inner.describe()),
            FieldKind::Map(inner) => format!("map of {}", inner.describe()),
        }
    }

    /// Check `value` against this kind. `deep` recurses into nested models
    /// and unions; otherwise they only need to be objects.
    pub fn check(&self, value: &Value, path: &str, deep: bool) -> Result<(), ModelError> {
        let fits = match self {
            FieldKind::Any => true,
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Enum(literals) => value
                .as_str()
                .is_some_and(|literal| literals.contains(&literal)),
            FieldKind::Model(schema) => match value.as_object() {
                Some(map) if deep => return validate(schema(), map, path, true),
                Some(_) => true,
                None => false,
            },
            FieldKind::Union(schema) => {
                if deep {
                    return union::resolve(schema(), value, path).map(|_| ());
                }
                !value.is_null()
            }
            FieldKind::List(inner) => match value.as_array() {
                Some(items) => {
                    for (index, item) in items.iter().enumerate() {
                        inner.check(item, &format!("{path}[{index}]"), deep)?;
                    }
                    true
                }
                None => false,
            },
            FieldKind::Map(inner) => match value.as_object() {
                Some(entries) => {
                    for (key, item) in entries {
                        inner.check(item, &format!("{path}.{key}"), deep)?;
                    }
                    true
                }
                None => false,
            },
        };
        if fits {
            Ok(())
        } else {
            Err(ModelError::mismatch(path, self.describe(), value))
        }
    }
}

/// One declared field of a model.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// In-memory field name.
    pub name: &'static str,
    /// Key used in the JSON payload.
    pub wire_key: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

/// Ordered field table of one model.
#[derive(Debug)]
pub struct ModelSchema {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl ModelSchema {
    /// Look up a field by its in-memory name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a field by its wire key.
    pub fn field_by_wire_key(&self, wire_key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.wire_key == wire_key)
    }
}

/// Validate a raw object against a schema, field by field in declaration
/// order. Keys that the schema does not declare are ignored.
pub fn validate(
    schema: &ModelSchema,
    raw: &Map<String, Value>,
    path: &str,
    deep: bool,
) -> Result<(), ModelError> {
    for field in schema.fields {
        let field_path = format!("{path}.{}", field.name);
        match raw.get(field.wire_key) {
            None if field.presence.is_required() => {
                return Err(ModelError::MissingRequiredField {
                    model: schema.name,
                    field: field.name,
                });
            }
            None => {}
            Some(Value::Null) if field.presence.is_nullable() => {}
            // `Any` and shallow unions accept null as a value, not as a field.
            Some(Value::Null) => {
                return Err(ModelError::mismatch(&field_path, field.kind.describe(), &Value::Null));
            }
            Some(value) => field.kind.check(value, &field_path, deep)?,
        }
    }
    Ok(())
}
