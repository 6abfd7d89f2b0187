//! Union resolution: pick the variant a raw value should decode as.
//!
//! # Design
//! A union type carries a static `UnionSchema` naming its resolution
//! strategy. The choice is made once, at decode time, and the result is a
//! closed Rust enum.
//!
//! Discriminated unions go through `resolve`, which looks up the tag and
//! returns the variant index. Ordered unions generated by `wire_union!` run
//! each candidate's own decoder in declaration order and keep the first
//! success, so when two shapes both fit the first one declared always wins.
//! For ordered unions `resolve` is only a structural check by kind, used
//! when a union is validated as part of an enclosing model; it can accept
//! values the real decoders reject, never the other way round.

use serde_json::Value;

use super::schema::FieldKind;
use crate::error::ModelError;

/// How a union chooses between its variants.
#[derive(Debug)]
pub enum Resolution {
    /// Candidates in declaration order; the first that decodes wins.
    Ordered { candidates: &'static [FieldKind] },
    /// Read a string tag from `field` and look it up in `variants`.
    Discriminated {
        field: &'static str,
        variants: &'static [(&'static str, FieldKind)],
    },
}

#[derive(Debug)]
pub struct UnionSchema {
    pub name: &'static str,
    pub resolution: Resolution,
}

/// Index of the variant `value` resolves to.
pub fn resolve(schema: &UnionSchema, value: &Value, path: &str) -> Result<usize, ModelError> {
    match &schema.resolution {
        Resolution::Ordered { candidates } => {
            let index = candidates
                .iter()
                .position(|kind| kind.check(value, path, true).is_ok())
                .ok_or_else(|| ModelError::mismatch(path, format!("union {}", schema.name), value))?;
            tracing::trace!(name = schema.name, index, "resolved union by ordered trial");
            Ok(index)
        }
        Resolution::Discriminated { field, variants } => {
            let object = value
                .as_object()
                .ok_or_else(|| ModelError::mismatch(path, format!("union {}", schema.name), value))?;
            let tag = object.get(*field).ok_or(ModelError::MissingRequiredField {
                model: schema.name,
                field: *field,
            })?;
            let tag = tag
                .as_str()
                .ok_or_else(|| ModelError::mismatch(&format!("{path}.{field}"), "string", tag))?;
            let index = variants
                .iter()
                .position(|(known, _)| *known == tag)
                .ok_or_else(|| ModelError::UnknownDiscriminator {
                    union: schema.name,
                    field: *field,
                    value: tag.to_string(),
                })?;
            variants[index].1.check(value, path, true)?;
            tracing::trace!(name = schema.name, tag, "resolved union by discriminator");
            Ok(index)
        }
    }
}

/// Tag the discriminator of variant `index` should carry on encode, if the
/// union is discriminated.
pub fn discriminator_tag(schema: &UnionSchema, index: usize) -> Option<(&'static str, &'static str)> {
    match &schema.resolution {
        Resolution::Ordered { .. } => None,
        Resolution::Discriminated { field, variants } => {
            variants.get(index).map(|(tag, _)| (*field, *tag))
        }
    }
}
