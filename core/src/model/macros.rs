//! Declaration macros for models, enums and unions.
//!
//! Field lines read `presence name: Type => "wire_key", with_name;` where
//! presence is `required`, `optional` or `nullable`. The presence keyword is
//! also the name of the `FieldReader`, `FieldWriter` and `Builder` method that
//! handles the field, which keeps the expansion free of per-presence branches.

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_field_type {
    (required $ty:ty) => { $ty };
    (optional $ty:ty) => { ::core::option::Option<$ty> };
    (nullable $ty:ty) => { $crate::model::Nullable<$ty> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_presence {
    (required) => { $crate::model::Presence::Required };
    (optional) => { $crate::model::Presence::Optional };
    (nullable) => { $crate::model::Presence::Nullable };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_arg {
    (required $ty:ty) => { impl ::core::convert::Into<$ty> };
    (optional $ty:ty) => { impl ::core::convert::Into<$ty> };
    (nullable $ty:ty) => { impl ::core::convert::Into<$crate::model::Nullable<$ty>> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_assign {
    (required $value:ident) => { ::core::convert::Into::into($value) };
    (optional $value:ident) => { ::core::option::Option::Some(::core::convert::Into::into($value)) };
    (nullable $value:ident) => { ::core::convert::Into::into($value) };
}

/// `serde` impls that delegate to `WireValue`.
#[doc(hidden)]
#[macro_export]
macro_rules! __wire_serde {
    ($name:ident) => {
        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(
                    &$crate::model::WireValue::to_wire(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <$crate::__private::serde_json::Value as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::model::WireValue>::from_wire(&value, stringify!($name))
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

/// Declare a model struct with its descriptor table, builder setters and
/// `with_*` mutators.
#[macro_export]
macro_rules! wire_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $presence:ident $field:ident : $ty:ty => $wire:literal, $with:ident;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::__wire_field_type!($presence $ty),
            )*
        }

        impl $name {
            /// Start building this model; `build` fails on the first missing
            /// required field.
            pub fn builder() -> $crate::model::Builder<Self> {
                $crate::model::Builder::new()
            }

            $(
                pub fn $with(&self, value: $crate::__wire_arg!($presence $ty)) -> Self {
                    let mut next = self.clone();
                    next.$field = $crate::__wire_assign!($presence value);
                    next
                }
            )*
        }

        impl $crate::model::Builder<$name> {
            $(
                pub fn $field(self, value: $crate::__wire_arg!($presence $ty)) -> Self {
                    self.$presence::<$ty>(stringify!($field), ::core::convert::Into::into(value))
                }
            )*
        }

        impl $crate::model::Model for $name {
            fn schema() -> &'static $crate::model::ModelSchema {
                static SCHEMA: $crate::model::ModelSchema = $crate::model::ModelSchema {
                    name: stringify!($name),
                    fields: &[
                        $(
                            $crate::model::FieldDescriptor {
                                name: stringify!($field),
                                wire_key: $wire,
                                kind: <$ty as $crate::model::WireValue>::KIND,
                                presence: $crate::__wire_presence!($presence),
                            },
                        )*
                    ],
                };
                &SCHEMA
            }

            fn read_fields(
                reader: &$crate::model::FieldReader<'_>,
            ) -> ::core::result::Result<Self, $crate::error::ModelError> {
                ::core::result::Result::Ok(Self {
                    $( $field: reader.$presence::<$ty>(stringify!($field))?, )*
                })
            }

            fn write_fields(&self, writer: &mut $crate::model::FieldWriter) {
                $( writer.$presence(stringify!($field), &self.$field); )*
            }
        }

        impl $crate::model::WireValue for $name {
            const KIND: $crate::model::FieldKind =
                $crate::model::FieldKind::Model(<$name as $crate::model::Model>::schema);

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
                path: &str,
            ) -> ::core::result::Result<Self, $crate::error::ModelError> {
                $crate::model::decode_at(value, path)
            }

            fn to_wire(&self) -> $crate::__private::serde_json::Value {
                $crate::model::encode(self)
            }
        }

        $crate::__wire_serde!($name);
    };
}

/// Declare a closed string enum. Each variant maps to exactly one literal.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $literal:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant, )*
        }

        impl $name {
            pub const LITERALS: &'static [&'static str] = &[$($literal),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $literal, )*
                }
            }

            pub fn from_literal(literal: &str) -> ::core::option::Option<Self> {
                match literal {
                    $( $literal => ::core::option::Option::Some($name::$variant), )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::model::WireValue for $name {
            const KIND: $crate::model::FieldKind = $crate::model::FieldKind::Enum(Self::LITERALS);

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
                path: &str,
            ) -> ::core::result::Result<Self, $crate::error::ModelError> {
                value
                    .as_str()
                    .and_then(Self::from_literal)
                    .ok_or_else(|| {
                        $crate::error::ModelError::mismatch(path, Self::KIND.describe(), value)
                    })
            }

            fn to_wire(&self) -> $crate::__private::serde_json::Value {
                $crate::__private::serde_json::Value::String(self.as_str().to_string())
            }
        }

        $crate::__wire_serde!($name);
    };
}

/// Declare a union resolved either by ordered trial or by a discriminator
/// field.
#[macro_export]
macro_rules! wire_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ordered {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty),
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant($ty), )*
        }

        impl $name {
            pub fn union_schema() -> &'static $crate::model::UnionSchema {
                static SCHEMA: $crate::model::UnionSchema = $crate::model::UnionSchema {
                    name: stringify!($name),
                    resolution: $crate::model::Resolution::Ordered {
                        candidates: &[$( <$ty as $crate::model::WireValue>::KIND ),*],
                    },
                };
                &SCHEMA
            }
        }

        impl $crate::model::WireValue for $name {
            const KIND: $crate::model::FieldKind = $crate::model::FieldKind::Union($name::union_schema);

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
                path: &str,
            ) -> ::core::result::Result<Self, $crate::error::ModelError> {
                // Each candidate's own decoder decides; kinds alone are looser
                // than the decoders (a uuid is only a string kind).
                $(
                    if let ::core::result::Result::Ok(inner) =
                        <$ty as $crate::model::WireValue>::from_wire(value, path)
                    {
                        $crate::__private::tracing::trace!(
                            name = stringify!($name),
                            variant = stringify!($variant),
                            "resolved union by ordered trial"
                        );
                        return ::core::result::Result::Ok($name::$variant(inner));
                    }
                )*
                ::core::result::Result::Err($crate::error::ModelError::mismatch(
                    path,
                    Self::KIND.describe(),
                    value,
                ))
            }

            fn to_wire(&self) -> $crate::__private::serde_json::Value {
                match self {
                    $( $name::$variant(inner) => $crate::model::WireValue::to_wire(inner), )*
                }
            }
        }

        $crate::__wire_serde!($name);
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident discriminator $field:literal {
            $(
                $(#[$variant_meta:meta])*
                $tag:literal => $variant:ident($ty:ty),
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant($ty), )*
        }

        impl $name {
            pub fn union_schema() -> &'static $crate::model::UnionSchema {
                static SCHEMA: $crate::model::UnionSchema = $crate::model::UnionSchema {
                    name: stringify!($name),
                    resolution: $crate::model::Resolution::Discriminated {
                        field: $field,
                        variants: &[$( ($tag, <$ty as $crate::model::WireValue>::KIND) ),*],
                    },
                };
                &SCHEMA
            }

            /// Discriminator literal of the held variant.
            pub fn tag(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => $tag, )*
                }
            }
        }

        impl $crate::model::WireValue for $name {
            const KIND: $crate::model::FieldKind = $crate::model::FieldKind::Union($name::union_schema);

            #[allow(unused_assignments)]
            fn from_wire(
                value: &$crate::__private::serde_json::Value,
                path: &str,
            ) -> ::core::result::Result<Self, $crate::error::ModelError> {
                let index = $crate::model::union::resolve(Self::union_schema(), value, path)?;
                let mut candidate = 0usize;
                $(
                    if candidate == index {
                        return <$ty as $crate::model::WireValue>::from_wire(value, path).map($name::$variant);
                    }
                    candidate += 1;
                )*
                ::core::result::Result::Err($crate::error::ModelError::mismatch(
                    path,
                    Self::KIND.describe(),
                    value,
                ))
            }

            fn to_wire(&self) -> $crate::__private::serde_json::Value {
                let mut value = match self {
                    $( $name::$variant(inner) => $crate::model::WireValue::to_wire(inner), )*
                };
                if let $crate::__private::serde_json::Value::Object(map) = &mut value {
                    map.insert(
                        $field.to_string(),
                        $crate::__private::serde_json::Value::String(self.tag().to_string()),
                    );
                }
                value
            }
        }

        $crate::__wire_serde!($name);
    };
}
