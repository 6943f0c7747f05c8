//! Helpers shared by the generated-style resource models.

use std::hash::{Hash, Hasher};
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// Wire value written for an enum variant this SDK version did not recognise.
pub const UNKNOWN_ENUM_VALUE: &str = "UNKNOWN_ENUM_VALUE";

/// Map round-tripping for request/response bodies.
pub trait Model: Serialize + DeserializeOwned {
    /// The model as a JSON object keyed by wire names.
    fn to_map(&self) -> ApiResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ApiError::invalid_parameter(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    fn from_map(map: Map<String, Value>) -> ApiResult<Self> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

/// Free-form JSON carried inside a model, such as a defined tag value.
///
/// Serializes exactly like the wrapped value but can be hashed, so models
/// holding one can still derive `Hash`. Object keys are hashed in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonValue(pub Value);

impl JsonValue {
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Deref for JsonValue {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Hash for JsonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_json(&self.0, state);
    }
}

fn hash_json<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(n) => n.to_string().hash(state),
        Value::String(s) => s.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_json(item, state);
            }
        }
        Value::Object(map) => {
            map.len().hash(state);
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            for (key, item) in entries {
                key.hash(state);
                hash_json(item, state);
            }
        }
    }
}

/// Declare a string-backed API enum.
///
/// Generates the enum plus an `UnknownValue` fallback, `as_str`, `Display`,
/// case-insensitive `FromStr` and serde support. Unrecognised wire values
/// deserialize to `UnknownValue` instead of failing, and are logged.
///
/// ```
/// stratus_sdk_common::api_enum! {
///     /// Alarm severity.
///     pub enum Severity {
///         Critical => "CRITICAL",
///         Warning => "WARNING",
///     }
/// }
///
/// assert_eq!(Severity::Critical.as_str(), "CRITICAL");
/// assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
/// assert_eq!("PAGE_ME".parse::<Severity>().unwrap(), Severity::UnknownValue);
/// ```
#[macro_export]
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant, )+
            /// A value this SDK version does not recognise.
            UnknownValue,
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::UnknownValue => $crate::model::UNKNOWN_ENUM_VALUE,
                }
            }

            /// Case-insensitive lookup; anything unrecognised becomes `UnknownValue`.
            pub fn from_wire(value: &str) -> Self {
                $(
                    if value.eq_ignore_ascii_case($wire) {
                        return $name::$variant;
                    }
                )+
                $crate::__private::log::warn!(
                    "Unknown {} value '{}', mapping to {}",
                    stringify!($name),
                    value,
                    $crate::model::UNKNOWN_ENUM_VALUE
                );
                $name::UnknownValue
            }

            pub fn is_known(self) -> bool {
                !matches!(self, $name::UnknownValue)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(value: &str) -> ::std::result::Result<Self, Self::Err> {
                Ok(Self::from_wire(value))
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_wire(&value))
            }
        }
    };
}
