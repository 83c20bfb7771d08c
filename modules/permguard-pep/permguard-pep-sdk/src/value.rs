//! Generic property and context values.
//!
//! [`Value`] is the tagged union carried by subject/resource/action
//! properties and by request/evaluation context. Untyped native data
//! (`serde_json::Value` or any `Serialize` type) is accepted only at the
//! conversion functions in this module and is normalized into [`Value`]
//! right away.
//!
//! Numbers are always `f64`. When a number is turned back into native JSON,
//! an integral value that fits into `i64` becomes a JSON integer and
//! everything else a JSON float, so integer properties survive the trip.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

mod ser;

pub use ser::MAX_DEPTH;

/// String-keyed map of values, ordered by key.
pub type PropertyMap = BTreeMap<String, Value>;

/// Generic property/context value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Explicit `null`; distinct from an absent key.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(PropertyMap),
}

impl Value {
    /// Normalize a native JSON value.
    #[must_use]
    pub fn from_native(native: serde_json::Value) -> Self {
        match native {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_native).collect())
            }
            serde_json::Value::Object(map) => Self::Map(encode_map(map)),
        }
    }

    /// Normalize any serializable native value.
    ///
    /// The result matches what `serde_json::to_value` would produce.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnsupportedValueType`] when the value has no JSON
    ///   representation (for example a map with non-string keys or an
    ///   integer wider than 64 bits)
    /// - [`CodecError::CyclicValueGraph`] when the value nests deeper than
    ///   [`MAX_DEPTH`], as a self-referencing graph does
    pub fn from_serialize<T>(native: &T) -> Result<Self, CodecError>
    where
        T: Serialize + ?Sized,
    {
        ser::to_value(native)
    }

    /// Convert back into a native JSON value.
    ///
    /// Non-finite numbers have no JSON form and become `null`.
    #[must_use]
    pub fn into_native(self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(b),
            Self::Number(n) => number_to_native(n),
            Self::String(s) => serde_json::Value::String(s),
            Self::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Self::into_native).collect())
            }
            Self::Map(map) => serde_json::Value::Object(decode_map(map)),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Normalize a native JSON object into a [`PropertyMap`].
#[must_use]
pub fn encode_map(native: serde_json::Map<String, serde_json::Value>) -> PropertyMap {
    native
        .into_iter()
        .map(|(k, v)| (k, Value::from_native(v)))
        .collect()
}

/// Convert a [`PropertyMap`] back into a native JSON object.
#[must_use]
pub fn decode_map(map: PropertyMap) -> serde_json::Map<String, serde_json::Value> {
    map.into_iter().map(|(k, v)| (k, v.into_native())).collect()
}

// i64::MIN and i64::MAX are exact powers of two as f64, so the bounds check
// guarantees the cast below is lossless.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_to_native(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

impl From<serde_json::Value> for Value {
    fn from(native: serde_json::Value) -> Self {
        Self::from_native(native)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        value.into_native()
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

// Integers beyond 2^53 lose precision; the wire only carries doubles.
impl From<i64> for Value {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for Value {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<PropertyMap> for Value {
    #[inline]
    fn from(map: PropertyMap) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
