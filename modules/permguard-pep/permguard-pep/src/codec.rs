//! Conversion between [`Value`] and `google.protobuf.Value`/`Struct`.

use prost_types::value::Kind;
use prost_types::{ListValue, NullValue, Struct};

use permguard_pep_sdk::{PropertyMap, Value};

/// Encode a value into its protobuf form.
#[must_use]
pub fn encode_value(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => Kind::NullValue(i32::from(NullValue::NullValue)),
        Value::Bool(b) => Kind::BoolValue(*b),
        Value::Number(n) => Kind::NumberValue(*n),
        Value::String(s) => Kind::StringValue(s.clone()),
        Value::List(items) => Kind::ListValue(ListValue {
            values: items.iter().map(encode_value).collect(),
        }),
        Value::Map(map) => Kind::StructValue(encode_map(map)),
    };
    prost_types::Value { kind: Some(kind) }
}

/// Decode a protobuf value; a value with no kind set decodes to [`Value::Null`].
#[must_use]
pub fn decode_value(value: prost_types::Value) -> Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::NumberValue(n)) => Value::Number(n),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => {
            Value::List(list.values.into_iter().map(decode_value).collect())
        }
        Some(Kind::StructValue(s)) => Value::Map(decode_map(s)),
    }
}

/// Encode a property map; an empty map yields an empty, present `Struct`.
#[must_use]
pub fn encode_map(map: &PropertyMap) -> Struct {
    Struct {
        fields: map
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    }
}

#[must_use]
pub fn decode_map(s: Struct) -> PropertyMap {
    s.fields
        .into_iter()
        .map(|(k, v)| (k, decode_value(v)))
        .collect()
}
