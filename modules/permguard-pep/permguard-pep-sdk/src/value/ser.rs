//! `serde` serializer that builds a [`Value`] directly.
//!
//! Output follows `serde_json::to_value`: unit and `None` become `Null`,
//! enum variants are externally tagged, non-finite floats become `Null`, and
//! map keys must serialize as strings, integers, booleans or chars.
//!
//! Every nested value costs one level of depth. A graph that refers back to
//! itself through shared pointers never bottoms out, so it hits
//! [`MAX_DEPTH`] and fails with [`CodecError::CyclicValueGraph`] instead of
//! exhausting the stack.

use serde::ser::{self, Impossible, Serialize};

use super::{PropertyMap, Value};
use crate::error::CodecError;

/// Deepest nesting accepted by [`Value::from_serialize`].
///
/// Same bound `serde_json` applies when parsing.
pub const MAX_DEPTH: usize = 128;

pub fn to_value<T>(native: &T) -> Result<Value, CodecError>
where
    T: Serialize + ?Sized,
{
    native.serialize(ValueSerializer { depth: 0 })
}

#[derive(Clone, Copy)]
struct ValueSerializer {
    depth: usize,
}

impl ValueSerializer {
    fn nested(self) -> Result<Self, CodecError> {
        if self.depth >= MAX_DEPTH {
            return Err(CodecError::CyclicValueGraph {
                max_depth: MAX_DEPTH,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
        })
    }
}

fn out_of_range(n: &dyn std::fmt::Display) -> CodecError {
    CodecError::UnsupportedValueType(format!("integer {n} does not fit into 64 bits"))
}

fn tagged(variant: &str, value: Value) -> Value {
    let mut map = PropertyMap::new();
    map.insert(variant.to_owned(), value);
    Value::Map(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = CodecError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value, CodecError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, CodecError> {
        Ok(Value::from(i32::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, CodecError> {
        Ok(Value::from(i32::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, CodecError> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, CodecError> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, CodecError> {
        i64::try_from(v)
            .map(Value::from)
            .map_err(|_| out_of_range(&v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, CodecError> {
        Ok(Value::from(u32::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, CodecError> {
        Ok(Value::from(u32::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, CodecError> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, CodecError> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, CodecError> {
        u64::try_from(v)
            .map(Value::from)
            .map_err(|_| out_of_range(&v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, CodecError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, CodecError> {
        Ok(if v.is_finite() {
            Value::Number(v)
        } else {
            Value::Null
        })
    }

    fn serialize_char(self, v: char) -> Result<Value, CodecError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, CodecError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, CodecError> {
        Ok(Value::List(v.iter().map(|b| Value::from(u32::from(*b))).collect()))
    }

    fn serialize_none(self) -> Result<Value, CodecError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, CodecError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self.nested()?)
    }

    fn serialize_unit(self) -> Result<Value, CodecError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, CodecError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, CodecError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, CodecError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self.nested()?)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Ok(tagged(variant, value.serialize(self.nested()?)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, CodecError> {
        Ok(SeqSerializer {
            inner: self.nested()?,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, CodecError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, CodecError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantSerializer, CodecError> {
        Ok(TupleVariantSerializer {
            variant,
            seq: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapSerializer, CodecError> {
        Ok(MapSerializer {
            inner: self.nested()?,
            map: PropertyMap::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<MapSerializer, CodecError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantSerializer, CodecError> {
        Ok(StructVariantSerializer {
            variant,
            fields: self.serialize_map(Some(len))?,
        })
    }
}

struct SeqSerializer {
    inner: ValueSerializer,
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(self.inner)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CodecError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, CodecError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, CodecError> {
        ser::SerializeSeq::end(self)
    }
}

struct TupleVariantSerializer {
    variant: &'static str,
    seq: SeqSerializer,
}

impl ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(&mut self.seq, value)
    }

    fn end(self) -> Result<Value, CodecError> {
        Ok(tagged(self.variant, Value::List(self.seq.items)))
    }
}

struct MapSerializer {
    inner: ValueSerializer,
    map: PropertyMap,
    next_key: Option<String>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        let key = self.next_key.take().ok_or_else(|| {
            CodecError::UnsupportedValueType("map value serialized before its key".to_owned())
        })?;
        self.map.insert(key, value.serialize(self.inner)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CodecError> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        self.map.insert(key.to_owned(), value.serialize(self.inner)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CodecError> {
        Ok(Value::Map(self.map))
    }
}

struct StructVariantSerializer {
    variant: &'static str,
    fields: MapSerializer,
}

impl ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeStruct::serialize_field(&mut self.fields, key, value)
    }

    fn end(self) -> Result<Value, CodecError> {
        Ok(tagged(self.variant, Value::Map(self.fields.map)))
    }
}

/// Serializes map keys; anything without a string form is rejected.
struct MapKeySerializer;

fn key_must_be_a_string() -> CodecError {
    CodecError::UnsupportedValueType("map key must be a string".to_owned())
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = CodecError;

    type SerializeSeq = Impossible<String, CodecError>;
    type SerializeTuple = Impossible<String, CodecError>;
    type SerializeTupleStruct = Impossible<String, CodecError>;
    type SerializeTupleVariant = Impossible<String, CodecError>;
    type SerializeMap = Impossible<String, CodecError>;
    type SerializeStruct = Impossible<String, CodecError>;
    type SerializeStructVariant = Impossible<String, CodecError>;

    fn serialize_bool(self, v: bool) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_char(self, v: char) -> Result<String, CodecError> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String, CodecError> {
        Ok(v.to_owned())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<String, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<String, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, CodecError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, CodecError> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, CodecError> {
        Err(key_must_be_a_string())
    }
}
