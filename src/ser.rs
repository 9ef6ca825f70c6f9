//! Borsh Serializer
//!
//! The [`Serializer`] writes into a [`BorshBuffer`], fixed or growable. serde's
//! derive supplies the field list of each struct, in declaration order.
//!
//! ## Wire format summary
//! - All values are little-endian
//! - Integers: natural width, bool: 1 byte, floats: IEEE 754 bit pattern
//! - Strings/Bytes: u32 length prefix + data, no padding, no terminator
//! - Sequences and maps: u32 count prefix + elements (map: key then value)
//! - Structs/Tuples/arrays: fields encoded consecutively, no prefix
//! - Options: 1-byte presence (0=None, 1=Some) + optional value
//! - Enums: 1-byte variant index + encoded variant fields

use crate::buffer::BorshBuffer;
use crate::error::{Error, Result};
use serde::ser::{self, Impossible, Serialize};
use std::io::Write;

// ── Public entry points ────────────────────────────────────────────────────

/// Serialize `value` into a freshly allocated `Vec<u8>` of Borsh bytes.
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut ser = Serializer::new(BorshBuffer::growable());
    value.serialize(&mut ser)?;
    Ok(ser.into_buffer().finish())
}

/// Serialize `value` into `buf` at its current position, returning the
/// buffer. A fixed-capacity buffer fails with `BufferOverflow` when the
/// encoding does not fit.
pub fn to_buffer<'a, T: Serialize + ?Sized>(
    buf: BorshBuffer<'a>,
    value: &T,
) -> Result<BorshBuffer<'a>> {
    let mut ser = Serializer::new(buf);
    value.serialize(&mut ser)?;
    Ok(ser.into_buffer())
}

/// Serialize `value` as Borsh bytes and write them to `writer`.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    let bytes = to_bytes(value)?;
    writer.write_all(&bytes)?;
    Ok(())
}

// ── Serializer ─────────────────────────────────────────────────────────────

/// The Borsh serializer.
///
/// Obtain one via [`to_bytes`] / [`to_buffer`], or construct directly:
///
/// ```rust
/// use borsh_serde::{BorshBuffer, Serializer};
/// use serde::Serialize;
///
/// let mut ser = Serializer::new(BorshBuffer::allocate(4));
/// 42u32.serialize(&mut ser).unwrap();
/// assert_eq!(ser.into_buffer().finish(), [42, 0, 0, 0]);
/// ```
pub struct Serializer<'a> {
    buf: BorshBuffer<'a>,
}

impl<'a> Serializer<'a> {
    /// Create a new serializer that writes into `buf`.
    pub fn new(buf: BorshBuffer<'a>) -> Self {
        Serializer { buf }
    }

    /// Consume the serializer and return the buffer.
    pub fn into_buffer(self) -> BorshBuffer<'a> {
        self.buf
    }

    fn write_variant(&mut self, variant_index: u32) -> Result<()> {
        let index = u8::try_from(variant_index).map_err(|_| {
            Error::unsupported(format!("enum variant index {} exceeds 255", variant_index))
        })?;
        self.buf.write_u8(index)?;
        Ok(())
    }

    fn write_count(&mut self, len: Option<usize>) -> Result<()> {
        let len = len.ok_or_else(|| Error::unsupported("sequence of unknown length"))?;
        self.buf.write_len(len)?;
        Ok(())
    }
}

// ── serde::Serializer impl ─────────────────────────────────────────────────

impl<'s, 'a> ser::Serializer for &'s mut Serializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn is_human_readable(&self) -> bool {
        false
    }

    // ── Primitives ─────────────────────────────────────────────────────────

    /// 1 byte: 0 (false) or 1 (true)
    fn serialize_bool(self, v: bool) -> Result<()> {
        self.buf.write_bool(v)?;
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.buf.write_i8(v)?;
        Ok(())
    }
    fn serialize_i16(self, v: i16) -> Result<()> {
        self.buf.write_i16(v)?;
        Ok(())
    }
    fn serialize_i32(self, v: i32) -> Result<()> {
        self.buf.write_i32(v)?;
        Ok(())
    }
    fn serialize_i64(self, v: i64) -> Result<()> {
        self.buf.write_i64(v)?;
        Ok(())
    }
    fn serialize_i128(self, v: i128) -> Result<()> {
        self.buf.write_i128(v)?;
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.buf.write_u8(v)?;
        Ok(())
    }
    fn serialize_u16(self, v: u16) -> Result<()> {
        self.buf.write_u16(v)?;
        Ok(())
    }
    fn serialize_u32(self, v: u32) -> Result<()> {
        self.buf.write_u32(v)?;
        Ok(())
    }
    fn serialize_u64(self, v: u64) -> Result<()> {
        self.buf.write_u64(v)?;
        Ok(())
    }
    /// 16 bytes, little-endian
    fn serialize_u128(self, v: u128) -> Result<()> {
        self.buf.write_u128(v)?;
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.buf.write_f32(v)?;
        Ok(())
    }
    fn serialize_f64(self, v: f64) -> Result<()> {
        self.buf.write_f64(v)?;
        Ok(())
    }

    /// char → u32 Unicode scalar value
    fn serialize_char(self, v: char) -> Result<()> {
        self.buf.write_u32(v as u32)?;
        Ok(())
    }

    /// u32 byte length + UTF-8 bytes
    fn serialize_str(self, v: &str) -> Result<()> {
        self.buf.write_string(v)?;
        Ok(())
    }

    /// u32 length + raw bytes
    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.buf.write_len(v.len())?;
        self.buf.write_bytes(v)?;
        Ok(())
    }

    fn serialize_none(self) -> Result<()> {
        self.buf.write_presence(false)?;
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        self.buf.write_presence(true)?;
        value.serialize(self)
    }

    /// 0 bytes
    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    /// Unit enum variant → 1-byte variant index
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.write_variant(variant_index)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<()> {
        if name == crate::FIXED_ARRAY_TOKEN {
            // `FixedArrayHelper` calls `serialize_bytes`; route it to a raw
            // write without the length prefix.
            value.serialize(FixedArraySerializer(self))
        } else {
            value.serialize(self)
        }
    }

    /// Enum newtype variant → variant index + encoded inner value
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.write_variant(variant_index)?;
        value.serialize(self)
    }

    /// u32 element count + elements
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.write_count(len)?;
        Ok(self)
    }

    /// Fixed-length: elements without a count prefix
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    /// Enum tuple variant → variant index + fields (no inner count prefix)
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.write_variant(variant_index)?;
        Ok(self)
    }

    /// Map → u32 pair count + alternating key/value pairs
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        self.write_count(len)?;
        Ok(self)
    }

    /// Aggregate: fields encoded consecutively in declaration order
    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        tracing::trace!(aggregate = name, "serializing struct");
        Ok(self)
    }

    /// Enum struct variant → variant index + fields consecutively
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.write_variant(variant_index)?;
        Ok(self)
    }
}

// ── Compound serializer impls ──────────────────────────────────────────────

macro_rules! forward_serialize_element {
    ($t:ty, $method:ident) => {
        impl<'s, 'a> $t for &'s mut Serializer<'a> {
            type Ok = ();
            type Error = Error;
            fn $method<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

macro_rules! forward_serialize_field {
    ($t:ty) => {
        impl<'s, 'a> $t for &'s mut Serializer<'a> {
            type Ok = ();
            type Error = Error;
            fn serialize_field<T: Serialize + ?Sized>(
                &mut self,
                _key: &'static str,
                value: &T,
            ) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

forward_serialize_element!(ser::SerializeSeq, serialize_element);
forward_serialize_element!(ser::SerializeTuple, serialize_element);
forward_serialize_element!(ser::SerializeTupleStruct, serialize_field);
forward_serialize_element!(ser::SerializeTupleVariant, serialize_field);
forward_serialize_field!(ser::SerializeStruct);
forward_serialize_field!(ser::SerializeStructVariant);

impl<'s, 'a> ser::SerializeMap for &'s mut Serializer<'a> {
    type Ok = ();
    type Error = Error;
    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }
    fn end(self) -> Result<()> {
        Ok(())
    }
}

// ── FixedArraySerializer ───────────────────────────────────────────────────
//
// Accepts only the `serialize_bytes` call made by `FixedArrayHelper` and
// writes the bytes raw, without a length prefix.

struct FixedArraySerializer<'s, 'a>(&'s mut Serializer<'a>);

fn not_bytes() -> Error {
    Error::unsupported("fixed array must serialize as bytes")
}

macro_rules! reject {
    ($($method:ident($($arg:ty),*);)*) => {
        $(fn $method(self, $(_: $arg),*) -> Result<()> {
            Err(not_bytes())
        })*
    };
}

impl<'s, 'a> ser::Serializer for FixedArraySerializer<'s, 'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.0.buf.write_fixed_array(v)?;
        Ok(())
    }

    reject! {
        serialize_bool(bool);
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_f32(f32);
        serialize_f64(f64);
        serialize_char(char);
        serialize_str(&str);
        serialize_none();
        serialize_unit();
        serialize_unit_struct(&'static str);
        serialize_unit_variant(&'static str, u32, &'static str);
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _idx: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_bytes())
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_bytes())
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(not_bytes())
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _idx: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(not_bytes())
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(not_bytes())
    }
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(not_bytes())
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _idx: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(not_bytes())
    }
}
