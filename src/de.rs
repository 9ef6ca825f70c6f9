//! Borsh Deserializer

use crate::buffer::BorshBuffer;
use crate::config::Config;
use crate::error::{Error, Result};
use serde::de::{
    self, Deserialize, DeserializeOwned, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::borrow::Cow;
use std::io::Read;

/// Deserialize a value that must occupy all of `input`.
pub fn from_bytes<'de, T: Deserialize<'de>>(input: &'de [u8]) -> Result<T> {
    from_bytes_with(input, Config::default())
}

/// [`from_bytes`] with an explicit configuration.
pub fn from_bytes_with<'de, T: Deserialize<'de>>(input: &'de [u8], config: Config) -> Result<T> {
    let mut de = Deserializer::with_config(input, config);
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Deserialize a value from the front of `input`, also returning the
/// unconsumed bytes.
pub fn from_bytes_partial<'de, T: Deserialize<'de>>(input: &'de [u8]) -> Result<(T, &'de [u8])> {
    let mut de = Deserializer::new(input);
    let value = T::deserialize(&mut de)?;
    let consumed = de.position();
    Ok((value, &input[consumed..]))
}

/// Read `reader` to its end and deserialize one value from the bytes.
pub fn from_reader<R: Read, T: DeserializeOwned>(mut reader: R) -> Result<T> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_bytes(&bytes)
}

/// The Borsh deserializer. Reads from a [`BorshBuffer`], maintaining its
/// position.
pub struct Deserializer<'de> {
    buf: BorshBuffer<'de>,
    config: Config,
    depth: usize,
}

impl<'de> Deserializer<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub fn with_config(input: &'de [u8], config: Config) -> Self {
        Self::from_buffer(BorshBuffer::wrap(input), config)
    }

    /// Read from an existing buffer, starting at its current position.
    pub fn from_buffer(buf: BorshBuffer<'de>, config: Config) -> Self {
        Deserializer {
            buf,
            config,
            depth: 0,
        }
    }

    /// Position within the underlying buffer.
    pub fn position(&self) -> usize {
        self.buf.position()
    }

    /// Returns the unconsumed portion of the input buffer.
    pub fn remaining(&self) -> &[u8] {
        self.buf.remaining_bytes()
    }

    pub fn into_buffer(self) -> BorshBuffer<'de> {
        self.buf
    }

    /// Fail with `TrailingBytes` unless the input has been fully consumed.
    pub fn end(&self) -> Result<()> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => {
                tracing::debug!(trailing = n, "rejecting trailing bytes");
                Err(Error::TrailingBytes(n))
            }
        }
    }

    /// Run `f` one nesting level deeper, failing once `max_depth` is passed.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let depth = self.depth + 1;
        self.config.check_depth(depth)?;
        self.depth = depth;
        let out = f(self);
        self.depth -= 1;
        out
    }

    /// Read a u32 length and that many bytes, borrowing from the input when
    /// possible.
    fn read_prefixed(&mut self) -> Result<Cow<'de, [u8]>> {
        let len = self.buf.read_u32()? as usize;
        self.buf.read_cow(len)
    }
}

fn utf8_error(e: std::str::Utf8Error) -> Error {
    Error::invalid_encoding(e)
}

// ── Main Deserializer impl ─────────────────────────────────────────────────

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported(
            "deserialize_any (Borsh is not self-describing)",
        ))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.buf.read_bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.buf.read_i8()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.buf.read_i16()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.buf.read_i32()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.buf.read_i64()?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i128(self.buf.read_i128()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.buf.read_u8()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.buf.read_u16()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.buf.read_u32()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.buf.read_u64()?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u128(self.buf.read_u128()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.buf.read_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.buf.read_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.buf.read_u32()?;
        let c = char::from_u32(v).ok_or_else(|| {
            Error::invalid_encoding(format!("{:#x} is not a Unicode scalar value", v))
        })?;
        visitor.visit_char(c)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.read_prefixed()? {
            Cow::Borrowed(bytes) => {
                visitor.visit_borrowed_str(std::str::from_utf8(bytes).map_err(utf8_error)?)
            }
            Cow::Owned(bytes) => visitor.visit_string(
                String::from_utf8(bytes).map_err(|e| utf8_error(e.utf8_error()))?,
            ),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.read_prefixed()? {
            Cow::Borrowed(bytes) => visitor.visit_borrowed_bytes(bytes),
            Cow::Owned(bytes) => visitor.visit_byte_buf(bytes),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.buf.read_presence(self.config.presence)? {
            self.nested(|de| visitor.visit_some(de))
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.buf.read_sequence_len(&self.config, 0)?;
        self.nested(|de| visitor.visit_seq(SeqDeserializer::new(de, count)))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        // Fixed-length: no count prefix
        self.nested(|de| visitor.visit_seq(SeqDeserializer::new(de, len)))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        if name == crate::FIXED_ARRAY_TOKEN {
            return match self.buf.read_cow(len)? {
                Cow::Borrowed(bytes) => visitor.visit_borrowed_bytes(bytes),
                Cow::Owned(bytes) => visitor.visit_byte_buf(bytes),
            };
        }
        self.nested(|de| visitor.visit_seq(SeqDeserializer::new(de, len)))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.buf.read_sequence_len(&self.config, 0)?;
        self.nested(|de| visitor.visit_map(MapDeserializer::new(de, count)))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        // Aggregate: fields in declaration order, no count prefix
        tracing::trace!(aggregate = name, "deserializing struct");
        self.nested(|de| visitor.visit_seq(SeqDeserializer::new(de, fields.len())))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.nested(|de| visitor.visit_enum(EnumDeserializer::new(de)))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        // Identifiers are variant indices: a single byte
        visitor.visit_u32(u32::from(self.buf.read_u8()?))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported(
            "deserialize_ignored_any (Borsh is not self-describing)",
        ))
    }
}

// ── SeqDeserializer: fixed count ───────────────────────────────────────────

struct SeqDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'a, 'de> SeqDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, count: usize) -> Self {
        SeqDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de, 'a> SeqAccess<'de> for SeqDeserializer<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    // Never promise more elements than there are input bytes left, so a
    // hostile count cannot drive a large preallocation.
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining.min(self.de.buf.remaining()))
    }
}

// ── MapDeserializer ────────────────────────────────────────────────────────

struct MapDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'a, 'de> MapDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, count: usize) -> Self {
        MapDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de, 'a> MapAccess<'de> for MapDeserializer<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining.min(self.de.buf.remaining()))
    }
}

// ── EnumDeserializer ───────────────────────────────────────────────────────

struct EnumDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> EnumDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>) -> Self {
        EnumDeserializer { de }
    }
}

impl<'de, 'a> EnumAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: de::DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant)> {
        // One-byte variant index, fed to the seed as serde's u32 discriminant
        let variant_index = self.de.buf.read_u8()?;
        let val = seed.deserialize(de::value::U32Deserializer::<Error>::new(u32::from(
            variant_index,
        )))?;
        Ok((val, self))
    }
}

impl<'de, 'a> VariantAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;

    /// Unit variant: no data follows the index
    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    /// Newtype variant: deserialize the inner value
    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    /// Tuple variant: deserialize a fixed-length sequence of fields
    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, len))
    }

    /// Struct variant: deserialize fields consecutively by name list length
    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, fields.len()))
    }
}
