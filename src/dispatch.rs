//! Schema-driven encoding: walks a [`TypeTag`] and a [`Value`] together.
//!
//! Primitive tags go straight to the buffer's primitive codec, `optional` and
//! `fixed_array` to the composite codec, `sequence` to the sequence codec with
//! this dispatcher per element, and `aggregate` recurses into each field in
//! declared order.
//!
//! A registered type may contain itself through an optional or a sequence.
//! Decoding stops with `InvalidEncoding` once nesting passes
//! [`Config::max_depth`]. A type that contains itself directly has no finite
//! encoding and is not supported.

use crate::buffer::BorshBuffer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::schema::{Aggregate, AggregateSchema, TypeTag};
use crate::value::Value;

// ── Untyped ────────────────────────────────────────────────────────────────

/// Encode `value` as `tag`. A value whose shape does not match the tag is
/// rejected with `UnsupportedType`.
pub fn write_value(buf: &mut BorshBuffer<'_>, tag: &TypeTag, value: &Value) -> Result<()> {
    match (tag, value) {
        (TypeTag::U8, Value::U8(v)) => {
            buf.write_u8(*v)?;
        }
        (TypeTag::U16, Value::U16(v)) => {
            buf.write_u16(*v)?;
        }
        (TypeTag::U32, Value::U32(v)) => {
            buf.write_u32(*v)?;
        }
        (TypeTag::U64, Value::U64(v)) => {
            buf.write_u64(*v)?;
        }
        (TypeTag::U128, Value::U128(v)) => {
            buf.write_u128_integer(v)?;
        }
        (TypeTag::F32, Value::F32(v)) => {
            buf.write_f32(*v)?;
        }
        (TypeTag::F64, Value::F64(v)) => {
            buf.write_f64(*v)?;
        }
        (TypeTag::String, Value::String(s)) => {
            buf.write_string(s)?;
        }
        (TypeTag::Optional(inner), Value::Optional(v)) => {
            buf.write_optional(v.as_deref(), |b, v| write_value(b, inner, v))?;
        }
        (TypeTag::FixedArray(n), Value::FixedArray(bytes)) => {
            if bytes.len() != *n {
                return Err(Error::InvalidArgument(format!(
                    "fixed_array[{}] given {} bytes",
                    n,
                    bytes.len()
                )));
            }
            buf.write_fixed_array(bytes)?;
        }
        (TypeTag::Sequence(elem), Value::Sequence(items)) => {
            buf.write_sequence(items, |b, v| write_value(b, elem, v))?;
        }
        (TypeTag::Aggregate(agg), Value::Aggregate(fields)) => {
            write_fields(buf, &agg.schema(), fields)?;
        }
        (tag, value) => {
            return Err(Error::unsupported(format!(
                "cannot encode {} as {}",
                value.kind(),
                tag
            )));
        }
    }
    Ok(())
}

fn write_fields(buf: &mut BorshBuffer<'_>, schema: &AggregateSchema, fields: &[Value]) -> Result<()> {
    if fields.len() != schema.fields().len() {
        return Err(Error::InvalidArgument(format!(
            "{} declares {} fields, value has {}",
            schema.name(),
            schema.fields().len(),
            fields.len()
        )));
    }
    tracing::trace!(aggregate = schema.name(), "encoding aggregate");
    for (descriptor, value) in schema.fields().iter().zip(fields) {
        write_value(buf, &descriptor.tag, value)?;
    }
    Ok(())
}

/// Decode one value of type `tag`.
pub fn read_value(buf: &mut BorshBuffer<'_>, tag: &TypeTag, config: &Config) -> Result<Value> {
    read_nested(buf, tag, config, 0)
}

// `depth` counts the optionals, sequences and aggregates enclosing `tag`.
fn read_nested(
    buf: &mut BorshBuffer<'_>,
    tag: &TypeTag,
    config: &Config,
    depth: usize,
) -> Result<Value> {
    Ok(match tag {
        TypeTag::U8 => Value::U8(buf.read_u8()?),
        TypeTag::U16 => Value::U16(buf.read_u16()?),
        TypeTag::U32 => Value::U32(buf.read_u32()?),
        TypeTag::U64 => Value::U64(buf.read_u64()?),
        TypeTag::U128 => Value::U128(buf.read_u128_integer()?),
        TypeTag::F32 => Value::F32(buf.read_f32()?),
        TypeTag::F64 => Value::F64(buf.read_f64()?),
        TypeTag::String => Value::String(buf.read_string()?),
        TypeTag::Optional(inner) => {
            config.check_depth(depth + 1)?;
            Value::Optional(buf.read_optional(config.presence, |b| {
                read_nested(b, inner, config, depth + 1).map(Box::new)
            })?)
        }
        TypeTag::FixedArray(n) => Value::FixedArray(buf.read_fixed_array(*n)?.to_vec()),
        TypeTag::Sequence(elem) => {
            config.check_depth(depth + 1)?;
            Value::Sequence(buf.read_sequence(config, elem.min_encoded_len(), |b| {
                read_nested(b, elem, config, depth + 1)
            })?)
        }
        TypeTag::Aggregate(agg) => {
            config.check_depth(depth + 1)?;
            let schema = agg.schema();
            tracing::trace!(aggregate = schema.name(), "decoding aggregate");
            Value::Aggregate(
                schema
                    .fields()
                    .iter()
                    .map(|f| read_nested(&mut *buf, &f.tag, config, depth + 1))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
    })
}

// ── Typed ──────────────────────────────────────────────────────────────────

/// Encode each field of `value` through its accessor, in declared order.
pub fn write_aggregate<T: Aggregate>(buf: &mut BorshBuffer<'_>, value: &T) -> Result<()> {
    let schema = T::schema();
    tracing::trace!(aggregate = schema.name(), "encoding aggregate");
    for descriptor in schema.fields() {
        let field = value
            .get(&descriptor.name)
            .ok_or_else(|| missing_field(&schema, &descriptor.name))?;
        write_value(buf, &descriptor.tag, &field)?;
    }
    Ok(())
}

/// Construct `T::default()` and assign each field through its mutator, in
/// declared order. On error the partially built value is dropped.
pub fn read_aggregate<T: Aggregate>(buf: &mut BorshBuffer<'_>, config: &Config) -> Result<T> {
    let schema = T::schema();
    tracing::trace!(aggregate = schema.name(), "decoding aggregate");
    config.check_depth(1)?;
    let mut out = T::default();
    for descriptor in schema.fields() {
        let field = read_nested(buf, &descriptor.tag, config, 1)?;
        out.set(&descriptor.name, field)?;
    }
    Ok(out)
}

/// Encode an aggregate into a fresh growable buffer.
pub fn encode<T: Aggregate>(value: &T) -> Result<Vec<u8>> {
    let mut buf = BorshBuffer::growable();
    write_aggregate(&mut buf, value)?;
    Ok(buf.finish())
}

/// Decode an aggregate that must occupy all of `bytes`.
pub fn decode<T: Aggregate>(bytes: &[u8]) -> Result<T> {
    decode_with(bytes, &Config::default())
}

/// [`decode`] with an explicit configuration.
pub fn decode_with<T: Aggregate>(bytes: &[u8], config: &Config) -> Result<T> {
    let mut buf = BorshBuffer::wrap(bytes);
    let value = read_aggregate(&mut buf, config)?;
    match buf.remaining() {
        0 => Ok(value),
        n => {
            tracing::debug!(trailing = n, "rejecting trailing bytes");
            Err(Error::TrailingBytes(n))
        }
    }
}

/// Snapshot an aggregate's fields, in declared order, as a [`Value`].
pub fn to_value<T: Aggregate>(value: &T) -> Result<Value> {
    let schema = T::schema();
    schema
        .fields()
        .iter()
        .map(|d| {
            value
                .get(&d.name)
                .ok_or_else(|| missing_field(&schema, &d.name))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Aggregate)
}

/// Rebuild an aggregate from a [`Value::Aggregate`] through its mutators.
pub fn from_value<T: Aggregate>(value: Value) -> Result<T> {
    let schema = T::schema();
    let fields = match value {
        Value::Aggregate(fields) => fields,
        other => return Err(other.mismatch(&format!("aggregate<{}>", schema.name()))),
    };
    if fields.len() != schema.fields().len() {
        return Err(Error::InvalidArgument(format!(
            "{} declares {} fields, value has {}",
            schema.name(),
            schema.fields().len(),
            fields.len()
        )));
    }
    let mut out = T::default();
    for (descriptor, field) in schema.fields().iter().zip(fields) {
        out.set(&descriptor.name, field)?;
    }
    Ok(out)
}

fn missing_field(schema: &AggregateSchema, field: &str) -> Error {
    Error::unsupported(format!("{} has no field {}", schema.name(), field))
}
