//! Untyped values for the schema-driven codec.

use crate::error::{Error, Result};
use crate::integer::Integer;

/// A value paired at encode time with a [`TypeTag`](crate::schema::TypeTag).
///
/// `Aggregate` holds field values in declared order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(Integer),
    F32(f32),
    F64(f64),
    String(String),
    Optional(Option<Box<Value>>),
    FixedArray(Vec<u8>),
    Sequence(Vec<Value>),
    Aggregate(Vec<Value>),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Optional(_) => "optional",
            Value::FixedArray(_) => "fixed_array",
            Value::Sequence(_) => "sequence",
            Value::Aggregate(_) => "aggregate",
        }
    }

    pub(crate) fn mismatch(self, expected: &str) -> Error {
        Error::unsupported(format!("expected {}, found {}", expected, self.kind()))
    }
}

/// Conversion of a Rust value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion of a decoded [`Value`] back into a Rust value.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! scalar_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other.mismatch(stringify!($t))),
                    }
                }
            }
        )*
    };
}

scalar_value!(
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Integer => U128,
);

impl IntoValue for u128 {
    fn into_value(self) -> Value {
        Value::U128(Integer::from(self))
    }
}

impl FromValue for u128 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::U128(v) => v.to_u128(),
            other => Err(other.mismatch("u128")),
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        Value::Optional(self.map(|v| Box::new(v.into_value())))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Optional(v) => v.map(|v| T::from_value(*v)).transpose(),
            other => Err(other.mismatch("optional")),
        }
    }
}

impl<T: IntoValue> IntoValue for Box<T> {
    fn into_value(self) -> Value {
        (*self).into_value()
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Sequence(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch("sequence")),
        }
    }
}

impl<const N: usize> IntoValue for [u8; N] {
    fn into_value(self) -> Value {
        Value::FixedArray(self.to_vec())
    }
}

impl<const N: usize> FromValue for [u8; N] {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::FixedArray(bytes) => {
                let len = bytes.len();
                bytes.try_into().map_err(|_| {
                    Error::InvalidArgument(format!("expected {} bytes, found {}", N, len))
                })
            }
            other => Err(other.mismatch("fixed_array")),
        }
    }
}
