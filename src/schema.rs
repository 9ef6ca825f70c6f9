//! Field descriptor lists for schema-driven encoding.
//!
//! An aggregate type is described by an ordered list of [`FieldDescriptor`]s.
//! The order is part of the wire contract: fields are encoded back to back in
//! declared order, so two peers must agree on it.
//!
//! Rust types take part through the [`Aggregate`] trait, usually implemented
//! with the [`aggregate!`](crate::aggregate) macro:
//!
//! ```rust
//! use borsh_serde::aggregate;
//! use borsh_serde::dispatch::{decode, encode};
//! use borsh_serde::schema::TypeTag;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Pair {
//!     a: u8,
//!     b: u32,
//! }
//!
//! aggregate!(Pair { a: TypeTag::U8, b: TypeTag::U32 });
//!
//! let bytes = encode(&Pair { a: 7, b: 256 }).unwrap();
//! assert_eq!(bytes, [0x07, 0x00, 0x01, 0x00, 0x00]);
//! assert_eq!(decode::<Pair>(&bytes).unwrap(), Pair { a: 7, b: 256 });
//! ```

use crate::composite::fixed_array_len;
use crate::error::Result;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// The closed set of encodable types.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTag {
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    String,
    Optional(Box<TypeTag>),
    /// Exactly `N` raw bytes.
    FixedArray(usize),
    Sequence(Box<TypeTag>),
    Aggregate(AggregateRef),
}

impl TypeTag {
    pub fn optional(inner: TypeTag) -> Self {
        TypeTag::Optional(Box::new(inner))
    }

    pub fn sequence(element: TypeTag) -> Self {
        TypeTag::Sequence(Box::new(element))
    }

    /// A fixed array tag from an untyped length, rejecting negative lengths
    /// with `InvalidArgument`.
    pub fn fixed_array(len: i64) -> Result<Self> {
        fixed_array_len(len).map(TypeTag::FixedArray)
    }

    pub fn aggregate(schema: AggregateSchema) -> Self {
        TypeTag::Aggregate(AggregateRef(Resolve::Built(Arc::new(schema))))
    }

    /// The tag of a registered aggregate type. The schema is looked up when a
    /// value is walked, not here, so a type may name itself through a
    /// sequence or an optional.
    pub fn of<T: Aggregate>() -> Self {
        TypeTag::Aggregate(AggregateRef(Resolve::Registered(T::schema)))
    }

    /// Fewest bytes any value of this type occupies on the wire.
    pub fn min_encoded_len(&self) -> usize {
        match self {
            TypeTag::U8 => 1,
            TypeTag::U16 => 2,
            TypeTag::U32 | TypeTag::F32 | TypeTag::String | TypeTag::Sequence(_) => 4,
            TypeTag::U64 | TypeTag::F64 => 8,
            TypeTag::U128 => 16,
            TypeTag::Optional(_) => 1,
            TypeTag::FixedArray(n) => *n,
            TypeTag::Aggregate(agg) => agg
                .schema()
                .fields()
                .iter()
                .map(|f| f.tag.min_encoded_len())
                .fold(0, usize::saturating_add),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::F32 => f.write_str("f32"),
            TypeTag::F64 => f.write_str("f64"),
            TypeTag::String => f.write_str("string"),
            TypeTag::Optional(inner) => write!(f, "optional<{}>", inner),
            TypeTag::FixedArray(n) => write!(f, "fixed_array[{}]", n),
            TypeTag::Sequence(elem) => write!(f, "sequence<{}>", elem),
            TypeTag::Aggregate(agg) => write!(f, "aggregate<{}>", agg.schema().name()),
        }
    }
}

/// The aggregate behind a [`TypeTag::Aggregate`]: either a schema built in
/// place or a registered [`Aggregate`] type resolved on use.
#[derive(Clone)]
pub struct AggregateRef(Resolve);

#[derive(Clone)]
enum Resolve {
    Built(Arc<AggregateSchema>),
    Registered(fn() -> Arc<AggregateSchema>),
}

impl AggregateRef {
    pub fn schema(&self) -> Arc<AggregateSchema> {
        match &self.0 {
            Resolve::Built(schema) => Arc::clone(schema),
            Resolve::Registered(resolve) => resolve(),
        }
    }
}

// A registered type resolves to the same `Arc` every time, so the pointer
// check ends the comparison of a self-referencing schema.
impl PartialEq for AggregateRef {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.schema(), other.schema());
        Arc::ptr_eq(&a, &b) || a == b
    }
}

impl fmt::Debug for AggregateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aggregate<{}>", self.schema().name())
    }
}

/// One member of an aggregate type. The name is for diagnostics and for
/// routing values through [`Aggregate::get`] / [`Aggregate::set`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub tag: TypeTag,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        FieldDescriptor {
            name: name.into(),
            tag,
        }
    }
}

/// An aggregate type: a name and its fields in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl AggregateSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        AggregateSchema {
            name: name.into(),
            fields,
        }
    }

    /// Append a field after the ones already declared.
    pub fn field(mut self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.fields.push(FieldDescriptor::new(name, tag));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// A Rust type with a field descriptor list.
///
/// `Default` is the zero-argument constructor used on the read path; `get`
/// and `set` are the per-field accessor and mutator, addressed by field name.
pub trait Aggregate: Default {
    /// The type's field list. Must return the same `Arc` on every call;
    /// [`aggregate!`](crate::aggregate) builds it once and caches it.
    fn schema() -> Arc<AggregateSchema>;

    /// Current value of `field`, or `None` if the type has no such field.
    fn get(&self, field: &str) -> Option<Value>;

    /// Assign a decoded value to `field`.
    fn set(&mut self, field: &str, value: Value) -> Result<()>;
}

/// Implement [`Aggregate`], [`IntoValue`](crate::value::IntoValue) and
/// [`FromValue`](crate::value::FromValue) for a struct from its field list.
///
/// Fields are encoded in the order listed here. Every field type must
/// implement `Clone`, `IntoValue` and `FromValue`.
#[macro_export]
macro_rules! aggregate {
    ($ty:ident { $($field:ident : $tag:expr),* $(,)? }) => {
        impl $crate::schema::Aggregate for $ty {
            fn schema() -> ::std::sync::Arc<$crate::schema::AggregateSchema> {
                static SCHEMA: ::std::sync::OnceLock<
                    ::std::sync::Arc<$crate::schema::AggregateSchema>,
                > = ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(SCHEMA.get_or_init(|| {
                    ::std::sync::Arc::new($crate::schema::AggregateSchema::new(
                        stringify!($ty),
                        vec![$($crate::schema::FieldDescriptor::new(stringify!($field), $tag)),*],
                    ))
                }))
            }

            fn get(&self, field: &str) -> Option<$crate::value::Value> {
                match field {
                    $(stringify!($field) => Some($crate::value::IntoValue::into_value(
                        ::std::clone::Clone::clone(&self.$field),
                    )),)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set(&mut self, field: &str, value: $crate::value::Value) -> $crate::Result<()> {
                match field {
                    $(stringify!($field) => {
                        self.$field = $crate::value::FromValue::from_value(value)?;
                        Ok(())
                    })*
                    _ => Err($crate::Error::UnsupportedType(format!(
                        "{} has no field {}",
                        stringify!($ty),
                        field
                    ))),
                }
            }
        }

        impl $crate::value::IntoValue for $ty {
            fn into_value(self) -> $crate::value::Value {
                $crate::value::Value::Aggregate(vec![
                    $($crate::value::IntoValue::into_value(self.$field)),*
                ])
            }
        }

        impl $crate::value::FromValue for $ty {
            fn from_value(value: $crate::value::Value) -> $crate::Result<Self> {
                $crate::dispatch::from_value(value)
            }
        }
    };
}
