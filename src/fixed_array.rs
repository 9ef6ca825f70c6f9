//! Serde helper module for fixed-size byte arrays.
//!
//! A fixed array is a raw byte run whose length is part of the static type,
//! so the wire carries **no length prefix**: exactly `N` bytes.
//!
//! # Usage
//!
//! Annotate any `[u8; N]` field with `#[serde(with = "borsh_serde::fixed_array")]`:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use borsh_serde::{from_bytes, to_bytes};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! pub struct AccessKey {
//!     pub nonce: u64,
//!     #[serde(with = "borsh_serde::fixed_array")]
//!     pub public_key: [u8; 33],
//! }
//!
//! let key = AccessKey { nonce: 7, public_key: [0xAB; 33] };
//!
//! let bytes = to_bytes(&key).unwrap();
//! assert_eq!(bytes.len(), 8 + 33);
//! assert_eq!(&bytes[8..], [0xAB; 33]);
//!
//! let decoded: AccessKey = from_bytes(&bytes).unwrap();
//! assert_eq!(key, decoded);
//! ```
//!
//! # Why not plain `[u8; N]`
//!
//! serde only implements `Serialize`/`Deserialize` for arrays up to 32
//! elements, and encodes them element by element. This module accepts any
//! `N` and writes the bytes in one copy. The wire layout is the same.

use std::fmt;
use std::marker::PhantomData;

// ── Sealed trait ──────────────────────────────────────────────────────────

mod private {
    pub trait Sealed {}
}

/// Marker trait for types encoded as a fixed-size byte array.
///
/// This trait is sealed; only `[u8; N]` implements it.
pub trait FixedArray: private::Sealed + Sized {
    /// The byte length on the wire.
    const LEN: usize;
    /// Borrow the raw bytes.
    fn as_bytes(&self) -> &[u8];
    /// Construct from a slice of exactly `LEN` bytes.
    fn from_exact_bytes(bytes: &[u8]) -> Option<Self>;
}

impl<const N: usize> private::Sealed for [u8; N] {}

impl<const N: usize> FixedArray for [u8; N] {
    const LEN: usize = N;

    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
    fn from_exact_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok()
    }
}

// ── serde `with` module functions ─────────────────────────────────────────

/// Serialize `value` as exactly `N` raw bytes. No length prefix is written.
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: FixedArray,
    S: serde::Serializer,
{
    // FIXED_ARRAY_TOKEN tells the Borsh serializer to write the helper's
    // bytes without a length prefix. Other serializers see plain bytes.
    serializer.serialize_newtype_struct(
        crate::FIXED_ARRAY_TOKEN,
        &FixedArrayHelper(value.as_bytes()),
    )
}

/// Deserialize exactly `N` bytes. No length prefix is read.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FixedArray,
    D: serde::Deserializer<'de>,
{
    // The Borsh deserializer recognises the token and hands over `LEN` raw
    // bytes via `visit_bytes`; other formats see an `N`-tuple.
    deserializer.deserialize_tuple_struct(
        crate::FIXED_ARRAY_TOKEN,
        T::LEN,
        FixedArrayVisitor::<T>(PhantomData),
    )
}

// ── Internal types ─────────────────────────────────────────────────────────

/// Wraps a raw byte slice so `serialize_bytes` is called on it.
struct FixedArrayHelper<'a>(&'a [u8]);

impl serde::Serialize for FixedArrayHelper<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

struct FixedArrayVisitor<T>(PhantomData<T>);

impl<'de, T: FixedArray> serde::de::Visitor<'de> for FixedArrayVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed array of {} bytes", T::LEN)
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<T, E> {
        T::from_exact_bytes(v).ok_or_else(|| E::invalid_length(v.len(), &self))
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<T, E> {
        self.visit_bytes(&v)
    }

    // Fallback for formats that deliver the tuple element by element.
    fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<T, A::Error> {
        let mut buf = Vec::with_capacity(T::LEN);
        while let Some(b) = seq.next_element::<u8>()? {
            buf.push(b);
        }
        T::from_exact_bytes(&buf).ok_or_else(|| serde::de::Error::invalid_length(buf.len(), &self))
    }
}
