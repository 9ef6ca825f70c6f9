//! # borsh-serde
//!
//! A pure-Rust implementation of the Borsh binary format: a deterministic,
//! little-endian, non-self-describing encoding of structured values.
//!
//! ## Overview
//!
//! Everything is written through one byte cursor, [`BorshBuffer`], which can
//! be fixed-capacity (writes past the end fail) or growable. Two faces sit on
//! top of it:
//!
//! - **serde**: [`to_bytes`] / [`from_bytes`] for any type deriving
//!   `Serialize` / `Deserialize`. The derive is the compile-time field list;
//!   struct fields are encoded in declaration order.
//! - **schema**: [`schema::TypeTag`] and [`schema::AggregateSchema`] describe
//!   types at runtime, [`value::Value`] carries untyped values, and the
//!   [`dispatch`] module walks the two together. Rust structs opt in with the
//!   [`aggregate!`] macro.
//!
//! ## Type mapping
//!
//! | Rust / schema type | Borsh encoding |
//! |-------------------|--------------|
//! | `bool`            | 1 byte: 0 or 1 |
//! | `u8`/`u16`/`u32`/`u64` | 1/2/4/8 bytes, little-endian |
//! | `u128`            | 16 bytes, little-endian, zero-padded high bytes |
//! | `i8` … `i128`     | natural width, little-endian two's complement |
//! | `f32`, `f64`      | IEEE 754 bit pattern, little-endian |
//! | `char`            | u32 Unicode scalar value |
//! | `&str`, `String`  | u32 byte length + UTF-8 bytes, no terminator |
//! | byte strings      | u32 length + raw bytes |
//! | `Option<T>`       | 1 presence byte (0 or 1) + encoded T iff present |
//! | `[u8; N]` (fixed array) | exactly N raw bytes, no prefix |
//! | `Vec<T>` / seq    | u32 count + encoded elements |
//! | `()` / unit struct | 0 bytes |
//! | Tuple / tuple struct | fields encoded consecutively (no prefix) |
//! | Struct / aggregate | fields encoded consecutively in declared order |
//! | Enum              | 1-byte variant index + variant fields |
//! | Map               | u32 count + alternating encoded keys and values |
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use borsh_serde::{from_bytes, to_bytes};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Transfer {
//!     receiver: String,
//!     amount: u128,
//!     memo: Option<String>,
//! }
//!
//! let t = Transfer {
//!     receiver: "bob".into(),
//!     amount: 1_000_000,
//!     memo: None,
//! };
//!
//! let bytes = to_bytes(&t).unwrap();
//! assert_eq!(bytes.len(), (4 + 3) + 16 + 1);
//!
//! let decoded: Transfer = from_bytes(&bytes).unwrap();
//! assert_eq!(t, decoded);
//! ```

pub mod buffer;
pub mod composite;
pub mod config;
pub mod de;
pub mod dispatch;
pub mod error;
pub mod fixed_array;
pub mod integer;
pub mod primitive;
pub mod schema;
pub mod sequence;
pub mod ser;
pub mod value;

pub use buffer::BorshBuffer;
pub use config::{Config, PresenceMode};
pub use de::{Deserializer, from_bytes, from_bytes_partial, from_bytes_with, from_reader};
pub use error::{Error, Result};
pub use integer::Integer;
pub use ser::{Serializer, to_buffer, to_bytes, to_writer};

pub use serde::{Deserialize, Serialize};

/// Newtype/tuple-struct name that marks a fixed array for the serializer and
/// deserializer. See [`fixed_array`].
pub(crate) const FIXED_ARRAY_TOKEN: &str = "$borsh_serde::FixedArray";
