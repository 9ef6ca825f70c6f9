//! Arbitrary-precision integers for the 128-bit wire type.
//!
//! Borsh `u128` values are frequently produced by hosts whose native integers
//! are wider or signed, so the schema-driven codec carries them as an
//! [`Integer`]: a sign plus a big-endian magnitude of any length. Range is
//! checked only when the value is written.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A signed integer of unbounded width.
///
/// The magnitude is stored big-endian without leading zero bytes; zero has an
/// empty magnitude and is never negative.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    magnitude: Vec<u8>,
}

impl Integer {
    /// Build an integer from a sign and big-endian magnitude bytes.
    pub fn from_be_bytes(negative: bool, magnitude: &[u8]) -> Self {
        let start = magnitude
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(magnitude.len());
        let magnitude = magnitude[start..].to_vec();
        Integer {
            negative: negative && !magnitude.is_empty(),
            magnitude,
        }
    }

    /// `2^bits`. Handy for boundary checks.
    pub fn pow2(bits: u32) -> Self {
        let mut magnitude = vec![0u8; bits as usize / 8 + 1];
        magnitude[0] = 1 << (bits % 8);
        Integer {
            negative: false,
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Minimal big-endian magnitude; empty for zero.
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    /// Number of significant bits in the magnitude.
    pub fn bit_len(&self) -> usize {
        match self.magnitude.first() {
            None => 0,
            Some(&top) => (self.magnitude.len() - 1) * 8 + (8 - top.leading_zeros() as usize),
        }
    }

    /// Narrow to `u128`, failing with `IntegerUnderflow` for negative values
    /// and `IntegerOverflow` for values of `2^128` or more.
    pub fn to_u128(&self) -> Result<u128> {
        if self.negative {
            return Err(Error::IntegerUnderflow);
        }
        if self.bit_len() > 128 {
            return Err(Error::IntegerOverflow);
        }
        Ok(self
            .magnitude
            .iter()
            .fold(0u128, |acc, &b| (acc << 8) | b as u128))
    }
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Integer {
            fn from(v: $t) -> Self {
                Integer::from_be_bytes(false, &v.to_be_bytes())
            }
        })*
    };
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Integer {
            fn from(v: $t) -> Self {
                Integer::from_be_bytes(v < 0, &v.unsigned_abs().to_be_bytes())
            }
        })*
    };
}

from_unsigned!(u8, u16, u32, u64, u128, usize);
from_signed!(i8, i16, i32, i64, i128, isize);

impl TryFrom<&Integer> for u128 {
    type Error = Error;

    fn try_from(v: &Integer) -> Result<u128> {
        v.to_u128()
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        let magnitude = || {
            self.magnitude
                .len()
                .cmp(&other.magnitude.len())
                .then_with(|| self.magnitude.cmp(&other.magnitude))
        };
        match (self.negative, other.negative) {
            (false, false) => magnitude(),
            (true, true) => magnitude().reverse(),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("0x")?;
        if self.magnitude.is_empty() {
            return f.write_str("0");
        }
        for b in &self.magnitude {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
