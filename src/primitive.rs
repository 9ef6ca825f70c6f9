//! Fixed-width and length-prefixed primitives on top of [`BorshBuffer`].
//!
//! ## Wire format summary
//! - Integers: natural width (1/2/4/8/16 bytes), little-endian, two's
//!   complement for signed types
//! - `bool`: one byte, `0` or `1`
//! - Floats: IEEE 754 bit pattern, little-endian, no NaN canonicalization
//! - Strings: u32 byte length + UTF-8 bytes, no terminator

use crate::buffer::BorshBuffer;
use crate::error::{Error, Result};
use crate::integer::Integer;

impl BorshBuffer<'_> {
    /// Write a length or count as the u32 prefix used by strings and sequences.
    pub fn write_len(&mut self, len: usize) -> Result<&mut Self> {
        let len = u32::try_from(len)
            .map_err(|_| Error::InvalidArgument(format!("length {} exceeds u32::MAX", len)))?;
        self.write_u32(len)
    }

    // ── Signed integers ────────────────────────────────────────────────────

    pub fn write_i8(&mut self, v: i8) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i32(&mut self, v: i32) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i128(&mut self, v: i128) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i128(&mut self) -> Result<i128> {
        Ok(i128::from_le_bytes(self.read_array()?))
    }

    // ── 128-bit from arbitrary precision ───────────────────────────────────

    /// Write an arbitrary-precision integer as a 16-byte little-endian u128.
    ///
    /// The minimal big-endian magnitude is reversed and zero-padded up to 16
    /// bytes. Values outside `[0, 2^128)` are rejected before anything is
    /// written.
    pub fn write_u128_integer(&mut self, v: &Integer) -> Result<&mut Self> {
        if v.is_negative() {
            return Err(Error::IntegerUnderflow);
        }
        if v.bit_len() > 128 {
            return Err(Error::IntegerOverflow);
        }
        let mut le = [0u8; 16];
        for (dst, src) in le.iter_mut().zip(v.magnitude().iter().rev()) {
            *dst = *src;
        }
        self.write_bytes(&le)
    }

    /// Read 16 little-endian bytes as a non-negative arbitrary-precision
    /// integer. The top bit is magnitude, never sign.
    pub fn read_u128_integer(&mut self) -> Result<Integer> {
        let mut be: [u8; 16] = self.read_array()?;
        be.reverse();
        Ok(Integer::from_be_bytes(false, &be))
    }

    // ── bool / floats ──────────────────────────────────────────────────────

    pub fn write_bool(&mut self, v: bool) -> Result<&mut Self> {
        self.write_u8(v as u8)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::InvalidEncoding(format!(
                "invalid boolean encoding: {} (must be 0 or 1)",
                v
            ))),
        }
    }

    pub fn write_f32(&mut self, v: f32) -> Result<&mut Self> {
        self.write_u32(v.to_bits())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<&mut Self> {
        self.write_u64(v.to_bits())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    // ── Strings ────────────────────────────────────────────────────────────

    /// u32 byte length followed by the UTF-8 bytes.
    pub fn write_string(&mut self, v: &str) -> Result<&mut Self> {
        self.write_len(v.len())?;
        self.write_bytes(v.as_bytes())
    }

    /// Read a length-prefixed string, borrowing from the buffer.
    pub fn read_str(&mut self) -> Result<&str> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|e| Error::invalid_encoding(e))
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.read_str().map(str::to_owned)
    }
}
