//! The byte cursor underneath both the serde and the schema-driven codecs.
//!
//! A [`BorshBuffer`] is a contiguous byte region with one position shared by
//! reads and writes. All multi-byte primitives are little-endian.
//!
//! Two write modes exist:
//! - **fixed** ([`BorshBuffer::allocate`], [`BorshBuffer::wrap`]): writing past
//!   the end of the region fails with [`Error::BufferOverflow`];
//! - **growable** ([`BorshBuffer::growable`], [`BorshBuffer::with_capacity`]):
//!   the region is extended with zero bytes as needed.
//!
//! Reading past the end always fails with [`Error::BufferUnderflow`].

use crate::error::{Error, Result};
use std::borrow::Cow;

/// A little-endian read/write cursor over a byte region.
#[derive(Debug, Clone)]
pub struct BorshBuffer<'a> {
    data: Cow<'a, [u8]>,
    pos: usize,
    mark: Option<usize>,
    growable: bool,
}

impl BorshBuffer<'static> {
    /// A fixed-capacity buffer of exactly `capacity` zero bytes.
    pub fn allocate(capacity: usize) -> Self {
        BorshBuffer {
            data: Cow::Owned(vec![0; capacity]),
            pos: 0,
            mark: None,
            growable: false,
        }
    }

    /// An empty buffer that grows as it is written.
    pub fn growable() -> Self {
        Self::with_capacity(0)
    }

    /// An empty growable buffer with room for `capacity` bytes before it
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        BorshBuffer {
            data: Cow::Owned(Vec::with_capacity(capacity)),
            pos: 0,
            mark: None,
            growable: true,
        }
    }
}

impl<'a> BorshBuffer<'a> {
    /// Wrap existing bytes for reading. The region is fixed: writes overwrite
    /// a private copy and cannot extend it.
    pub fn wrap(bytes: &'a [u8]) -> Self {
        BorshBuffer {
            data: Cow::Borrowed(bytes),
            pos: 0,
            mark: None,
            growable: false,
        }
    }

    /// Current read/write position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of the underlying region.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes a fixed buffer can hold in total; for a growable buffer, the
    /// bytes it holds before its next reallocation.
    pub fn capacity(&self) -> usize {
        match &self.data {
            Cow::Owned(v) if self.growable => v.capacity(),
            _ => self.data.len(),
        }
    }

    pub fn is_growable(&self) -> bool {
        self.growable
    }

    /// Number of bytes between the position and the end of the region.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The unread portion of the region.
    pub fn remaining_bytes(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// The bytes from the start of the region to the current position.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.pos]
    }

    /// Consume the buffer, returning exactly the bytes before the position.
    pub fn finish(self) -> Vec<u8> {
        let mut bytes = self.data.into_owned();
        bytes.truncate(self.pos);
        bytes
    }

    /// Remember the current position.
    pub fn mark(&mut self) -> &mut Self {
        self.mark = Some(self.pos);
        self
    }

    /// Return to the last marked position. The mark is kept.
    pub fn reset(&mut self) -> Result<&mut Self> {
        self.pos = self.mark.ok_or(Error::MarkNotSet)?;
        Ok(self)
    }

    // ── Reads ──────────────────────────────────────────────────────────────

    /// Consume exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::BufferUnderflow {
                needed: n,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    /// Consume exactly `n` bytes. When the buffer wraps borrowed input the
    /// result borrows from it; otherwise the bytes are copied out.
    pub fn read_cow(&mut self, n: usize) -> Result<Cow<'a, [u8]>> {
        let start = self.pos;
        self.read_bytes(n)?;
        Ok(match &self.data {
            Cow::Borrowed(input) => {
                let input: &'a [u8] = *input;
                Cow::Borrowed(&input[start..self.pos])
            }
            Cow::Owned(v) => Cow::Owned(v[start..self.pos].to_vec()),
        })
    }

    /// Consume exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> Result<u128> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    // ── Writes ─────────────────────────────────────────────────────────────

    /// Claim the next `n` bytes for writing, extending a growable region.
    fn claim(&mut self, n: usize) -> Result<&mut [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            if !self.growable {
                return Err(Error::BufferOverflow {
                    needed: n,
                    remaining,
                });
            }
            let end = self.pos + n;
            self.data.to_mut().resize(end, 0);
        }
        let start = self.pos;
        self.pos += n;
        Ok(&mut self.data.to_mut()[start..start + n])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.claim(bytes.len())?.copy_from_slice(bytes);
        Ok(self)
    }

    pub fn write_u8(&mut self, v: u8) -> Result<&mut Self> {
        self.write_bytes(&[v])
    }

    pub fn write_u16(&mut self, v: u16) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u128(&mut self, v: u128) -> Result<&mut Self> {
        self.write_bytes(&v.to_le_bytes())
    }
}

impl Default for BorshBuffer<'static> {
    fn default() -> Self {
        Self::growable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_zeroed() {
        let buf = BorshBuffer::allocate(8);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.remaining_bytes(), [0u8; 8]);
    }

    #[test]
    fn test_little_endian_writes() {
        let mut buf = BorshBuffer::growable();
        buf.write_u8(0x01).unwrap();
        buf.write_u16(0x0203).unwrap();
        buf.write_u32(0x0405_0607).unwrap();
        buf.write_u64(0x08).unwrap();
        assert_eq!(
            buf.finish(),
            [0x01, 0x03, 0x02, 0x07, 0x06, 0x05, 0x04, 8, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_read_widths() {
        let bytes = [0xFF, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut buf = BorshBuffer::wrap(&bytes);
        assert_eq!(buf.read_u8().unwrap(), 0xFF);
        assert_eq!(buf.read_u16().unwrap(), 0x1234);
        assert_eq!(buf.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_underflow() {
        let mut buf = BorshBuffer::wrap(&[1, 2, 3]);
        assert_eq!(
            buf.read_u32(),
            Err(Error::BufferUnderflow {
                needed: 4,
                remaining: 3
            })
        );
        // A failed read does not move the position.
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.read_bytes(3).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_fixed_overflow() {
        let mut buf = BorshBuffer::allocate(3);
        buf.write_u16(7).unwrap();
        assert_eq!(
            buf.write_u16(7).map(|_| ()),
            Err(Error::BufferOverflow {
                needed: 2,
                remaining: 1
            })
        );
        assert_eq!(buf.position(), 2);
    }

    #[test]
    fn test_finish_ignores_spare_capacity() {
        let mut buf = BorshBuffer::allocate(64);
        buf.write_u32(1).unwrap();
        assert_eq!(buf.finish(), [1, 0, 0, 0]);
    }

    #[test]
    fn test_growable_extends() {
        let mut buf = BorshBuffer::with_capacity(2);
        buf.write_u64(u64::MAX).unwrap();
        assert!(buf.is_growable());
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.finish(), [0xFF; 8]);
    }

    #[test]
    fn test_mark_and_reset() {
        let mut buf = BorshBuffer::growable();
        buf.write_u8(9).unwrap();
        buf.mark();
        buf.write_u32(0).unwrap();
        buf.write_u8(1).unwrap();
        buf.reset().unwrap();
        buf.write_u32(42).unwrap();
        assert_eq!(buf.finish(), [9, 42, 0, 0, 0]);
    }

    #[test]
    fn test_reset_without_mark() {
        let mut buf = BorshBuffer::allocate(4);
        assert_eq!(buf.reset().map(|_| ()), Err(Error::MarkNotSet));
    }

    #[test]
    fn test_read_cow_borrows_input() {
        let input = [3, 4, 5];
        let mut buf = BorshBuffer::wrap(&input);
        buf.read_u8().unwrap();
        assert!(matches!(buf.read_cow(2).unwrap(), Cow::Borrowed([4, 5])));

        let mut owned = BorshBuffer::growable();
        owned.mark();
        owned.write_u16(0x0201).unwrap();
        owned.reset().unwrap();
        assert!(matches!(owned.read_cow(2).unwrap(), Cow::Owned(v) if v == [1, 2]));
    }

    #[test]
    fn test_wrap_write_keeps_input_intact() {
        let input = [0u8; 4];
        let mut buf = BorshBuffer::wrap(&input);
        buf.write_u16(0xABCD).unwrap();
        assert_eq!(buf.written(), [0xCD, 0xAB]);
        assert!(buf.write_u32(1).is_err());
        assert_eq!(input, [0; 4]);
    }
}
