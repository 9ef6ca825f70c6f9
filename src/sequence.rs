//! Variable-length homogeneous sequences: u32 element count, then each
//! element's encoding in order.
//!
//! Counts are checked before anything is allocated. A count above
//! [`Config::max_sequence_len`], or one that cannot fit in the remaining
//! input given the element type's minimum encoded size, is rejected with
//! [`Error::InvalidEncoding`].

use crate::buffer::BorshBuffer;
use crate::config::Config;
use crate::error::{Error, Result};

/// Upper bound on the bytes reserved up front for a decoded sequence.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// Elements to reserve for a sequence of `count` elements of `T` read from
/// `remaining` input bytes.
fn prealloc_len<T>(count: usize, remaining: usize) -> usize {
    let per_element = std::mem::size_of::<T>().max(1);
    count.min(remaining).min(MAX_PREALLOC_BYTES / per_element)
}

impl BorshBuffer<'_> {
    /// Read a sequence count and check it against `config` and the bytes
    /// left in the buffer. `min_element_len` is the fewest bytes a single
    /// element can occupy; pass `0` when unknown.
    pub fn read_sequence_len(&mut self, config: &Config, min_element_len: usize) -> Result<usize> {
        let count = self.read_u32()?;
        if count > config.max_sequence_len {
            tracing::debug!(count, max = config.max_sequence_len, "sequence count over limit");
            return Err(Error::InvalidEncoding(format!(
                "sequence length {} exceeds maximum {}",
                count, config.max_sequence_len
            )));
        }
        let count = count as usize;
        let needed = count.saturating_mul(min_element_len);
        if needed > self.remaining() {
            tracing::debug!(count, needed, remaining = self.remaining(), "sequence count exceeds input");
            return Err(Error::InvalidEncoding(format!(
                "sequence of {} elements needs at least {} bytes, {} remaining",
                count,
                needed,
                self.remaining()
            )));
        }
        Ok(count)
    }

    /// Count prefix, then every item through `write`.
    pub fn write_sequence<I, F>(&mut self, items: I, mut write: F) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(&mut Self, I::Item) -> Result<()>,
    {
        let items = items.into_iter();
        self.write_len(items.len())?;
        for item in items {
            write(&mut *self, item)?;
        }
        Ok(self)
    }

    /// Count prefix, then exactly that many items through `read`, in wire
    /// order.
    pub fn read_sequence<T, F>(
        &mut self,
        config: &Config,
        min_element_len: usize,
        mut read: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.read_sequence_len(config, min_element_len)?;
        let mut out = Vec::with_capacity(prealloc_len::<T>(count, self.remaining()));
        for _ in 0..count {
            out.push(read(&mut *self)?);
        }
        Ok(out)
    }
}
