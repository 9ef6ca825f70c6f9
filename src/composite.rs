//! Optional values and fixed-size byte arrays.
//!
//! ```text
//! optional:     +----------+-----------------+
//!               | presence | T (iff present) |
//!               +----------+-----------------+
//! fixed array:  +--------+--------+...+----------+
//!               | byte 0 | byte 1 |...| byte N-1 |   (no length prefix)
//!               +--------+--------+...+----------+
//! ```

use crate::buffer::BorshBuffer;
use crate::config::PresenceMode;
use crate::error::{Error, Result};

/// Validate a fixed-array length coming from an untyped schema description.
pub fn fixed_array_len(n: i64) -> Result<usize> {
    usize::try_from(n)
        .map_err(|_| Error::InvalidArgument(format!("fixed array length {} is negative", n)))
}

impl BorshBuffer<'_> {
    /// Write `1` for present, `0` for absent.
    pub fn write_presence(&mut self, present: bool) -> Result<&mut Self> {
        self.write_u8(present as u8)
    }

    /// Read a presence byte. Permissive mode treats any nonzero byte as
    /// present; strict mode only accepts `0` and `1`.
    pub fn read_presence(&mut self, mode: PresenceMode) -> Result<bool> {
        match (self.read_u8()?, mode) {
            (0, _) => Ok(false),
            (1, _) | (_, PresenceMode::Permissive) => Ok(true),
            (v, PresenceMode::Strict) => {
                tracing::debug!(presence = v, "rejecting presence byte in strict mode");
                Err(Error::InvalidEncoding(format!(
                    "invalid optional presence byte: {} (must be 0 or 1)",
                    v
                )))
            }
        }
    }

    /// Presence byte, then the payload via `write` iff present.
    pub fn write_optional<T, F>(&mut self, value: Option<T>, write: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self, T) -> Result<()>,
    {
        match value {
            None => self.write_presence(false),
            Some(v) => {
                self.write_presence(true)?;
                write(&mut *self, v)?;
                Ok(self)
            }
        }
    }

    /// Presence byte, then one payload via `read` iff present.
    pub fn read_optional<T, F>(&mut self, mode: PresenceMode, read: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.read_presence(mode)? {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// The raw bytes, no length prefix.
    pub fn write_fixed_array(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.write_bytes(bytes)
    }

    /// Exactly `len` raw bytes; the length comes from the static type.
    pub fn read_fixed_array(&mut self, len: usize) -> Result<&[u8]> {
        self.read_bytes(len)
    }
}
