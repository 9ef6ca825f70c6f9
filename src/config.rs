//! Decoder configuration.

use crate::error::{Error, Result};

/// Default upper bound on a decoded sequence or map count: 16 Mi elements.
pub const DEFAULT_MAX_SEQUENCE_LEN: u32 = 16 * 1024 * 1024;

/// Default limit on how deeply optionals, sequences, maps, aggregates and
/// enums may nest in decoded input.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How a decoder treats the presence byte of an optional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceMode {
    /// Zero is absent, any other byte is present.
    #[default]
    Permissive,
    /// Only `0` and `1` are accepted; anything else is `InvalidEncoding`.
    Strict,
}

/// Configuration for decoding.
#[derive(Debug, Clone)]
pub struct Config {
    /// Presence byte handling for `Option<T>`. Default: permissive.
    pub presence: PresenceMode,
    /// Largest element count accepted for a sequence or map. Default: 16 Mi.
    pub max_sequence_len: u32,
    /// Deepest nesting accepted while decoding. Default: 128.
    pub max_depth: usize,
}

impl Config {
    /// A configuration that rejects presence bytes other than `0` or `1`.
    pub fn strict() -> Self {
        Self {
            presence: PresenceMode::Strict,
            ..Self::default()
        }
    }

    /// Replace the sequence count bound.
    pub fn with_max_sequence_len(mut self, max: u32) -> Self {
        self.max_sequence_len = max;
        self
    }

    /// Replace the nesting bound.
    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Fail with `InvalidEncoding` once `depth` passes `max_depth`.
    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            tracing::debug!(depth, max = self.max_depth, "nesting too deep");
            return Err(Error::InvalidEncoding(format!(
                "nesting depth exceeds maximum {}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presence: PresenceMode::Permissive,
            max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
