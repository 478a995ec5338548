//! src/decryptor/window.rs
//! Window planning: plaintext byte range → block-aligned ciphertext window + trim plan
//!
//! CBC decryption of block `i` needs ciphertext blocks `i - 1` and `i`, so the
//! fetched window starts one block before the first requested block. When the
//! request begins inside block 0 there is no preceding ciphertext block and the
//! external IV takes its place.

use std::fmt;

use crate::consts::AES_BLOCK_SIZE_U64;
use crate::error::PartialDecryptError;
use crate::utils::{block_floor, block_last_byte};

/// Requested plaintext range; both ends inclusive, `end = None` means "to the end".
///
/// Only built through [`ByteRange::new`] or [`ByteRange::from_start`], so
/// `end >= start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteRange {
    start: u64,
    end: Option<u64>,
}

impl ByteRange {
    /// Validated range; `end` must not precede `start`.
    pub fn new(start: u64, end: Option<u64>) -> Result<Self, PartialDecryptError> {
        if let Some(end) = end {
            if end < start {
                return Err(PartialDecryptError::Config(format!(
                    "range end {end} precedes start {start}"
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Everything from `start` to the end of the resource.
    #[must_use]
    pub const fn from_start(start: u64) -> Self {
        Self { start, end: None }
    }

    #[inline(always)]
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[inline(always)]
    #[must_use]
    pub const fn end(&self) -> Option<u64> {
        self.end
    }

    /// Number of plaintext bytes requested, `None` when unbounded or when the
    /// count does not fit in a `u64`.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.end
            .and_then(|end| end.checked_sub(self.start))
            .and_then(|span| span.checked_add(1))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {end}]", self.start),
            None => write!(f, "[{}, ..)", self.start),
        }
    }
}

/// Block-aligned absolute ciphertext range handed to the source.
///
/// `start` is always a block boundary; `end`, when present, is the last byte
/// of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherWindow {
    pub start: u64,
    pub end: Option<u64>,
}

impl CipherWindow {
    /// Number of ciphertext bytes in the window, `None` when unbounded.
    ///
    /// A window whose `end` precedes `start` is empty.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        let end = self.end?;
        match end.checked_sub(self.start) {
            Some(span) => span.checked_add(1),
            None => Some(0),
        }
    }

    /// Whether the window is bounded and contains nothing. Never true for a planned window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl fmt::Display for CipherWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {end}]", self.start),
            None => write!(f, "[{}, ..)", self.start),
        }
    }
}

/// Plaintext bytes still owed to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Budget {
    Bounded(u64),
    Unbounded,
}

impl Budget {
    #[inline(always)]
    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Budget::Bounded(0))
    }
}

/// How much decrypted output to drop up front and how much to keep after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrimPlan {
    /// Leading bytes of deciphered output to discard (`start % 16`).
    pub skip: u64,
    pub budget: Budget,
}

/// Everything derived from a [`ByteRange`] once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowPlan {
    pub range: ByteRange,
    pub window: CipherWindow,
    pub trim: TrimPlan,
    /// The chaining value is the first ciphertext block of the window rather
    /// than the external IV.
    pub chain_from_ciphertext: bool,
}

impl WindowPlan {
    #[must_use]
    pub fn new(range: ByteRange) -> Self {
        let start = range.start;
        let block = AES_BLOCK_SIZE_U64;

        let window = CipherWindow {
            start: block_floor(start, block).saturating_sub(block),
            end: range.end.map(|end| block_last_byte(end, block)),
        };

        let trim = TrimPlan {
            skip: start % block,
            budget: match range.len() {
                Some(len) => Budget::Bounded(len),
                None => Budget::Unbounded,
            },
        };

        Self {
            range,
            window,
            trim,
            chain_from_ciphertext: start >= block,
        }
    }
}
