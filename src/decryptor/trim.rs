//! src/decryptor/trim.rs
//! Cuts deciphered blocks back down to the requested byte range

use crate::decryptor::window::{Budget, TrimPlan};

/// Running skip/budget counters over the deciphered stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTrimmer {
    skip: u64,
    budget: Budget,
}

impl OutputTrimmer {
    #[must_use]
    pub const fn new(plan: TrimPlan) -> Self {
        Self {
            skip: plan.skip,
            budget: plan.budget,
        }
    }

    /// The slice of `chunk` the consumer is owed.
    ///
    /// Leading bytes are dropped until `skip` is used up, then the chunk is cut
    /// to the remaining budget. Returns an empty slice when nothing is owed.
    pub fn trim<'a>(&mut self, mut chunk: &'a [u8]) -> &'a [u8] {
        if self.skip > 0 {
            let skipped = clamp_len(chunk.len(), self.skip);
            chunk = &chunk[skipped..];
            self.skip -= skipped as u64;
            if chunk.is_empty() {
                return chunk;
            }
        }

        if let Budget::Bounded(left) = &mut self.budget {
            let keep = clamp_len(chunk.len(), *left);
            chunk = &chunk[..keep];
            *left -= keep as u64;
        }

        chunk
    }

    /// True once a bounded budget has been paid out in full.
    #[inline(always)]
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.budget.is_exhausted()
    }

    #[inline(always)]
    #[must_use]
    pub const fn budget(&self) -> Budget {
        self.budget
    }

    #[inline(always)]
    #[must_use]
    pub const fn skip_remaining(&self) -> u64 {
        self.skip
    }
}

/// `min(len, limit)` without truncating `limit` on 32-bit targets.
#[inline(always)]
fn clamp_len(len: usize, limit: u64) -> usize {
    usize::try_from(limit).map_or(len, |limit| len.min(limit))
}
