//! src/decryptor/chain.rs
//! Chaining-value recovery from the first ciphertext block of the window

use crate::aliases::Block16;
use crate::consts::AES_BLOCK_SIZE;

/// Collects the leading block of the fetched window, which may arrive split
/// across any number of source reads.
pub struct ChainResolver {
    buffer: Block16,
    filled: usize,
}

/// Outcome of feeding a chunk to the resolver.
pub enum Absorbed<'a> {
    /// Fewer than 16 bytes seen so far; nothing may be forwarded yet.
    Pending(ChainResolver),
    /// The chaining value is complete. `remainder` is the rest of the chunk,
    /// the first ciphertext bytes for the decipher.
    Complete {
        chaining_value: Block16,
        remainder: &'a [u8],
    },
}

impl ChainResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Block16::new([0u8; AES_BLOCK_SIZE]),
            filled: 0,
        }
    }

    /// Bytes of the chaining value collected so far.
    #[inline(always)]
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Take as many bytes of `chunk` as the block still needs.
    ///
    /// Consumes the resolver: once complete the buffer is moved out as the
    /// chaining value, otherwise the resolver is handed back.
    pub fn absorb(mut self, chunk: &[u8]) -> Absorbed<'_> {
        let take = chunk.len().min(AES_BLOCK_SIZE - self.filled);
        self.buffer.expose_secret_mut()[self.filled..self.filled + take]
            .copy_from_slice(&chunk[..take]);
        self.filled += take;

        if self.filled < AES_BLOCK_SIZE {
            return Absorbed::Pending(self);
        }

        Absorbed::Complete {
            chaining_value: self.buffer,
            remainder: &chunk[take..],
        }
    }
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self::new()
    }
}
