//! src/decryptor/decipher.rs
//! Stateful CBC decipher with padding disabled: raw blocks in, raw blocks out

use aes::Block as AesBlock;

use crate::aliases::Block16;
use crate::consts::AES_BLOCK_SIZE;
use crate::crypto::cipher::{AesDecipher, CipherMode};
use crate::error::PartialDecryptError;
use crate::utils::xor_blocks;

/// CBC decryption context for one window.
///
/// Ciphertext must be written in absolute-offset order with no gaps. Whole
/// blocks are deciphered as soon as they are complete; at most 15 bytes of a
/// partial block are held back between writes.
pub struct BlockDecipher {
    cipher: AesDecipher,
    previous_block: Block16,
    partial_block: Block16,
    partial_len: usize,
    blocks_out: u64,
}

impl BlockDecipher {
    /// Key the context with `(mode, key, chaining_value)`.
    ///
    /// Fails with [`PartialDecryptError::Crypto`] when the key length does not fit `mode`.
    pub fn new(
        mode: CipherMode,
        key: &[u8],
        chaining_value: Block16,
    ) -> Result<Self, PartialDecryptError> {
        Ok(Self {
            cipher: AesDecipher::new(mode, key)?,
            previous_block: chaining_value,
            partial_block: Block16::new([0u8; AES_BLOCK_SIZE]),
            partial_len: 0,
            blocks_out: 0,
        })
    }

    /// Decipher every block completed by `ciphertext`, appending plaintext to `output`.
    pub fn update(&mut self, mut ciphertext: &[u8], output: &mut Vec<u8>) {
        if self.partial_len > 0 {
            let take = ciphertext.len().min(AES_BLOCK_SIZE - self.partial_len);
            self.partial_block.expose_secret_mut()[self.partial_len..self.partial_len + take]
                .copy_from_slice(&ciphertext[..take]);
            self.partial_len += take;
            ciphertext = &ciphertext[take..];

            if self.partial_len < AES_BLOCK_SIZE {
                return;
            }

            let block = *self.partial_block.expose_secret();
            self.decipher_block(&block, output);
            self.partial_len = 0;
        }

        let mut blocks = ciphertext.chunks_exact(AES_BLOCK_SIZE);
        output.reserve(ciphertext.len() - blocks.remainder().len());
        for block in &mut blocks {
            self.decipher_block(block, output);
        }

        let tail = blocks.remainder();
        self.partial_block.expose_secret_mut()[..tail.len()].copy_from_slice(tail);
        self.partial_len = tail.len();
    }

    /// Bytes of an incomplete trailing block still held back.
    #[inline(always)]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.partial_len
    }

    /// Number of whole blocks deciphered so far.
    #[inline(always)]
    #[must_use]
    pub fn blocks_out(&self) -> u64 {
        self.blocks_out
    }

    #[inline(always)]
    fn decipher_block(&mut self, ciphertext: &[u8], output: &mut Vec<u8>) {
        let mut aes_block = AesBlock::clone_from_slice(ciphertext);
        self.cipher.decrypt_block(&mut aes_block);

        let mut plaintext = [0u8; AES_BLOCK_SIZE];
        xor_blocks(
            aes_block.as_slice(),
            self.previous_block.expose_secret(),
            &mut plaintext,
        );

        self.previous_block
            .expose_secret_mut()
            .copy_from_slice(ciphertext);
        self.blocks_out += 1;
        output.extend_from_slice(&plaintext);
    }
}
