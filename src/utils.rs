//! Utility functions used across the library.

/// XORs two 16-byte blocks and writes the result to `output`.
///
/// Used by the CBC decipher to undo the chaining step:
/// `plaintext = D(ciphertext) ^ previous_ciphertext`.
///
/// # Panics (by contract)
///
/// Panics if any of the three slices is shorter than 16 bytes. Callers only
/// pass [`Block16`](crate::aliases::Block16) contents or `aes::Block` slices.
#[inline(always)]
pub const fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < 16 {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}

/// Rounds `offset` down to the first byte of its block.
#[inline(always)]
pub const fn block_floor(offset: u64, block_size: u64) -> u64 {
    offset - (offset % block_size)
}

/// Rounds `offset` up to the last byte of its block.
#[inline(always)]
pub const fn block_last_byte(offset: u64, block_size: u64) -> u64 {
    if offset % block_size == block_size - 1 {
        offset
    } else {
        (offset / block_size) * block_size + block_size - 1
    }
}
