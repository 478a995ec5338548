//! # Constants
//!
//! Block geometry, buffer sizing and KDF bounds shared by the planner, the
//! decipher driver and the configuration builder.

/// AES block size in bytes. All windowing arithmetic is done in units of this.
pub const AES_BLOCK_SIZE: usize = 16;

/// [`AES_BLOCK_SIZE`] as a `u64`, for offset arithmetic.
pub const AES_BLOCK_SIZE_U64: u64 = AES_BLOCK_SIZE as u64;

/// Default size of a single read from the ciphertext source.
///
/// This also bounds how much plaintext is buffered ahead of the consumer.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Largest accepted read buffer (16 MiB). The buffer is allocated up front.
pub const MAX_READ_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// MD5 digest length, the unit in which `EVP_BytesToKey` produces material.
pub const EVP_MD5_DIGEST_LEN: usize = 16;

/// Minimum allowed PBKDF2 iteration count.
pub const PBKDF2_MIN_ITER: u32 = 1;

/// Maximum allowed PBKDF2 iteration count (5 million).
pub const PBKDF2_MAX_ITER: u32 = 5_000_000;

/// Iteration count used by [`KeyDerivation::pbkdf2_default`](crate::KeyDerivation::pbkdf2_default).
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 300_000;
