//! # Secure-Gate Type Aliases
//!
//! Secret-bearing buffers used throughout the crate. Every type here wraps its
//! contents in [`secure-gate`](https://github.com/Slurp9187/secure-gate) so key,
//! IV and chaining material is zeroized on drop and only reachable through an
//! explicit `.expose_secret()` / `.expose_secret_mut()`.
//!
//! ## Type Categories
//!
//! ### HMAC Primitives
//! - [`HmacSha512`] - PRF for PBKDF2 key derivation
//!
//! ### Fixed-Size Buffers
//! - [`Block16`] - one AES block (chaining value, partial ciphertext block)
//! - [`Salt16`] - PBKDF2 salt
//!
//! ### Dynamic Secrets
//! - [`SecretBytes`] - key or IV bytes whose length depends on the cipher mode
//! - [`PasswordString`] - passphrase handed to the KDF

use hmac::Hmac;
use sha2::Sha512;

pub type HmacSha512 = Hmac<Sha512>;

// ─────────────────────────────────────────────────────────────────────────────
// SpanBuffer: generic secure stack buffer
// ─────────────────────────────────────────────────────────────────────────────
pub type SpanBuffer<const N: usize> = secure_gate::Fixed<[u8; N]>;

pub type Block16 = SpanBuffer<16>; // one AES block
pub type Salt16 = SpanBuffer<16>; // PBKDF2 salt

// ─────────────────────────────────────────────────────────────────────────────
// Dynamic secrets
// ─────────────────────────────────────────────────────────────────────────────
pub type SecretBytes = secure_gate::Dynamic<Vec<u8>>;
pub type PasswordString = secure_gate::Dynamic<String>;
