// src/crypto/mod.rs

//! Low-level crypto primitives: the AES block decipher and the KDFs.
//!
//! The public KDF entry points are re-exported at the crate root.

pub mod cipher;
pub mod kdf;
