// src/lib.rs

//! Decrypt an arbitrary byte range of AES-CBC ciphertext.
//!
//! Only the block-aligned ciphertext window covering the range (plus one
//! preceding block for the chaining value) is requested from the source, and
//! only the requested plaintext bytes are produced.
//!
//! ```ignore
//! use partial_decrypt_rs::{CipherMode, RangeDecryptorBuilder, SeekableSource};
//! use std::fs::File;
//! use std::io::Read;
//!
//! let mut plaintext = Vec::new();
//! RangeDecryptorBuilder::new()
//!     .with_mode(CipherMode::Aes256Cbc)
//!     .with_password("test")
//!     .with_range(85, Some(131))
//!     .build(SeekableSource::new(File::open("data.enc")?))?
//!     .read_to_end(&mut plaintext)?;
//! ```

#![forbid(unsafe_code)]

pub mod aliases;
#[cfg(feature = "async-io")]
pub mod async_stream;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod crypto;
pub mod decryptor;
pub mod error;
pub mod password;
pub mod utils;

// High-level API
pub use builders::RangeDecryptorBuilder;
pub use crypto::cipher::CipherMode;
pub use crypto::kdf::{DerivedKey, KeyDerivation};
pub use decryptor::{
    decrypt_range, ByteRange, CipherWindow, CiphertextSource, Phase, PlaintextChunks,
    RangeDecryptor, SeekableSource,
};
pub use error::PartialDecryptError;
pub use password::Password;

// KDFs at the root for callers deriving material themselves
pub use crypto::kdf::evp::evp_bytes_to_key;
pub use crypto::kdf::pbkdf2::derive_secure_pbkdf2_key;

#[cfg(feature = "async-io")]
pub use async_stream::{AsyncCiphertextSource, AsyncRangeDecryptor};

#[cfg(feature = "batch-ops")]
pub use batch_ops::decrypt_batch;
