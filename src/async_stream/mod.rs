//! Async range decryption.
//!
//! Uses `futures-io::AsyncRead` for the ciphertext side, so it works with
//! tokio (through `tokio_util::compat`), async-std, smol and friends.
//!
//! - [`AsyncCiphertextSource`] - opens an async reader for a window
//! - [`AsyncRangeDecryptor`] - `Stream` of plaintext chunks
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{AsyncCiphertextSource, AsyncRangeDecryptor};
