//! # Error Types
//!
//! Every fallible operation returns [`Result<T, PartialDecryptError>`](PartialDecryptError).
//! Errors are surfaced exactly once per request; afterwards the decryptor is
//! terminated and yields no further plaintext.

use std::io;

use thiserror::Error;

use crate::decryptor::CipherWindow;

/// The error type for all range decryption operations.
#[derive(Error, Debug)]
pub enum PartialDecryptError {
    /// Invalid or missing construction parameter.
    ///
    /// Detected synchronously while building a decryptor, before any I/O:
    /// - missing or empty password
    /// - missing or unknown cipher mode
    /// - `end < start`
    /// - key length not a positive multiple of 8 bits
    /// - PBKDF2 iteration count out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// The ciphertext source failed to open or to read.
    #[error("Source error: {0}")]
    Source(#[from] io::Error),

    /// The ciphertext source closed before the window was satisfied.
    #[error("Source ended after {received} bytes of ciphertext window {window}")]
    Truncated { window: CipherWindow, received: u64 },

    /// Writing plaintext to the caller's output failed.
    #[error("Output error: {0}")]
    Sink(#[source] io::Error),

    /// Cryptographic failure: key/IV length does not fit the mode, or the KDF failed.
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<PartialDecryptError> for io::Error {
    fn from(err: PartialDecryptError) -> Self {
        match err {
            PartialDecryptError::Source(inner) | PartialDecryptError::Sink(inner) => inner,
            PartialDecryptError::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            PartialDecryptError::Truncated { .. } => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
            PartialDecryptError::Crypto(_) => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}
