//! # Key Derivation Functions (KDF)
//!
//! Turning a passphrase into key and IV bytes is a replaceable collaborator of
//! the range decryptor. Two derivations are provided:
//!
//! - [`evp`] - OpenSSL `EVP_BytesToKey` (MD5, one iteration). The default, and
//!   what `openssl enc -md md5` / Node's legacy `createCipher` produce.
//! - [`pbkdf2`] - PBKDF2-HMAC-SHA512, for ciphertexts keyed with PBKDF2 output.
//!
//! Callers that hold raw key bytes never need either.

pub mod evp;
pub mod pbkdf2;

use std::fmt;

use crate::aliases::{Salt16, SecretBytes};
use crate::consts::{DEFAULT_PBKDF2_ITERATIONS, PBKDF2_MAX_ITER, PBKDF2_MIN_ITER};
use crate::error::PartialDecryptError;

/// Key and IV produced by a [`KeyDerivation`].
pub struct DerivedKey {
    pub key: SecretBytes,
    pub iv: SecretBytes,
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Which KDF turns the password into key/IV material.
#[derive(Default)]
pub enum KeyDerivation {
    /// Unsalted OpenSSL `EVP_BytesToKey` with MD5.
    #[default]
    EvpBytesToKey,
    /// PBKDF2-HMAC-SHA512; output is split as `key || iv`.
    Pbkdf2 { salt: Salt16, iterations: u32 },
}

impl KeyDerivation {
    /// PBKDF2 with the given salt and iteration count.
    #[must_use]
    pub fn pbkdf2(salt: [u8; 16], iterations: u32) -> Self {
        KeyDerivation::Pbkdf2 {
            salt: Salt16::new(salt),
            iterations,
        }
    }

    /// PBKDF2 with [`DEFAULT_PBKDF2_ITERATIONS`] rounds.
    #[must_use]
    pub fn pbkdf2_default(salt: [u8; 16]) -> Self {
        Self::pbkdf2(salt, DEFAULT_PBKDF2_ITERATIONS)
    }

    /// Reject parameters that can never derive a key.
    pub(crate) fn validate(&self) -> Result<(), PartialDecryptError> {
        match self {
            KeyDerivation::EvpBytesToKey => Ok(()),
            KeyDerivation::Pbkdf2 { iterations, .. } => {
                if (PBKDF2_MIN_ITER..=PBKDF2_MAX_ITER).contains(iterations) {
                    Ok(())
                } else {
                    Err(PartialDecryptError::Config(format!(
                        "invalid PBKDF2 iterations {iterations}"
                    )))
                }
            }
        }
    }

    /// Derive `key_len` key bytes and `iv_len` IV bytes from `password`.
    pub fn derive(
        &self,
        password: &[u8],
        key_len: usize,
        iv_len: usize,
    ) -> Result<DerivedKey, PartialDecryptError> {
        match self {
            KeyDerivation::EvpBytesToKey => {
                let (key, iv) = evp::evp_bytes_to_key(password, None, key_len, iv_len)?;
                Ok(DerivedKey { key, iv })
            }
            KeyDerivation::Pbkdf2 { salt, iterations } => {
                let mut material = vec![0u8; key_len + iv_len];
                pbkdf2::derive_secure_pbkdf2_key(password, salt, *iterations, &mut material)?;
                let iv = material.split_off(key_len);
                Ok(DerivedKey {
                    key: SecretBytes::new(material),
                    iv: SecretBytes::new(iv),
                })
            }
        }
    }
}

impl fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDerivation::EvpBytesToKey => f.write_str("EvpBytesToKey"),
            KeyDerivation::Pbkdf2 { iterations, .. } => f
                .debug_struct("Pbkdf2")
                .field("salt", &"[REDACTED]")
                .field("iterations", iterations)
                .finish(),
        }
    }
}
