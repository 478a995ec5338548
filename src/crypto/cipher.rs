//! src/crypto/cipher.rs
//! Cipher mode selection and the raw AES block decryptor behind it

use std::fmt;
use std::str::FromStr;

use aes::cipher::{BlockDecrypt, KeyInit};
use aes::{Aes128Dec, Aes192Dec, Aes256Dec, Block as AesBlock};

use crate::error::PartialDecryptError;

/// Cipher + block-mode identifier.
///
/// Only CBC over AES is supported: the windowing arithmetic assumes a 16-byte
/// block and CBC's one-block chaining dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
}

impl CipherMode {
    /// Key length in bytes expected by this mode.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            CipherMode::Aes128Cbc => 16,
            CipherMode::Aes192Cbc => 24,
            CipherMode::Aes256Cbc => 32,
        }
    }

    /// Key length in bits, the unit `EVP_BytesToKey` callers usually speak.
    #[must_use]
    pub const fn key_bits(self) -> u32 {
        (self.key_len() * 8) as u32
    }

    /// Canonical OpenSSL-style name, e.g. `aes-256-cbc`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CipherMode::Aes128Cbc => "aes-128-cbc",
            CipherMode::Aes192Cbc => "aes-192-cbc",
            CipherMode::Aes256Cbc => "aes-256-cbc",
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherMode {
    type Err = PartialDecryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-128-cbc" | "aes128" => Ok(CipherMode::Aes128Cbc),
            "aes-192-cbc" | "aes192" => Ok(CipherMode::Aes192Cbc),
            "aes-256-cbc" | "aes256" => Ok(CipherMode::Aes256Cbc),
            other => Err(PartialDecryptError::Config(format!(
                "unsupported cipher mode '{other}' (expected aes-128-cbc, aes-192-cbc or aes-256-cbc)"
            ))),
        }
    }
}

/// Keyed AES block decryptor for one of the supported key sizes.
pub(crate) enum AesDecipher {
    Aes128(Aes128Dec),
    Aes192(Aes192Dec),
    Aes256(Aes256Dec),
}

impl AesDecipher {
    /// Key the block cipher for `mode`; the key must be exactly `mode.key_len()` bytes.
    pub(crate) fn new(mode: CipherMode, key: &[u8]) -> Result<Self, PartialDecryptError> {
        if key.len() != mode.key_len() {
            return Err(PartialDecryptError::Crypto(format!(
                "invalid key length {} for {mode} (expected {})",
                key.len(),
                mode.key_len()
            )));
        }

        let invalid = |_| PartialDecryptError::Crypto(format!("{mode}: key rejected by cipher"));
        Ok(match mode {
            CipherMode::Aes128Cbc => AesDecipher::Aes128(Aes128Dec::new_from_slice(key).map_err(invalid)?),
            CipherMode::Aes192Cbc => AesDecipher::Aes192(Aes192Dec::new_from_slice(key).map_err(invalid)?),
            CipherMode::Aes256Cbc => AesDecipher::Aes256(Aes256Dec::new_from_slice(key).map_err(invalid)?),
        })
    }

    #[inline(always)]
    pub(crate) fn decrypt_block(&self, block: &mut AesBlock) {
        match self {
            AesDecipher::Aes128(cipher) => cipher.decrypt_block(block),
            AesDecipher::Aes192(cipher) => cipher.decrypt_block(block),
            AesDecipher::Aes256(cipher) => cipher.decrypt_block(block),
        }
    }
}
