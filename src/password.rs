//! src/password.rs
//! Raw key bytes or a passphrase, both wrapped from birth

use std::fmt;

use crate::aliases::{PasswordString, SecretBytes};

/// What the caller hands over to key the decipher.
///
/// - [`Password::Key`] is used verbatim as the AES key.
/// - [`Password::Passphrase`] goes through the configured
///   [`KeyDerivation`](crate::KeyDerivation) to produce key and IV.
pub enum Password {
    Key(SecretBytes),
    Passphrase(PasswordString),
}

impl Password {
    /// Raw AES key bytes.
    #[must_use]
    pub fn key(bytes: impl Into<Vec<u8>>) -> Self {
        Password::Key(SecretBytes::new(bytes.into()))
    }

    /// Passphrase to feed the KDF.
    #[must_use]
    pub fn passphrase(phrase: impl Into<String>) -> Self {
        Password::Passphrase(PasswordString::new(phrase.into()))
    }

    /// Bytes presented to the KDF.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Password::Key(bytes) => bytes.expose_secret().as_slice(),
            Password::Passphrase(phrase) => phrase.expose_secret().as_bytes(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<&str> for Password {
    fn from(phrase: &str) -> Self {
        Password::passphrase(phrase)
    }
}

impl From<String> for Password {
    fn from(phrase: String) -> Self {
        Password::passphrase(phrase)
    }
}

impl From<Vec<u8>> for Password {
    fn from(bytes: Vec<u8>) -> Self {
        Password::key(bytes)
    }
}

impl From<&[u8]> for Password {
    fn from(bytes: &[u8]) -> Self {
        Password::key(bytes)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Password::Key(_) => f.write_str("Password::Key([REDACTED])"),
            Password::Passphrase(_) => f.write_str("Password::Passphrase([REDACTED])"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_right_variant() {
        assert!(matches!(Password::from("test"), Password::Passphrase(_)));
        assert!(matches!(Password::from(vec![1u8; 32]), Password::Key(_)));
        assert_eq!(Password::from("test").as_bytes(), b"test");
    }

    #[test]
    fn empty_detection() {
        assert!(Password::passphrase("").is_empty());
        assert!(Password::key(Vec::new()).is_empty());
        assert!(!Password::key([0u8; 16]).is_empty());
    }

    #[test]
    fn debug_is_redacted() {
        let rendered = format!("{:?}", Password::passphrase("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
