//! src/crypto/kdf/evp.rs
//! OpenSSL `EVP_BytesToKey` with MD5 and a single iteration

use md5::{Digest, Md5};

use crate::aliases::SecretBytes;
use crate::consts::EVP_MD5_DIGEST_LEN;
use crate::error::PartialDecryptError;

/// Derive `key_len` key bytes and `iv_len` IV bytes from a password.
///
/// `D_1 = MD5(password || salt)`, `D_i = MD5(D_{i-1} || password || salt)`;
/// the concatenated digests are split into key then IV. With no salt this is
/// the derivation behind OpenSSL `enc -nosalt -md md5` and Node's legacy
/// `crypto.createCipher`.
pub fn evp_bytes_to_key(
    password: &[u8],
    salt: Option<&[u8; 8]>,
    key_len: usize,
    iv_len: usize,
) -> Result<(SecretBytes, SecretBytes), PartialDecryptError> {
    if key_len == 0 {
        return Err(PartialDecryptError::Crypto(
            "EVP_BytesToKey: key length must be non-zero".into(),
        ));
    }

    let total = key_len + iv_len;
    let mut material = Vec::with_capacity(total.div_ceil(EVP_MD5_DIGEST_LEN) * EVP_MD5_DIGEST_LEN);
    let mut hasher = Md5::new();

    while material.len() < total {
        if !material.is_empty() {
            hasher.update(&material[material.len() - EVP_MD5_DIGEST_LEN..]);
        }
        hasher.update(password);
        if let Some(salt) = salt {
            hasher.update(salt);
        }
        material.extend_from_slice(&hasher.finalize_reset());
    }

    let iv = material[key_len..total].to_vec();
    material.truncate(key_len);

    Ok((SecretBytes::new(material), SecretBytes::new(iv)))
}
