//! src/crypto/kdf/pbkdf2.rs

use pbkdf2::pbkdf2;

use crate::aliases::{HmacSha512, Salt16};
use crate::consts::{PBKDF2_MAX_ITER, PBKDF2_MIN_ITER};
use crate::error::PartialDecryptError;

/// Derive PBKDF2-HMAC-SHA512 directly into the caller's buffer.
///
/// The whole of `out` is filled; range decryption asks for key and IV in one
/// pass and splits the result.
#[inline(always)]
pub fn derive_secure_pbkdf2_key(
    password: &[u8],
    salt: &Salt16,
    iterations: u32,
    out: &mut [u8],
) -> Result<(), PartialDecryptError> {
    if !(PBKDF2_MIN_ITER..=PBKDF2_MAX_ITER).contains(&iterations) {
        return Err(PartialDecryptError::Crypto(format!(
            "PBKDF2 iterations must be within {PBKDF2_MIN_ITER}..={PBKDF2_MAX_ITER}, got {iterations}"
        )));
    }

    pbkdf2::<HmacSha512>(password, salt.expose_secret(), iterations, out)
        .map_err(|e| PartialDecryptError::Crypto(format!("PBKDF2 failed: {e}")))?;
    Ok(())
}
