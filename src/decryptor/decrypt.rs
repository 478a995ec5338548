//! src/decryptor/decrypt.rs
//! One-shot range decryption into a writer

use std::io::Write;

use crate::builders::RangeDecryptorBuilder;
use crate::decryptor::source::CiphertextSource;
use crate::error::PartialDecryptError;

/// Decrypt the range configured in `builder` from `source` into `output`.
///
/// Returns the number of plaintext bytes written, exactly the requested range
/// length when `end` is set.
#[inline(always)]
pub fn decrypt_range<S, W>(
    builder: RangeDecryptorBuilder,
    source: S,
    mut output: W,
) -> Result<u64, PartialDecryptError>
where
    S: CiphertextSource,
    W: Write,
{
    let mut decryptor = builder.build(source)?;
    let written = decryptor.copy_to(&mut output)?;
    output.flush().map_err(PartialDecryptError::Sink)?;
    Ok(written)
}
