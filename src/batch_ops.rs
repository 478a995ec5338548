//! src/batch_ops.rs
//! Independent range requests decrypted in parallel
//!
//! Each request owns its pipeline and source; nothing mutable is shared, so
//! the batch maps cleanly onto rayon's work-stealing pool.

use rayon::prelude::*;
use std::io::Write;

use crate::decryptor::{CiphertextSource, RangeDecryptor};
use crate::error::PartialDecryptError;

/// Drive every `(decryptor, output)` pair to completion in parallel.
///
/// Stops at the first error; requests still in flight are cancelled when
/// their decryptors are dropped by the caller.
pub fn decrypt_batch<S, W>(batch: &mut [(RangeDecryptor<S>, W)]) -> Result<(), PartialDecryptError>
where
    S: CiphertextSource + Send,
    S::Reader: Send,
    W: Write + Send,
{
    batch
        .par_iter_mut()
        .try_for_each(|(decryptor, dst)| decryptor.copy_to(dst).map(|_| ()))
}
