//! tests/common.rs
//! Shared fixtures: CBC ciphertext, ranged sources and instrumented readers

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use partial_decrypt_rs::{evp_bytes_to_key, CipherMode, CipherWindow};
use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Passphrase used by the scenario tests.
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "test";

/// Deterministic alphanumeric text, standing in for random strings.
#[allow(dead_code)]
pub fn text(len: usize, seed: u64) -> Vec<u8> {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ALPHABET[(state >> 33) as usize % ALPHABET.len()]
        })
        .collect()
}

/// CBC + PKCS#7 under an explicit key/IV.
#[allow(dead_code)]
pub fn encrypt_with_key(mode: CipherMode, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Vec<u8> {
    match mode {
        CipherMode::Aes128Cbc => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        CipherMode::Aes192Cbc => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        CipherMode::Aes256Cbc => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    }
}

/// Passphrase encryption compatible with `openssl enc -nosalt -md md5`.
#[allow(dead_code)]
pub fn encrypt(mode: CipherMode, password: &str, plaintext: &[u8]) -> Vec<u8> {
    let (key, iv) = evp_bytes_to_key(password.as_bytes(), None, mode.key_len(), 16).unwrap();
    encrypt_with_key(mode, key.expose_secret(), iv.expose_secret(), plaintext)
}

/// Bytes of `window` clipped to the ciphertext, like an HTTP range request.
#[allow(dead_code)]
pub fn window_slice(ciphertext: &[u8], window: CipherWindow) -> Vec<u8> {
    let start = (window.start as usize).min(ciphertext.len());
    let end = window
        .end
        .map_or(ciphertext.len(), |e| (e as usize + 1).min(ciphertext.len()));
    ciphertext[start..end].to_vec()
}

/// Ranged-read source over an in-memory ciphertext.
#[allow(dead_code)]
pub fn slice_source(
    ciphertext: Vec<u8>,
) -> impl FnMut(CipherWindow) -> io::Result<Cursor<Vec<u8>>> {
    move |window: CipherWindow| Ok::<_, io::Error>(Cursor::new(window_slice(&ciphertext, window)))
}

/// Like [`slice_source`] but records every window it is asked for.
#[allow(dead_code)]
pub fn recording_source(
    ciphertext: Vec<u8>,
    log: Arc<Mutex<Vec<CipherWindow>>>,
) -> impl FnMut(CipherWindow) -> io::Result<Cursor<Vec<u8>>> {
    move |window: CipherWindow| {
        log.lock().unwrap().push(window);
        Ok::<_, io::Error>(Cursor::new(window_slice(&ciphertext, window)))
    }
}

/// Reader that reports how much was read and whether it was dropped.
#[allow(dead_code)]
pub struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    pub bytes_read: Arc<AtomicU64>,
    pub dropped: Arc<AtomicBool>,
    fail_after: Option<u64>,
}

#[allow(dead_code)]
impl TrackedReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(data),
            bytes_read: Arc::new(AtomicU64::new(0)),
            dropped: Arc::new(AtomicBool::new(false)),
            fail_after: None,
        }
    }

    /// Fail with `ConnectionReset` once `limit` bytes have been served.
    pub fn failing_after(mut self, limit: u64) -> Self {
        self.fail_after = Some(limit);
        self
    }
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let served = self.bytes_read.load(Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if served >= limit {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "peer went away",
                ));
            }
        }
        let n = self.inner.read(buf)?;
        self.bytes_read.fetch_add(n as u64, Ordering::SeqCst);
        Ok(n)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}
