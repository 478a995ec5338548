//! tests/kdf_tests.rs
//! Key derivation vectors and decryption under each derivation

mod common;

use common::{encrypt_with_key, slice_source, text};
use partial_decrypt_rs::aliases::Salt16;
use partial_decrypt_rs::{
    derive_secure_pbkdf2_key, evp_bytes_to_key, CipherMode, KeyDerivation, PartialDecryptError,
    RangeDecryptorBuilder,
};
use std::io::Read;

#[test]
fn evp_bytes_to_key_matches_openssl() {
    // openssl enc -aes-256-cbc -nosalt -md md5 -k test -P
    let (key, iv) = evp_bytes_to_key(b"test", None, 32, 16).unwrap();
    assert_eq!(
        hex::encode(&key.expose_secret()[..16]),
        "098f6bcd4621d373cade4e832627b4f6"
    );
    assert_eq!(key.expose_secret().len(), 32);
    assert_eq!(iv.expose_secret().len(), 16);

    // D2 = MD5(D1 || "test") fills the second half of the key
    let mut d2_input = hex::decode("098f6bcd4621d373cade4e832627b4f6").unwrap();
    d2_input.extend_from_slice(b"test");
    let (d2, _) = evp_bytes_to_key(&d2_input, None, 16, 0).unwrap();
    assert_eq!(&key.expose_secret()[16..], d2.expose_secret().as_slice());
}

#[test]
fn evp_prefix_is_stable_across_lengths() {
    let (k16, iv16) = evp_bytes_to_key(b"secret", None, 16, 16).unwrap();
    let (k32, _) = evp_bytes_to_key(b"secret", None, 32, 16).unwrap();
    assert_eq!(&k32.expose_secret()[..16], k16.expose_secret().as_slice());
    assert_eq!(&k32.expose_secret()[16..], iv16.expose_secret().as_slice());
}

#[test]
fn pbkdf2_expected_key() {
    let salt = Salt16::new([0x11; 16]);
    let mut out = [0u8; 48];
    derive_secure_pbkdf2_key(b"correct horse battery staple", &salt, 1, &mut out).unwrap();

    let expected = [
        142, 124, 235, 125, 184, 202, 68, 61, 255, 97, 150, 244, 189, 12, 170, 47, 125, 231, 198,
        156, 219, 100, 132, 2, 12, 34, 200, 165, 120, 169, 161, 207,
    ];
    assert_eq!(&out[..32], &expected, "PBKDF2 mismatch");
}

#[test]
fn pbkdf2_derivation_splits_key_then_iv() {
    let kdf = KeyDerivation::pbkdf2([0x11; 16], 1);
    let derived = kdf.derive(b"correct horse battery staple", 32, 16).unwrap();

    let mut raw = [0u8; 48];
    derive_secure_pbkdf2_key(
        b"correct horse battery staple",
        &Salt16::new([0x11; 16]),
        1,
        &mut raw,
    )
    .unwrap();
    assert_eq!(derived.key.expose_secret().as_slice(), &raw[..32]);
    assert_eq!(derived.iv.expose_secret().as_slice(), &raw[32..]);
}

#[test]
fn decrypt_with_pbkdf2_derivation() {
    let plaintext = text(150, 21);
    let kdf = KeyDerivation::pbkdf2([0x42; 16], 1000);
    let derived = kdf.derive(b"hunter2", 32, 16).unwrap();
    let ciphertext = encrypt_with_key(
        CipherMode::Aes256Cbc,
        derived.key.expose_secret(),
        derived.iv.expose_secret(),
        &plaintext,
    );

    for (start, end) in [(0u64, 149u64), (9, 40), (64, 130)] {
        let mut out = Vec::new();
        RangeDecryptorBuilder::new()
            .with_mode(CipherMode::Aes256Cbc)
            .with_password("hunter2")
            .with_key_derivation(KeyDerivation::pbkdf2([0x42; 16], 1000))
            .with_range(start, Some(end))
            .build(slice_source(ciphertext.clone()))
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, &plaintext[start as usize..=end as usize]);
    }
}

#[test]
fn wrong_passphrase_yields_other_bytes() {
    let plaintext = text(64, 22);
    let ciphertext = common::encrypt(CipherMode::Aes256Cbc, "test", &plaintext);

    let mut out = Vec::new();
    RangeDecryptorBuilder::new()
        .with_mode(CipherMode::Aes256Cbc)
        .with_password("tset")
        .with_range(0, Some(31))
        .build(slice_source(ciphertext))
        .unwrap()
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out.len(), 32);
    assert_ne!(out, &plaintext[..32]);
}

#[test]
fn key_length_in_bits_must_match_mode() {
    let ok = RangeDecryptorBuilder::new()
        .with_mode(CipherMode::Aes128Cbc)
        .with_key_length(128)
        .with_password("test")
        .build(slice_source(Vec::new()));
    assert!(ok.is_ok());

    let err = RangeDecryptorBuilder::new()
        .with_mode(CipherMode::Aes128Cbc)
        .with_key_length(256)
        .with_password("test")
        .build(slice_source(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, PartialDecryptError::Crypto(_)));
}
