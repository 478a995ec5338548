//! tests/property_tests.rs
//! Any range, any chunking: output equals the plaintext slice

mod common;

use common::{encrypt, encrypt_with_key, slice_source, text, TEST_PASSWORD};
use partial_decrypt_rs::{CipherMode, Password, RangeDecryptorBuilder};
use proptest::prelude::*;
use std::io::Read;

fn range_strategy() -> impl Strategy<Value = (usize, u64, u64, usize)> {
    (1usize..300).prop_flat_map(|len| {
        (0..len as u64).prop_flat_map(move |start| {
            (
                Just(len),
                Just(start),
                start..len as u64,
                prop_oneof![1usize..48, Just(16usize), 48usize..1024],
            )
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn passphrase_range_matches_slice((len, start, end, chunk) in range_strategy(), seed in any::<u64>()) {
        let plaintext = text(len, seed);
        let ciphertext = encrypt(CipherMode::Aes256Cbc, TEST_PASSWORD, &plaintext);

        let mut out = Vec::new();
        RangeDecryptorBuilder::new()
            .with_mode(CipherMode::Aes256Cbc)
            .with_password(TEST_PASSWORD)
            .with_range(start, Some(end))
            .with_read_buffer_size(chunk)
            .build(slice_source(ciphertext))
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();

        prop_assert_eq!(out.as_slice(), &plaintext[start as usize..=end as usize]);
    }

    #[test]
    fn raw_key_range_matches_slice(
        (len, start, end, chunk) in range_strategy(),
        key in any::<[u8; 16]>(),
        iv in any::<[u8; 16]>(),
    ) {
        let plaintext = text(len, 7);
        let ciphertext = encrypt_with_key(CipherMode::Aes128Cbc, &key, &iv, &plaintext);

        let mut out = Vec::new();
        RangeDecryptorBuilder::new()
            .with_mode(CipherMode::Aes128Cbc)
            .with_password(Password::key(key))
            .with_iv(iv)
            .with_range(start, Some(end))
            .with_read_buffer_size(chunk)
            .build(slice_source(ciphertext))
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();

        prop_assert_eq!(out.as_slice(), &plaintext[start as usize..=end as usize]);
    }
}
