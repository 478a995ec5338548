//! # Builders
//!
//! Fluent configuration for range decryption.
//!
//! - [`range_builder`] - [`RangeDecryptorBuilder`]: mode, password, range, KDF
//!
//! All validation happens in `build`, synchronously and before the ciphertext
//! source is touched.

pub mod range_builder;

pub use range_builder::RangeDecryptorBuilder;
