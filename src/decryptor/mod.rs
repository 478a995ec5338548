// src/decryptor/mod.rs

//! Range decryption facade.
//!
//! Core API: `decrypt_range(builder, source, output)?`, or
//! [`RangeDecryptor`] for pull-based [`Read`](std::io::Read) access.
//!
//! Internals, in data-flow order:
//! [`window`] plans the ciphertext window, [`chain`] recovers the chaining
//! value, [`decipher`] runs CBC, [`trim`] cuts the output to the range.

pub mod chain;
pub(crate) mod decipher;
pub(crate) mod decrypt;
pub(crate) mod pipeline;
pub(crate) mod read;
pub(crate) mod source;
pub mod trim;
pub mod window;

pub use decipher::BlockDecipher;
pub use decrypt::decrypt_range;
pub use pipeline::Phase;
pub use read::{PlaintextChunks, RangeDecryptor};
pub use source::{CiphertextSource, SeekableSource};
pub use trim::OutputTrimmer;
pub use window::{Budget, ByteRange, CipherWindow, TrimPlan, WindowPlan};
