//! src/builders/range_builder.rs
//! Range decryptor builder; every option is validated before any I/O

use tracing::debug;

use crate::aliases::SecretBytes;
use crate::consts::{AES_BLOCK_SIZE, DEFAULT_READ_BUFFER_SIZE, MAX_READ_BUFFER_SIZE};
use crate::crypto::cipher::CipherMode;
use crate::crypto::kdf::KeyDerivation;
use crate::decryptor::pipeline::RangePipeline;
use crate::decryptor::{ByteRange, CiphertextSource, RangeDecryptor, WindowPlan};
use crate::error::PartialDecryptError;
use crate::password::Password;

/// Configuration for decrypting one plaintext byte range.
///
/// Defaults: range `[0, ..)`, [`KeyDerivation::EvpBytesToKey`], 8 KiB source reads.
/// `mode` and `password` are required.
///
/// ```ignore
/// let mut plaintext = RangeDecryptorBuilder::new()
///     .with_mode(CipherMode::Aes256Cbc)
///     .with_password("test")
///     .with_range(85, Some(131))
///     .build(source)?;
/// ```
pub struct RangeDecryptorBuilder {
    mode: Option<Result<CipherMode, PartialDecryptError>>,
    password: Option<Password>,
    key_length: Option<u32>,
    iv: Option<SecretBytes>,
    start: u64,
    end: Option<u64>,
    key_derivation: KeyDerivation,
    read_buffer_size: usize,
}

/// Everything a decryptor needs besides its source.
pub(crate) struct PreparedRange {
    pub(crate) plan: WindowPlan,
    pub(crate) pipeline: RangePipeline,
    pub(crate) read_buffer_size: usize,
}

impl RangeDecryptorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: None,
            password: None,
            key_length: None,
            iv: None,
            start: 0,
            end: None,
            key_derivation: KeyDerivation::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CipherMode) -> Self {
        self.mode = Some(Ok(mode));
        self
    }

    /// Mode by OpenSSL-style name (`"aes-256-cbc"`); unknown names fail at build.
    #[must_use]
    pub fn with_mode_name(mut self, name: &str) -> Self {
        self.mode = Some(name.parse());
        self
    }

    /// Raw key bytes ([`Password::key`]) or a passphrase (`&str`, `String`).
    #[must_use]
    pub fn with_password(mut self, password: impl Into<Password>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Key length in bits for passphrase derivation. Defaults to the mode's key size.
    ///
    /// Ignored for raw keys unless the IV has to be derived (start inside the
    /// first block and no [`with_iv`](Self::with_iv)).
    #[must_use]
    pub fn with_key_length(mut self, bits: u32) -> Self {
        self.key_length = Some(bits);
        self
    }

    /// Explicit IV. Only consulted when the range starts inside the first block.
    #[must_use]
    pub fn with_iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = Some(SecretBytes::new(iv.into()));
        self
    }

    /// First plaintext byte wanted (inclusive).
    #[must_use]
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Last plaintext byte wanted (inclusive).
    #[must_use]
    pub fn with_end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_range(mut self, start: u64, end: Option<u64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    #[must_use]
    pub fn with_key_derivation(mut self, key_derivation: KeyDerivation) -> Self {
        self.key_derivation = key_derivation;
        self
    }

    /// Size of each read from the source; also bounds buffered plaintext.
    ///
    /// Must be within `1..=`[`MAX_READ_BUFFER_SIZE`]; checked at build.
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Validate, derive keys and plan the window, then wrap `source`.
    ///
    /// No I/O happens here; the source is opened on the first read.
    pub fn build<S: CiphertextSource>(
        self,
        source: S,
    ) -> Result<RangeDecryptor<S>, PartialDecryptError> {
        let prepared = self.prepare()?;
        Ok(RangeDecryptor::new(
            source,
            prepared.plan,
            prepared.pipeline,
            prepared.read_buffer_size,
        ))
    }

    /// Async counterpart of [`build`](Self::build).
    #[cfg(feature = "async-io")]
    pub fn build_async<S: crate::async_stream::AsyncCiphertextSource>(
        self,
        source: S,
    ) -> Result<crate::async_stream::AsyncRangeDecryptor<S>, PartialDecryptError> {
        let prepared = self.prepare()?;
        Ok(crate::async_stream::AsyncRangeDecryptor::new(
            source,
            prepared.plan,
            prepared.pipeline,
            prepared.read_buffer_size,
        ))
    }

    pub(crate) fn prepare(self) -> Result<PreparedRange, PartialDecryptError> {
        let mode = self
            .mode
            .ok_or_else(|| PartialDecryptError::Config("missing cipher mode".into()))??;

        let password = self
            .password
            .ok_or_else(|| PartialDecryptError::Config("missing password".into()))?;
        if password.is_empty() {
            return Err(PartialDecryptError::Config("empty password".into()));
        }

        if !(1..=MAX_READ_BUFFER_SIZE).contains(&self.read_buffer_size) {
            return Err(PartialDecryptError::Config(format!(
                "read buffer size must be within 1..={MAX_READ_BUFFER_SIZE}, got {}",
                self.read_buffer_size
            )));
        }

        let range = ByteRange::new(self.start, self.end)?;
        let plan = WindowPlan::new(range);
        let needs_external_iv = !plan.chain_from_ciphertext;

        // Key length and KDF only matter when the KDF actually runs.
        let (key, iv) = match password {
            Password::Key(key) => {
                let iv = match self.iv {
                    Some(iv) => Some(iv),
                    None if needs_external_iv => {
                        let key_len = derived_key_len(self.key_length, mode)?;
                        self.key_derivation.validate()?;
                        Some(
                            self.key_derivation
                                .derive(key.expose_secret(), key_len, AES_BLOCK_SIZE)?
                                .iv,
                        )
                    }
                    None => None,
                };
                (key, iv)
            }
            Password::Passphrase(phrase) => {
                let key_len = derived_key_len(self.key_length, mode)?;
                self.key_derivation.validate()?;
                let derived = self.key_derivation.derive(
                    phrase.expose_secret().as_bytes(),
                    key_len,
                    AES_BLOCK_SIZE,
                )?;
                (derived.key, Some(self.iv.unwrap_or(derived.iv)))
            }
        };

        debug!(
            %mode,
            range = %plan.range,
            window = %plan.window,
            skip = plan.trim.skip,
            budget = ?plan.trim.budget,
            chain_from_ciphertext = plan.chain_from_ciphertext,
            "planned ciphertext window"
        );

        let pipeline = RangePipeline::new(&plan, mode, key, iv)?;
        Ok(PreparedRange {
            plan,
            pipeline,
            read_buffer_size: self.read_buffer_size,
        })
    }
}

/// Key bytes to derive: `bits / 8`, or the mode's key size when unset.
fn derived_key_len(bits: Option<u32>, mode: CipherMode) -> Result<usize, PartialDecryptError> {
    match bits {
        None => Ok(mode.key_len()),
        Some(bits) if bits > 0 && bits % 8 == 0 => Ok((bits / 8) as usize),
        Some(bits) => Err(PartialDecryptError::Config(format!(
            "key length must be a positive multiple of 8 bits, got {bits}"
        ))),
    }
}

impl Default for RangeDecryptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
