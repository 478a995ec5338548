//! src/decryptor/read.rs
//! Pull-based range decryptor over a blocking ciphertext source
//!
//! The source is only read when the consumer asks for bytes and nothing is
//! buffered, so at most one source read worth of plaintext sits in memory.

use std::fmt;
use std::io::{self, Read, Write};

use bytes::Bytes;
use tracing::debug;

use crate::decryptor::pipeline::{Phase, RangePipeline};
use crate::decryptor::source::CiphertextSource;
use crate::decryptor::window::{CipherWindow, WindowPlan};
use crate::error::PartialDecryptError;

/// Decrypts one plaintext byte range, implementing [`Read`].
///
/// Built with [`RangeDecryptorBuilder::build`](crate::RangeDecryptorBuilder::build).
/// The source is opened on the first read; it is dropped as soon as the range
/// is satisfied, on error, or on [`cancel`](Self::cancel).
pub struct RangeDecryptor<S: CiphertextSource> {
    source: S,
    reader: Option<S::Reader>,
    pipeline: RangePipeline,
    plan: WindowPlan,
    scratch: Vec<u8>,
}

impl<S: CiphertextSource> RangeDecryptor<S> {
    pub(crate) fn new(
        source: S,
        plan: WindowPlan,
        pipeline: RangePipeline,
        read_buffer_size: usize,
    ) -> Self {
        Self {
            source,
            reader: None,
            pipeline,
            plan,
            scratch: vec![0u8; read_buffer_size],
        }
    }

    /// The window, trim plan and chaining mode computed for this request.
    #[must_use]
    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    /// Ciphertext window requested from the source.
    #[must_use]
    pub fn window(&self) -> CipherWindow {
        self.pipeline.window()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.pipeline.phase()
    }

    /// Ciphertext bytes pulled from the source so far.
    #[must_use]
    pub fn ciphertext_read(&self) -> u64 {
        self.pipeline.received()
    }

    /// Whether the source reader is currently open.
    #[must_use]
    pub fn is_source_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Stop decrypting: drops the source reader, the decipher context and any
    /// buffered bytes. Later reads return end-of-stream.
    pub fn cancel(&mut self) {
        self.reader = None;
        self.pipeline.cancel();
    }

    /// Iterate over plaintext in the chunks it is produced in.
    #[must_use]
    pub fn chunks(self) -> PlaintextChunks<S> {
        PlaintextChunks { inner: self }
    }

    /// Write the whole remaining range to `writer`, returning bytes written.
    pub fn copy_to<W: Write>(&mut self, writer: &mut W) -> Result<u64, PartialDecryptError> {
        let mut written = 0u64;
        loop {
            self.pull()?;
            if !self.pipeline.has_output() {
                return Ok(written);
            }
            let chunk = self.pipeline.take_output();
            if let Err(e) = writer.write_all(&chunk) {
                self.cancel();
                return Err(PartialDecryptError::Sink(e));
            }
            written += chunk.len() as u64;
        }
    }

    /// Read from the source until there is output or the pipeline is terminal.
    fn pull(&mut self) -> Result<(), PartialDecryptError> {
        while !self.pipeline.has_output() && self.pipeline.wants_input() {
            if self.reader.is_none() {
                debug!(window = %self.plan.window, range = %self.plan.range, "opening ciphertext source");
                match self.source.open(self.plan.window) {
                    Ok(reader) => self.reader = Some(reader),
                    Err(e) => {
                        self.pipeline.fail();
                        return Err(PartialDecryptError::Source(e));
                    }
                }
            }

            let Some(reader) = self.reader.as_mut() else {
                break;
            };
            let n = match reader.read(&mut self.scratch) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.reader = None;
                    self.pipeline.fail();
                    return Err(PartialDecryptError::Source(e));
                }
            };

            let step = if n == 0 {
                self.pipeline.finish()
            } else {
                self.pipeline.feed(&self.scratch[..n])
            };
            if !self.pipeline.wants_input() {
                self.reader = None;
            }
            step?;
        }
        Ok(())
    }
}

impl<S: CiphertextSource> Read for RangeDecryptor<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.pull()?;
        Ok(self.pipeline.copy_output(buf))
    }
}

impl<S: CiphertextSource> fmt::Debug for RangeDecryptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeDecryptor")
            .field("plan", &self.plan)
            .field("phase", &self.pipeline.phase())
            .field("ciphertext_read", &self.pipeline.received())
            .field("source_open", &self.reader.is_some())
            .finish_non_exhaustive()
    }
}

/// Iterator over decrypted chunks; see [`RangeDecryptor::chunks`].
///
/// Yields at most one error, after which it is exhausted.
pub struct PlaintextChunks<S: CiphertextSource> {
    inner: RangeDecryptor<S>,
}

impl<S: CiphertextSource> PlaintextChunks<S> {
    /// Cancel the underlying decryptor; the iterator ends.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    #[must_use]
    pub fn into_inner(self) -> RangeDecryptor<S> {
        self.inner
    }
}

impl<S: CiphertextSource> Iterator for PlaintextChunks<S> {
    type Item = Result<Bytes, PartialDecryptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.inner.pull() {
            return Some(Err(e));
        }
        if self.inner.pipeline.has_output() {
            Some(Ok(self.inner.pipeline.take_output()))
        } else {
            None
        }
    }
}
