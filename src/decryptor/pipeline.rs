//! src/decryptor/pipeline.rs
//! Sans-IO range decryption state machine shared by the sync reader and the async stream
//!
//! bytes in → chaining value → CBC decipher → trimmer → pending output

use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::aliases::{Block16, SecretBytes};
use crate::consts::AES_BLOCK_SIZE;
use crate::crypto::cipher::CipherMode;
use crate::decryptor::chain::{Absorbed, ChainResolver};
use crate::decryptor::decipher::BlockDecipher;
use crate::decryptor::trim::OutputTrimmer;
use crate::decryptor::window::{Budget, CipherWindow, WindowPlan};
use crate::error::PartialDecryptError;

/// Where the pipeline is in its lifetime.
enum PipelineState {
    /// Collecting the window's leading block to use as chaining value.
    AwaitingChainValue {
        resolver: ChainResolver,
        mode: CipherMode,
        key: SecretBytes,
    },
    /// Decipher context is live and consuming ciphertext.
    Deciphering(BlockDecipher),
    /// No more input wanted; pending output is still being handed out.
    Draining,
    Done,
    Failed,
}

/// Public view of [`PipelineState`], for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingChainValue,
    Deciphering,
    Draining,
    Done,
    Failed,
}

pub(crate) struct RangePipeline {
    state: PipelineState,
    trimmer: OutputTrimmer,
    window: CipherWindow,
    received: u64,
    deciphered: Vec<u8>,
    pending: BytesMut,
}

impl RangePipeline {
    /// Set up the pipeline for `plan`.
    ///
    /// With an external chaining value the decipher context is built right
    /// away, so key and IV length errors surface here; otherwise it is built
    /// once the first ciphertext block has been collected.
    pub(crate) fn new(
        plan: &WindowPlan,
        mode: CipherMode,
        key: SecretBytes,
        iv: Option<SecretBytes>,
    ) -> Result<Self, PartialDecryptError> {
        let state = if plan.chain_from_ciphertext {
            PipelineState::AwaitingChainValue {
                resolver: ChainResolver::new(),
                mode,
                key,
            }
        } else {
            let iv = iv.ok_or_else(|| {
                PartialDecryptError::Config("an IV is required when start < 16".into())
            })?;
            let iv_bytes: &[u8] = iv.expose_secret();
            let chaining_value: [u8; AES_BLOCK_SIZE] = iv_bytes.try_into().map_err(|_| {
                PartialDecryptError::Crypto(format!(
                    "invalid IV length {} for {mode} (expected {AES_BLOCK_SIZE})",
                    iv_bytes.len()
                ))
            })?;
            let decipher =
                BlockDecipher::new(mode, key.expose_secret(), Block16::new(chaining_value))?;
            debug!(%mode, "decipher context keyed with external IV");
            PipelineState::Deciphering(decipher)
        };

        Ok(Self {
            state,
            trimmer: OutputTrimmer::new(plan.trim),
            window: plan.window,
            received: 0,
            deciphered: Vec::new(),
            pending: BytesMut::new(),
        })
    }

    #[must_use]
    pub(crate) fn phase(&self) -> Phase {
        match self.state {
            PipelineState::AwaitingChainValue { .. } => Phase::AwaitingChainValue,
            PipelineState::Deciphering(_) => Phase::Deciphering,
            PipelineState::Draining => Phase::Draining,
            PipelineState::Done => Phase::Done,
            PipelineState::Failed => Phase::Failed,
        }
    }

    /// Whether the source should be read again.
    #[inline(always)]
    #[must_use]
    pub(crate) fn wants_input(&self) -> bool {
        matches!(
            self.state,
            PipelineState::AwaitingChainValue { .. } | PipelineState::Deciphering(_)
        )
    }

    #[inline(always)]
    #[must_use]
    pub(crate) fn has_output(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Ciphertext bytes received from the source so far.
    #[inline(always)]
    #[must_use]
    pub(crate) fn received(&self) -> u64 {
        self.received
    }

    #[inline(always)]
    #[must_use]
    pub(crate) fn window(&self) -> CipherWindow {
        self.window
    }

    /// Push the next ciphertext chunk of the window through the pipeline.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Result<(), PartialDecryptError> {
        let result = self.try_feed(chunk);
        if result.is_err() {
            self.fail();
        }
        result
    }

    fn try_feed(&mut self, chunk: &[u8]) -> Result<(), PartialDecryptError> {
        self.received += chunk.len() as u64;

        self.state = match mem::replace(&mut self.state, PipelineState::Failed) {
            PipelineState::AwaitingChainValue {
                resolver,
                mode,
                key,
            } => match resolver.absorb(chunk) {
                Absorbed::Pending(resolver) => PipelineState::AwaitingChainValue {
                    resolver,
                    mode,
                    key,
                },
                Absorbed::Complete {
                    chaining_value,
                    remainder,
                } => {
                    let mut decipher =
                        BlockDecipher::new(mode, key.expose_secret(), chaining_value)?;
                    debug!(
                        %mode,
                        offset = self.window.start,
                        "chaining value recovered from ciphertext"
                    );
                    self.decipher(&mut decipher, remainder);
                    self.next_state(decipher)
                }
            },
            PipelineState::Deciphering(mut decipher) => {
                self.decipher(&mut decipher, chunk);
                self.next_state(decipher)
            }
            terminal => terminal,
        };

        Ok(())
    }

    /// The source reported end of data.
    pub(crate) fn finish(&mut self) -> Result<(), PartialDecryptError> {
        let result = self.try_finish();
        if result.is_err() {
            self.fail();
        }
        result
    }

    fn try_finish(&mut self) -> Result<(), PartialDecryptError> {
        match mem::replace(&mut self.state, PipelineState::Failed) {
            PipelineState::AwaitingChainValue { resolver, .. } => {
                warn!(
                    window = %self.window,
                    collected = resolver.filled(),
                    "source ended before the chaining block was complete"
                );
                Err(self.truncated())
            }
            PipelineState::Deciphering(decipher) => {
                if decipher.pending_len() > 0 {
                    warn!(
                        window = %self.window,
                        dangling = decipher.pending_len(),
                        "source ended mid-block"
                    );
                    return Err(self.truncated());
                }
                if let Budget::Bounded(owed) = self.trimmer.budget() {
                    if owed > 0 {
                        warn!(window = %self.window, owed, "source ended before the range was covered");
                        return Err(self.truncated());
                    }
                }
                self.state = self.drained_or(PipelineState::Draining);
                Ok(())
            }
            terminal => {
                self.state = terminal;
                Ok(())
            }
        }
    }

    /// Move up to `buf.len()` pending bytes into `buf`.
    pub(crate) fn copy_output(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        self.settle();
        n
    }

    /// Hand out everything pending as one chunk.
    pub(crate) fn take_output(&mut self) -> Bytes {
        let out = self.pending.split().freeze();
        self.settle();
        out
    }

    /// Stop producing: drop the decipher context and any buffered bytes.
    pub(crate) fn cancel(&mut self) {
        if self.wants_input() || self.has_output() {
            debug!(window = %self.window, received = self.received, "range decryption cancelled");
        }
        self.pending.clear();
        self.state = PipelineState::Done;
    }

    /// Terminal failure: nothing more is emitted after this.
    pub(crate) fn fail(&mut self) {
        self.pending.clear();
        self.deciphered.clear();
        self.state = PipelineState::Failed;
    }

    fn decipher(&mut self, decipher: &mut BlockDecipher, ciphertext: &[u8]) {
        decipher.update(ciphertext, &mut self.deciphered);
        let owed = self.trimmer.trim(&self.deciphered);
        self.pending.extend_from_slice(owed);
        self.deciphered.clear();
    }

    fn next_state(&self, decipher: BlockDecipher) -> PipelineState {
        if self.trimmer.is_exhausted() {
            debug!(
                window = %self.window,
                received = self.received,
                blocks = decipher.blocks_out(),
                "requested range satisfied, releasing source"
            );
            self.drained_or(PipelineState::Draining)
        } else {
            PipelineState::Deciphering(decipher)
        }
    }

    fn drained_or(&self, state: PipelineState) -> PipelineState {
        if self.pending.is_empty() {
            PipelineState::Done
        } else {
            state
        }
    }

    fn settle(&mut self) {
        if matches!(self.state, PipelineState::Draining) && self.pending.is_empty() {
            self.state = PipelineState::Done;
        }
    }

    fn truncated(&self) -> PartialDecryptError {
        PartialDecryptError::Truncated {
            window: self.window,
            received: self.received,
        }
    }
}
