//! Async stream adapter over the range decryption pipeline.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use partial_decrypt_rs::{CipherMode, CipherWindow, RangeDecryptorBuilder};
//!
//! let mut stream = RangeDecryptorBuilder::new()
//!     .with_mode(CipherMode::Aes256Cbc)
//!     .with_password("test")
//!     .with_range(85, Some(131))
//!     .build_async(|window: CipherWindow| http_range(url, window))?;
//!
//! while let Some(chunk) = stream.next().await {
//!     sink.write_all(&chunk?).await?;
//! }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use tracing::debug;

use crate::decryptor::pipeline::{Phase, RangePipeline};
use crate::decryptor::{CipherWindow, WindowPlan};
use crate::error::PartialDecryptError;

/// Async provider of ciphertext for an absolute byte window.
///
/// Opening is synchronous; the returned reader does the actual I/O. Closures
/// `FnMut(CipherWindow) -> io::Result<R>` with `R: AsyncRead + Unpin` qualify.
pub trait AsyncCiphertextSource {
    type Reader: AsyncRead + Unpin;

    fn open(&mut self, window: CipherWindow) -> io::Result<Self::Reader>;
}

impl<F, R> AsyncCiphertextSource for F
where
    F: FnMut(CipherWindow) -> io::Result<R>,
    R: AsyncRead + Unpin,
{
    type Reader = R;

    fn open(&mut self, window: CipherWindow) -> io::Result<R> {
        self(window)
    }
}

/// Stream of decrypted chunks for one plaintext byte range.
///
/// The source is polled only while the stream itself is polled and no
/// plaintext is waiting, which carries consumer backpressure to the source.
/// Dropping the stream (or calling [`cancel`](Self::cancel)) drops the source
/// reader and the decipher context.
pub struct AsyncRangeDecryptor<S: AsyncCiphertextSource> {
    source: S,
    reader: Option<S::Reader>,
    pipeline: RangePipeline,
    plan: WindowPlan,
    scratch: Vec<u8>,
}

impl<S: AsyncCiphertextSource> AsyncRangeDecryptor<S> {
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

    #[must_use]
    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.pipeline.phase()
    }

    #[must_use]
    pub fn is_source_open(&self) -> bool {
        self.reader.is_some()
    }

    pub fn cancel(&mut self) {
        self.reader = None;
        self.pipeline.cancel();
    }
}

impl<S> Stream for AsyncRangeDecryptor<S>
where
    S: AsyncCiphertextSource + Unpin,
{
    type Item = Result<Bytes, PartialDecryptError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.pipeline.has_output() {
                return Poll::Ready(Some(Ok(this.pipeline.take_output())));
            }
            if !this.pipeline.wants_input() {
                return Poll::Ready(None);
            }

            if this.reader.is_none() {
                debug!(window = %this.plan.window, range = %this.plan.range, "opening async ciphertext source");
                match this.source.open(this.plan.window) {
                    Ok(reader) => this.reader = Some(reader),
                    Err(e) => {
                        this.pipeline.fail();
                        return Poll::Ready(Some(Err(PartialDecryptError::Source(e))));
                    }
                }
            }

            let Some(reader) = this.reader.as_mut() else {
                return Poll::Ready(None);
            };
            let n = match Pin::new(reader).poll_read(cx, &mut this.scratch) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(n)) => n,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    this.reader = None;
                    this.pipeline.fail();
                    return Poll::Ready(Some(Err(PartialDecryptError::Source(e))));
                }
            };

            let step = if n == 0 {
                this.pipeline.finish()
            } else {
                this.pipeline.feed(&this.scratch[..n])
            };
            if !this.pipeline.wants_input() {
                this.reader = None;
            }
            if let Err(e) = step {
                return Poll::Ready(Some(Err(e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::xor_blocks;
    use crate::{CipherMode, Password, RangeDecryptorBuilder};
    use aes::cipher::{BlockEncrypt, KeyInit};
    use aes::{Aes256Enc, Block as AesBlock};
    use futures_util::StreamExt;

    const KEY: [u8; 32] = [0x33; 32];
    const IV: [u8; 16] = [0x44; 16];

    /// Owned in-memory async reader that returns at most `step` bytes per poll.
    struct MemReader {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl AsyncRead for MemReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<io::Result<usize>> {
            let n = buf.len().min(self.step).min(self.data.len() - self.pos);
            let pos = self.pos;
            buf[..n].copy_from_slice(&self.data[pos..pos + n]);
            self.pos += n;
            Poll::Ready(Ok(n))
        }
    }

    fn fixture(len: usize) -> (Vec<u8>, Vec<u8>) {
        let plaintext: Vec<u8> = (0..len).map(|i| (i * 13 % 256) as u8).collect();
        let cipher = Aes256Enc::new(&KEY.into());
        let mut prev = IV;
        let mut ciphertext = Vec::new();
        for chunk in plaintext.chunks_exact(16) {
            let mut block = [0u8; 16];
            xor_blocks(chunk, &prev, &mut block);
            let mut aes_block = AesBlock::from(block);
            cipher.encrypt_block(&mut aes_block);
            prev.copy_from_slice(aes_block.as_slice());
            ciphertext.extend_from_slice(aes_block.as_slice());
        }
        (plaintext, ciphertext)
    }

    fn source(
        ciphertext: Vec<u8>,
        step: usize,
    ) -> impl FnMut(CipherWindow) -> io::Result<MemReader> + Unpin {
        move |window: CipherWindow| {
            let start = (window.start as usize).min(ciphertext.len());
            let end = window
                .end
                .map_or(ciphertext.len(), |e| (e as usize + 1).min(ciphertext.len()));
            Ok::<_, io::Error>(MemReader {
                data: ciphertext[start..end].to_vec(),
                pos: 0,
                step,
            })
        }
    }

    fn builder(start: u64, end: Option<u64>) -> RangeDecryptorBuilder {
        RangeDecryptorBuilder::new()
            .with_mode(CipherMode::Aes256Cbc)
            .with_password(Password::key(KEY))
            .with_iv(IV)
            .with_range(start, end)
    }

    async fn collect(stream: AsyncRangeDecryptor<impl AsyncCiphertextSource + Unpin>) -> Vec<u8> {
        let chunks: Vec<_> = stream.collect().await;
        chunks
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
            .concat()
    }

    #[tokio::test]
    async fn async_mid_range() {
        let (plaintext, ciphertext) = fixture(128);
        let stream = builder(85, Some(120))
            .build_async(source(ciphertext, 7))
            .unwrap();
        assert_eq!(collect(stream).await, &plaintext[85..=120]);
    }

    #[tokio::test]
    async fn async_unbounded_from_zero() {
        let (plaintext, ciphertext) = fixture(96);
        let stream = builder(0, None).build_async(source(ciphertext, 64)).unwrap();
        assert_eq!(collect(stream).await, plaintext);
    }

    #[tokio::test]
    async fn async_truncated_window_yields_one_error() {
        let (_, ciphertext) = fixture(64);
        let mut stream = builder(0, Some(200))
            .build_async(source(ciphertext, 16))
            .unwrap();

        let mut errors = 0;
        while let Some(item) = stream.next().await {
            if item.is_err() {
                errors += 1;
            }
        }
        assert_eq!(errors, 1);
        assert_eq!(stream.phase(), Phase::Failed);
        assert!(!stream.is_source_open());
    }

    #[tokio::test]
    async fn async_cancel_stops_output() {
        let (_, ciphertext) = fixture(128);
        let mut stream = builder(0, None).build_async(source(ciphertext, 16)).unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 16);
        stream.cancel();
        assert!(stream.next().await.is_none());
        assert!(!stream.is_source_open());
    }
}
