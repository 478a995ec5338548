//! src/decryptor/source.rs
//! Ranged-read capability: "give me the ciphertext bytes of this window"

use std::io::{self, Read, Seek, SeekFrom};

use crate::decryptor::window::CipherWindow;

/// Provider of ciphertext for an absolute byte window.
///
/// `open` is called at most once per decryptor, on first demand. The returned
/// reader must yield exactly the bytes of `window` (or fewer, if the resource
/// is shorter), in order. Dropping the reader is how the decryptor cancels it.
///
/// Any `FnMut(CipherWindow) -> io::Result<R>` closure is a source, which is
/// the natural shape for HTTP range requests:
///
/// ```ignore
/// let source = |window: CipherWindow| fetch_range(url, window.start, window.end);
/// ```
pub trait CiphertextSource {
    type Reader: Read;

    fn open(&mut self, window: CipherWindow) -> io::Result<Self::Reader>;
}

impl<F, R> CiphertextSource for F
where
    F: FnMut(CipherWindow) -> io::Result<R>,
    R: Read,
{
    type Reader = R;

    #[inline(always)]
    fn open(&mut self, window: CipherWindow) -> io::Result<R> {
        self(window)
    }
}

/// Serves windows out of any seekable reader (files, in-memory cursors).
#[derive(Debug)]
pub struct SeekableSource<R> {
    inner: Option<R>,
}

impl<R: Read + Seek> SeekableSource<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<R: Read + Seek> CiphertextSource for SeekableSource<R> {
    type Reader = io::Take<R>;

    fn open(&mut self, window: CipherWindow) -> io::Result<Self::Reader> {
        let mut inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::other("seekable source already opened"))?;
        inner.seek(SeekFrom::Start(window.start))?;
        Ok(inner.take(window.len().unwrap_or(u64::MAX)))
    }
}
