use std::{
    fs::File,
    io::{self, Read},
    ops::Deref,
    path::Path,
};

use memmap2::Mmap;
use tracing::{debug, warn};

use crate::processor::ProcessorError;

/// Read-only view over the whole input file.
///
/// Chunk tasks only ever see `&[u8]` borrowed from this view, so it can be
/// shared across the worker pool without copying.
#[derive(Debug)]
pub enum FileView {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl FileView {
    /// Opens `path`, memory-mapping it when `prefer_mmap` is set.
    ///
    /// A failed mapping falls back to reading the file into memory; only a
    /// failure to open or read the file is fatal. Empty files are never mapped.
    pub fn open(path: &Path, prefer_mmap: bool) -> Result<Self, ProcessorError> {
        // SAFETY: the input is treated as read-only for the whole run; a file
        // truncated underneath a mapping is outside what the pipeline supports.
        Self::open_with(path, prefer_mmap, |file| unsafe { Mmap::map(file) })
    }

    /// [`FileView::open`] with the mapping step supplied by the caller.
    fn open_with(
        path: &Path,
        prefer_mmap: bool,
        map: impl FnOnce(&File) -> io::Result<Mmap>,
    ) -> Result<Self, ProcessorError> {
        let input_err = |source| ProcessorError::Input {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(input_err)?;
        let len = file.metadata().map_err(input_err)?.len();

        if prefer_mmap && len > 0 {
            match map(&file) {
                Ok(mmap) => {
                    advise_sequential(&mmap);
                    return Ok(FileView::Mapped(mmap));
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "memory mapping failed, falling back to buffered read"
                    );
                }
            }
        }

        Self::read_buffered(file, len).map_err(input_err)
    }

    fn read_buffered(mut file: File, len: u64) -> io::Result<Self> {
        let mut buf = Vec::with_capacity(len as usize);
        file.read_to_end(&mut buf)?;
        Ok(FileView::Buffered(buf))
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, FileView::Mapped(_))
    }
}

#[cfg(unix)]
fn advise_sequential(mmap: &Mmap) {
    if let Err(err) = mmap.advise(memmap2::Advice::Sequential) {
        debug!(error = %err, "madvise(SEQUENTIAL) ignored");
    }
}

#[cfg(not(unix))]
fn advise_sequential(_mmap: &Mmap) {}

impl Deref for FileView {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FileView::Mapped(mmap) => mmap,
            FileView::Buffered(buf) => buf,
        }
    }
}
