//! Scoped read window over a single block

use crate::block::Block;
use crate::error::Result;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes skipped at the start of a block before its content is addressed
///
/// Every block reader starts one byte past the block's recorded start.
/// The meaning of that leading byte is unknown; module name offsets are only
/// correct relative to the byte after it.
pub const BLOCK_LEADING_SKIP: u64 = 1;

/// Read handle positioned inside one block of a dictionary file
///
/// Each reader owns its own file handle, which is closed when the reader is
/// dropped. Positions reported and accepted by [`Seek`] are relative to the
/// block origin (`start + 1`), so `SeekFrom::Start(n)` addresses byte `n` of
/// the block content.
#[derive(Debug)]
pub struct BlockReader {
    inner: BufReader<File>,
    origin: u64,
    block: u32,
}

impl BlockReader {
    /// Open `path` and position a reader at the origin of `block`
    pub fn open(path: &Path, block: &Block) -> Result<Self> {
        let origin = u64::from(block.start()) + BLOCK_LEADING_SKIP;
        let mut inner = BufReader::new(File::open(path)?);
        inner.seek(SeekFrom::Start(origin))?;

        Ok(Self {
            inner,
            origin,
            block: block.number(),
        })
    }

    /// Number of the block this reader was opened for
    pub const fn block_number(&self) -> u32 {
        self.block
    }

    /// Absolute file offset of the reader origin
    pub const fn origin(&self) -> u64 {
        self.origin
    }

    /// Read `len` bytes as single-byte characters
    pub fn read_ascii(&mut self, len: usize) -> Result<String> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf.into_iter().map(char::from).collect())
    }
}

impl Read for BlockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for BlockReader {
    /// Seek relative to the block origin
    ///
    /// The target is resolved and checked before the underlying handle
    /// moves, so a rejected seek leaves the position unchanged.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let invalid =
            |message: &'static str| io::Error::new(io::ErrorKind::InvalidInput, message);

        let target = match pos {
            SeekFrom::Start(offset) => self.origin.checked_add(offset),
            SeekFrom::Current(delta) => self.inner.stream_position()?.checked_add_signed(delta),
            SeekFrom::End(delta) => self
                .inner
                .get_ref()
                .metadata()?
                .len()
                .checked_add_signed(delta),
        }
        .ok_or_else(|| invalid("seek offset overflow"))?;

        let relative = target
            .checked_sub(self.origin)
            .ok_or_else(|| invalid("seek before the start of the block"))?;

        self.inner.seek(SeekFrom::Start(target))?;
        Ok(relative)
    }
}
