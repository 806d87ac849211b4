//! Error types for dictionary decoding

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when opening or decoding a dictionary file
///
/// Every variant is fatal: decoding stops at the first failure and no
/// partially decoded [`Dictionary`](crate::Dictionary) is returned.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The path does not point at an existing file
    #[error("Dictionary file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file extension is not one of the accepted dictionary extensions
    #[error("Dictionary file does not have a .dic or .cnk extension: {}", .0.display())]
    InvalidExtension(PathBuf),

    /// The file cannot hold the fixed-size header
    #[error("Dictionary file is too short for a header: {actual} bytes, need at least {expected}")]
    FileTooShort {
        /// Minimum length in bytes
        expected: u64,
        /// Actual file length in bytes
        actual: u64,
    },

    /// Header signature does not match the dictionary magic
    #[error("Invalid dictionary signature: {0:02x?}")]
    InvalidSignature([u8; 4]),

    /// Block table offset points past the end of the file
    #[error("Block table offset {offset} exceeds file length {file_length}")]
    BlockTableOffsetOutOfRange {
        /// Block table offset from the header
        offset: u32,
        /// Actual file length
        file_length: u64,
    },

    /// Block table records do not fit after the header
    #[error(
        "Block table of {records} records ({bytes} bytes) exceeds the {available} bytes after the header"
    )]
    BlockTableTooLarge {
        /// Record count from the header
        records: u32,
        /// Byte size of the whole table
        bytes: u64,
        /// Bytes available after the header
        available: u64,
    },

    /// More unallocated blocks than blocks in the table
    #[error("Unallocated block count {unallocated} exceeds block table length {length}")]
    TooManyUnallocatedBlocks {
        /// Unallocated count from the header
        unallocated: u32,
        /// Block table record count
        length: u32,
    },

    /// A block required by the layout is not in the block table
    #[error("Block {number} does not exist (block table has {count} blocks)")]
    MissingBlock {
        /// Requested 1-based block number
        number: u32,
        /// Number of decoded blocks
        count: usize,
    },

    /// Block record carries a type code outside the known set
    #[error("Encountered unknown block type {code} when parsing block {block}")]
    UnknownBlockType {
        /// 1-based block number
        block: u32,
        /// Raw type code
        code: u16,
    },

    /// Block record field violates a bound
    #[error("Block {block} has {field} {value} which exceeds {limit}")]
    BlockOutOfRange {
        /// 1-based block number
        block: u32,
        /// Name of the offending field
        field: &'static str,
        /// Field value as read (or derived, for `start + size`)
        value: u64,
        /// Bound it was checked against
        limit: u64,
    },

    /// Module record carries a type other than the one known value
    #[error("Module {id} has unexpected type {module_type}")]
    UnexpectedModuleType {
        /// Module id
        id: u32,
        /// Raw module type
        module_type: u16,
    },

    /// Module record field violates a bound
    #[error("Module {id} has {field} {value} which exceeds {limit}")]
    ModuleOutOfRange {
        /// Module id
        id: u32,
        /// Name of the offending field
        field: &'static str,
        /// Field value as read
        value: u64,
        /// Bound it was checked against
        limit: u64,
    },

    /// Layout configuration is unusable
    #[error("Invalid dictionary layout: {0}")]
    InvalidLayout(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRw` parsing error, usually a record truncated by end of file
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for dictionary operation results
pub type Result<T> = std::result::Result<T, DictionaryError>;
