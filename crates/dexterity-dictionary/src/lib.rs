//! Decoder for Dexterity dictionary files (`.dic` / `.cnk`)
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_precision_loss)] // Module ratios
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! A dictionary file is a container made of blocks. A block table, located
//! through the file header, describes every block; block 1 holds the module
//! table and block 2 holds the module names.
//!
//! # File Structure
//!
//! | Region | Offset | Size |
//! |--------|--------|------|
//! | Header | 0x00 | 26 bytes |
//! | Block table | header `block_table_offset` | 14 bytes per record |
//! | Module table | start of block 1 | 8 byte header, 16 bytes per record |
//! | Module names | start of block 2, plus one | variable |
//!
//! All multi-byte fields are little-endian. Every field is bounds checked
//! against the file while decoding, and the first violation aborts the
//! whole decode with a [`DictionaryError`] naming the block number or module
//! id at fault.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dexterity_dictionary::Dictionary;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dictionary = Dictionary::open("Dynamics.dic")?;
//!
//! println!("Blocks: {}", dictionary.blocks().len());
//! for module in dictionary.modules() {
//!     println!("{:>6} {}", module.id(), dictionary.module_name(module)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod block;
pub mod dictionary;
pub mod error;
pub mod header;
pub mod layout;
pub mod module;
pub mod reader;

pub use block::{Block, BlockRecord, BlockType};
pub use dictionary::{Dictionary, DictionarySummary};
pub use error::{DictionaryError, Result};
pub use header::DictionaryHeader;
pub use layout::{
    BLOCK_RECORD_SIZE, DICTIONARY_SIGNATURE, DictionaryLayout, HEADER_SIZE, MODULE_RECORD_SIZE,
    MODULE_TABLE_HEADER_SIZE,
};
pub use module::{MODULE_TYPE_STANDARD, Module, ModuleRecord, ModuleTableHeader};
pub use reader::{BLOCK_LEADING_SKIP, BlockReader};
