//! Dictionary decoding pipeline
//!
//! Decoding is a single linear pass: header, then block table, then module
//! table. The first failure aborts the pass and nothing partially decoded is
//! returned.

use crate::block::{Block, BlockRecord};
use crate::error::{DictionaryError, Result};
use crate::header::DictionaryHeader;
use crate::layout::{DictionaryLayout, HEADER_SIZE};
use crate::module::{MODULE_TYPE_STANDARD, Module, ModuleRecord, ModuleTableHeader};
use crate::reader::BlockReader;
use binrw::BinRead;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// A decoded dictionary file
///
/// Immutable once constructed. Module names are not held in memory; each
/// call to [`Dictionary::module_name`] reads the name from disk through its
/// own file handle, so a shared `&Dictionary` can resolve names from several
/// threads at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    path: PathBuf,
    layout: DictionaryLayout,
    header: DictionaryHeader,
    blocks: Vec<Block>,
    used_modules: u16,
    unused_modules: u16,
    modules: Vec<Module>,
}

/// Summary of a decoded dictionary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionarySummary {
    /// Absolute path of the file
    pub path: PathBuf,
    /// File size recorded in the header
    pub header_file_size: u32,
    /// Block table offset
    pub block_table_offset: u32,
    /// Block table record count
    pub block_table_length: u32,
    /// Unallocated block count
    pub unallocated_blocks: u32,
    /// Number of decoded blocks
    pub block_count: usize,
    /// Used module slots
    pub used_modules: u16,
    /// Unused module slots
    pub unused_modules: u16,
    /// Total module slots
    pub total_modules: usize,
    /// Share of modules with the standard type, between 0 and 1
    pub standard_module_ratio: f64,
}

impl Dictionary {
    /// Open and decode a dictionary file with the standard layout
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_layout(path, DictionaryLayout::default())
    }

    /// Open and decode a dictionary file with a specific layout
    pub fn open_with_layout<P: AsRef<Path>>(path: P, layout: DictionaryLayout) -> Result<Self> {
        layout.validate()?;

        let path = path.as_ref();
        if !path.is_file() {
            return Err(DictionaryError::FileNotFound(path.to_path_buf()));
        }
        let path = std::path::absolute(path)?;

        if !layout.accepts_extension(&path) {
            return Err(DictionaryError::InvalidExtension(path));
        }

        let file = File::open(&path)?;
        let file_length = file.metadata()?.len();
        if file_length < HEADER_SIZE {
            return Err(DictionaryError::FileTooShort {
                expected: HEADER_SIZE,
                actual: file_length,
            });
        }

        let mut reader = BufReader::new(file);
        let dictionary = Self::decode(&mut reader, file_length, path, layout)?;

        info!(
            "Decoded dictionary {}: {} blocks, {} modules",
            dictionary.path.display(),
            dictionary.blocks.len(),
            dictionary.modules.len()
        );

        Ok(dictionary)
    }

    fn decode<R: Read + Seek>(
        reader: &mut R,
        file_length: u64,
        path: PathBuf,
        layout: DictionaryLayout,
    ) -> Result<Self> {
        let header = DictionaryHeader::read_validated(reader, file_length)?;
        debug!(
            "Header: file_size={}, block_table_offset=0x{:x}, block_table_length={}, unallocated={}",
            header.file_size,
            header.block_table_offset,
            header.block_table_length,
            header.unallocated_blocks
        );

        if u64::from(header.file_size) != file_length {
            warn!(
                "Header records file size {} but file is {} bytes",
                header.file_size, file_length
            );
        }

        let blocks = read_block_table(reader, &header, file_length)?;
        debug!("Decoded {} blocks", blocks.len());

        let table_block = lookup(&blocks, layout.module_table_block)?;
        let names_block = lookup(&blocks, layout.module_names_block)?;

        reader.seek(SeekFrom::Start(u64::from(table_block.start())))?;
        let table_header = ModuleTableHeader::read(reader)?;
        debug!(
            "Module table in block {}: {} used, {} unused",
            table_block.number(),
            table_header.used_modules,
            table_header.unused_modules
        );

        let mut modules = Vec::with_capacity(table_header.total_modules());
        for _ in 0..table_header.total_modules() {
            let record = ModuleRecord::read(reader)?;
            trace!(
                "Module record: id={}, type={}, dir_block={}, name_offset={}, name_length={}",
                record.id,
                record.module_type,
                record.dir_block,
                record.name_offset,
                record.name_length
            );
            modules.push(Module::from_record(
                record,
                header.block_table_length,
                names_block,
            )?);
        }

        Ok(Self {
            path,
            layout,
            header,
            blocks,
            used_modules: table_header.used_modules,
            unused_modules: table_header.unused_modules,
            modules,
        })
    }

    /// Absolute path of the decoded file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Layout used for decoding
    pub const fn layout(&self) -> &DictionaryLayout {
        &self.layout
    }

    /// Decoded file header
    pub const fn header(&self) -> &DictionaryHeader {
        &self.header
    }

    /// Signature bytes from the header
    pub const fn signature(&self) -> [u8; 4] {
        self.header.signature
    }

    /// File size as recorded in the header
    pub const fn header_file_size(&self) -> u32 {
        self.header.file_size
    }

    /// Offset of the block table
    pub const fn block_table_offset(&self) -> u32 {
        self.header.block_table_offset
    }

    /// Number of records in the block table
    pub const fn block_table_length(&self) -> u32 {
        self.header.block_table_length
    }

    /// Count of unallocated blocks
    pub const fn unallocated_blocks(&self) -> u32 {
        self.header.unallocated_blocks
    }

    /// All blocks in block number order (index = number - 1)
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a block by its 1-based number
    pub fn block(&self, number: u32) -> Result<&Block> {
        lookup(&self.blocks, number)
    }

    /// Number of module slots in use
    pub const fn used_modules(&self) -> u16 {
        self.used_modules
    }

    /// Number of module slots not in use
    pub const fn unused_modules(&self) -> u16 {
        self.unused_modules
    }

    /// Total number of module slots
    pub fn total_modules(&self) -> usize {
        usize::from(self.used_modules) + usize::from(self.unused_modules)
    }

    /// Modules in module table order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Open a scoped reader over `block`
    ///
    /// The reader holds its own file handle and starts one byte past the
    /// block's recorded start.
    pub fn open_block(&self, block: &Block) -> Result<BlockReader> {
        BlockReader::open(&self.path, block)
    }

    /// Read a module's name from the module names block
    ///
    /// The stored length counts a terminator which is not returned, so a
    /// length of 0 or 1 gives an empty name.
    pub fn module_name(&self, module: &Module) -> Result<String> {
        let names = self.block(self.layout.module_names_block)?;
        let mut reader = self.open_block(names)?;
        reader.seek(SeekFrom::Current(i64::from(module.name_offset())))?;
        reader.read_ascii(module.name_bytes())
    }

    /// Resolve every module name in table order
    pub fn module_names(&self) -> Result<Vec<String>> {
        self.modules
            .iter()
            .map(|module| self.module_name(module))
            .collect()
    }

    /// Summarise header fields and table counts
    pub fn summary(&self) -> DictionarySummary {
        let standard = self
            .modules
            .iter()
            .filter(|module| module.module_type() == MODULE_TYPE_STANDARD)
            .count();
        let total = self.total_modules();
        let standard_module_ratio = if total == 0 {
            0.0
        } else {
            standard as f64 / total as f64
        };

        DictionarySummary {
            path: self.path.clone(),
            header_file_size: self.header.file_size,
            block_table_offset: self.header.block_table_offset,
            block_table_length: self.header.block_table_length,
            unallocated_blocks: self.header.unallocated_blocks,
            block_count: self.blocks.len(),
            used_modules: self.used_modules,
            unused_modules: self.unused_modules,
            total_modules: total,
            standard_module_ratio,
        }
    }
}

fn read_block_table<R: Read + Seek>(
    reader: &mut R,
    header: &DictionaryHeader,
    file_length: u64,
) -> Result<Vec<Block>> {
    reader.seek(SeekFrom::Start(u64::from(header.block_table_offset)))?;

    let mut blocks = Vec::with_capacity(header.block_table_length as usize);
    for number in 1..=header.block_table_length {
        let record = BlockRecord::read(reader)?;
        blocks.push(Block::from_record(number, record, file_length)?);
    }

    Ok(blocks)
}

fn lookup(blocks: &[Block], number: u32) -> Result<&Block> {
    number
        .checked_sub(1)
        .and_then(|index| blocks.get(index as usize))
        .ok_or(DictionaryError::MissingBlock {
            number,
            count: blocks.len(),
        })
}
