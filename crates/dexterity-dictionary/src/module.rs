//! Module table records and validated modules

use crate::block::Block;
use crate::error::{DictionaryError, Result};
use binrw::BinRead;
use serde::Serialize;

/// The only module type currently known to be valid
pub const MODULE_TYPE_STANDARD: u16 = 1;

/// Module table header (8 bytes)
///
/// The last four bytes are unknown; they are consumed and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ModuleTableHeader {
    /// Number of module slots in use
    pub used_modules: u16,

    /// Number of module slots not in use
    #[br(pad_after = 4)]
    pub unused_modules: u16,
}

impl ModuleTableHeader {
    /// Number of module records following the header
    pub fn total_modules(&self) -> usize {
        usize::from(self.used_modules) + usize::from(self.unused_modules)
    }
}

/// Raw 16-byte module table record
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ModuleRecord {
    /// Module type
    pub module_type: u16,
    /// Module id
    pub id: u32,
    /// Block number of the module's directory block
    pub dir_block: u32,
    /// Offset of the name within the module names block
    pub name_offset: u32,
    /// Name length including the trailing terminator
    pub name_length: u16,
}

/// A validated module table entry
///
/// The name is not stored; resolve it with
/// [`Dictionary::module_name`](crate::Dictionary::module_name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Module {
    module_type: u16,
    id: u32,
    dir_block: u32,
    name_offset: u32,
    name_length: u16,
}

impl Module {
    /// Validate a raw record against the block table
    ///
    /// `name_offset` and `name_length` are each checked against the size of
    /// the module names block on their own, not as a combined range.
    pub fn from_record(
        record: ModuleRecord,
        block_table_length: u32,
        names_block: &Block,
    ) -> Result<Self> {
        let id = record.id;

        if record.module_type != MODULE_TYPE_STANDARD {
            return Err(DictionaryError::UnexpectedModuleType {
                id,
                module_type: record.module_type,
            });
        }

        let out_of_range = |field, value: u64, limit: u64| DictionaryError::ModuleOutOfRange {
            id,
            field,
            value,
            limit,
        };

        let names_size = u64::from(names_block.size());

        if record.dir_block > block_table_length {
            return Err(out_of_range(
                "directory block",
                u64::from(record.dir_block),
                u64::from(block_table_length),
            ));
        }
        if u64::from(record.name_offset) > names_size {
            return Err(out_of_range(
                "name offset",
                u64::from(record.name_offset),
                names_size,
            ));
        }
        if u64::from(record.name_length) > names_size {
            return Err(out_of_range(
                "name length",
                u64::from(record.name_length),
                names_size,
            ));
        }

        Ok(Self {
            module_type: record.module_type,
            id,
            dir_block: record.dir_block,
            name_offset: record.name_offset,
            name_length: record.name_length,
        })
    }

    /// Module type
    pub const fn module_type(&self) -> u16 {
        self.module_type
    }

    /// Module id
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Block number of the module's directory block
    pub const fn dir_block(&self) -> u32 {
        self.dir_block
    }

    /// Name offset within the module names block
    pub const fn name_offset(&self) -> u32 {
        self.name_offset
    }

    /// Name length in characters, including the terminator
    pub const fn name_length(&self) -> u16 {
        self.name_length
    }

    /// Number of name bytes actually read, without the terminator
    pub const fn name_bytes(&self) -> usize {
        self.name_length.saturating_sub(1) as usize
    }

    /// Whether this slot is blank
    pub const fn is_blank(&self) -> bool {
        self.module_type == 0
    }
}
