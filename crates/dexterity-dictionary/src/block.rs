//! Block table records and validated blocks

use crate::error::{DictionaryError, Result};
use binrw::BinRead;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block types found in the block table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum BlockType {
    /// Free block
    Unused = 0,
    /// Module table
    ModuleTable = 1,
    /// Directory of a single module
    ModuleDirectory = 2,
    /// Module name strings
    ModuleNames = 3,
    /// Module resource data
    ModuleData = 4,
    /// The block table itself
    BlockTable = 6,
}

impl BlockType {
    /// Convert from raw u16 value
    ///
    /// Code 5 has never been observed and is rejected with the other
    /// unknown codes.
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Unused),
            1 => Some(Self::ModuleTable),
            2 => Some(Self::ModuleDirectory),
            3 => Some(Self::ModuleNames),
            4 => Some(Self::ModuleData),
            6 => Some(Self::BlockTable),
            _ => None,
        }
    }

    /// Raw type code as stored in the block table
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unused => "Unused",
            Self::ModuleTable => "ModuleTable",
            Self::ModuleDirectory => "ModuleDirectory",
            Self::ModuleNames => "ModuleNames",
            Self::ModuleData => "ModuleData",
            Self::BlockTable => "BlockTable",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw 14-byte block table record
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BlockRecord {
    /// Block type code
    pub block_type: u16,
    /// Offset of the block in the file
    pub start: u32,
    /// Block size in bytes
    pub size: u32,
    /// Unused bytes at the end of the block
    pub unused: u32,
}

/// A validated block of a dictionary file
///
/// Only constructed through [`Block::from_record`]; it serializes for
/// reporting but does not deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    number: u32,
    block_type: BlockType,
    start: u32,
    size: u32,
    unused: u32,
}

impl Block {
    /// Validate a raw record and turn it into a block
    ///
    /// `number` is the 1-based position of the record in the block table.
    pub fn from_record(number: u32, record: BlockRecord, file_length: u64) -> Result<Self> {
        let block_type =
            BlockType::from_code(record.block_type).ok_or(DictionaryError::UnknownBlockType {
                block: number,
                code: record.block_type,
            })?;

        let out_of_range = |field, value, limit| DictionaryError::BlockOutOfRange {
            block: number,
            field,
            value,
            limit,
        };

        let start = u64::from(record.start);
        let size = u64::from(record.size);
        let unused = u64::from(record.unused);

        if start > file_length {
            return Err(out_of_range("start", start, file_length));
        }
        if start + size > file_length {
            return Err(out_of_range("start + size", start + size, file_length));
        }
        if unused > size {
            return Err(out_of_range("unused", unused, size));
        }
        if unused > file_length {
            return Err(out_of_range("unused", unused, file_length));
        }

        Ok(Self {
            number,
            block_type,
            start: record.start,
            size: record.size,
            unused: record.unused,
        })
    }

    /// 1-based block number
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Block type
    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Offset in the file where this block begins
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Block size in bytes
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Unused space in bytes
    pub const fn unused(&self) -> u32 {
        self.unused
    }

    /// Used space in bytes
    pub const fn used(&self) -> u32 {
        self.size - self.unused
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use proptest::prelude::*;

    fn record(block_type: u16, start: u32, size: u32, unused: u32) -> BlockRecord {
        BlockRecord {
            block_type,
            start,
            size,
            unused,
        }
    }

    #[test]
    fn test_record_parsing() {
        let data = [
            0x03, 0x00, // type
            0x10, 0x00, 0x00, 0x00, // start
            0x00, 0x01, 0x00, 0x00, // size
            0x20, 0x00, 0x00, 0x00, // unused
        ];

        let parsed = BlockRecord::read(&mut Cursor::new(&data)).expect("parse record");
        assert_eq!(parsed, record(3, 0x10, 0x100, 0x20));
    }

    #[test]
    fn test_block_type_codes() {
        for code in [0u16, 1, 2, 3, 4, 6] {
            let block_type = BlockType::from_code(code).expect("known code");
            assert_eq!(block_type.code(), code);
        }
        assert_eq!(BlockType::from_code(5), None);
        assert_eq!(BlockType::from_code(7), None);
        assert_eq!(BlockType::ModuleNames.to_string(), "ModuleNames");
    }

    #[test]
    fn test_valid_block() {
        let block = Block::from_record(4, record(4, 100, 50, 10), 200).expect("valid block");
        assert_eq!(block.number(), 4);
        assert_eq!(block.block_type(), BlockType::ModuleData);
        assert_eq!(block.start(), 100);
        assert_eq!(block.size(), 50);
        assert_eq!(block.unused(), 10);
        assert_eq!(block.used(), 40);
    }

    #[test]
    fn test_block_serializes_validated_fields() {
        let block = Block::from_record(2, record(3, 60, 40, 4), 200).expect("valid block");
        let value = serde_json::to_value(block).expect("serialize block");
        assert_eq!(
            value,
            serde_json::json!({
                "number": 2,
                "block_type": "ModuleNames",
                "start": 60,
                "size": 40,
                "unused": 4,
            })
        );
    }

    #[test]
    fn test_block_ending_at_file_end() {
        assert!(Block::from_record(1, record(1, 150, 50, 50), 200).is_ok());
        assert!(Block::from_record(1, record(0, 200, 0, 0), 200).is_ok());
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            Block::from_record(7, record(5, 0, 0, 0), 100),
            Err(DictionaryError::UnknownBlockType { block: 7, code: 5 })
        ));
    }

    #[test]
    fn test_bounds_violations() {
        assert!(matches!(
            Block::from_record(2, record(1, 201, 0, 0), 200),
            Err(DictionaryError::BlockOutOfRange {
                block: 2,
                field: "start",
                ..
            })
        ));
        assert!(matches!(
            Block::from_record(3, record(1, 150, 51, 0), 200),
            Err(DictionaryError::BlockOutOfRange {
                block: 3,
                field: "start + size",
                value: 201,
                limit: 200
            })
        ));
        assert!(matches!(
            Block::from_record(9, record(1, 0, 10, 11), 200),
            Err(DictionaryError::BlockOutOfRange {
                block: 9,
                field: "unused",
                value: 11,
                limit: 10
            })
        ));
    }

    #[test]
    fn test_start_plus_size_does_not_wrap() {
        let result = Block::from_record(1, record(1, u32::MAX, u32::MAX, 0), u64::from(u32::MAX));
        assert!(matches!(
            result,
            Err(DictionaryError::BlockOutOfRange {
                field: "start + size",
                ..
            })
        ));
    }

    proptest! {
        /// Accepted blocks always satisfy the bounds and report used = size - unused
        #[test]
        fn block_bounds_hold(
            code in 0u16..8,
            start in 0u32..2000,
            size in 0u32..2000,
            unused in 0u32..2000,
            file_length in 0u64..4000,
        ) {
            match Block::from_record(1, record(code, start, size, unused), file_length) {
                Ok(block) => {
                    prop_assert!(BlockType::from_code(code).is_some());
                    prop_assert!(u64::from(block.start()) + u64::from(block.size()) <= file_length);
                    prop_assert!(block.unused() <= block.size());
                    prop_assert_eq!(block.used(), size - unused);
                }
                Err(DictionaryError::UnknownBlockType { block, code: bad }) => {
                    prop_assert_eq!(block, 1);
                    prop_assert!(BlockType::from_code(bad).is_none());
                }
                Err(DictionaryError::BlockOutOfRange { .. }) => {
                    prop_assert!(
                        u64::from(start) + u64::from(size) > file_length || unused > size
                    );
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
