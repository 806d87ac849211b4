//! Dictionary file header parsing and validation

use crate::error::{DictionaryError, Result};
use crate::layout::{BLOCK_RECORD_SIZE, DICTIONARY_SIGNATURE, HEADER_SIZE};
use binrw::BinRead;
use std::io::{Read, Seek, SeekFrom};

/// Dictionary file header
///
/// The header is 26 bytes, all fields little-endian:
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0x00   | 4    | Signature `%VTL` |
/// | 0x04   | 4    | Reserved |
/// | 0x08   | 4    | File size as recorded by the writer |
/// | 0x0C   | 2    | Reserved |
/// | 0x0E   | 4    | Block table offset |
/// | 0x12   | 4    | Block table record count |
/// | 0x16   | 4    | Unallocated block count |
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DictionaryHeader {
    /// Magic signature, always `%VTL`
    pub signature: [u8; 4],

    /// File size recorded in the header (not checked against the real size)
    #[br(pad_before = 4)]
    pub file_size: u32,

    /// Offset of the block table from the start of the file
    #[br(pad_before = 2)]
    pub block_table_offset: u32,

    /// Number of records in the block table
    pub block_table_length: u32,

    /// Number of unallocated blocks in the block table
    pub unallocated_blocks: u32,
}

impl DictionaryHeader {
    /// Read and validate the header from the start of `reader`
    ///
    /// The signature is checked before any other field is decoded.
    pub fn read_validated<R: Read + Seek>(reader: &mut R, file_length: u64) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;

        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        if signature != DICTIONARY_SIGNATURE {
            return Err(DictionaryError::InvalidSignature(signature));
        }

        reader.seek(SeekFrom::Start(0))?;
        let header = Self::read(reader)?;
        header.validate(file_length)?;
        Ok(header)
    }

    /// Validate header fields against the actual file length
    pub fn validate(&self, file_length: u64) -> Result<()> {
        if self.signature != DICTIONARY_SIGNATURE {
            return Err(DictionaryError::InvalidSignature(self.signature));
        }

        if u64::from(self.block_table_offset) > file_length {
            return Err(DictionaryError::BlockTableOffsetOutOfRange {
                offset: self.block_table_offset,
                file_length,
            });
        }

        let available = file_length.saturating_sub(HEADER_SIZE);
        if self.block_table_bytes() > available {
            return Err(DictionaryError::BlockTableTooLarge {
                records: self.block_table_length,
                bytes: self.block_table_bytes(),
                available,
            });
        }

        if self.unallocated_blocks > self.block_table_length {
            return Err(DictionaryError::TooManyUnallocatedBlocks {
                unallocated: self.unallocated_blocks,
                length: self.block_table_length,
            });
        }

        Ok(())
    }

    /// Total size of the block table in bytes
    pub fn block_table_bytes(&self) -> u64 {
        u64::from(self.block_table_length) * BLOCK_RECORD_SIZE
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    fn header_bytes(offset: u32, length: u32, unallocated: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&DICTIONARY_SIGNATURE);
        data.extend_from_slice(&[0xAA; 4]); // reserved
        data.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        data.extend_from_slice(&[0xBB; 2]); // reserved
        data.extend_from_slice(&offset.to_le_bytes());
        data.extend_from_slice(&length.to_le_bytes());
        data.extend_from_slice(&unallocated.to_le_bytes());
        data
    }

    #[test]
    fn test_header_parsing() {
        let data = header_bytes(0x1A, 3, 1);
        assert_eq!(data.len() as u64, HEADER_SIZE);

        let header = DictionaryHeader::read(&mut Cursor::new(&data)).expect("parse header");
        assert_eq!(header.signature, DICTIONARY_SIGNATURE);
        assert_eq!(header.file_size, 0x1234_5678);
        assert_eq!(header.block_table_offset, 0x1A);
        assert_eq!(header.block_table_length, 3);
        assert_eq!(header.unallocated_blocks, 1);
        assert_eq!(header.block_table_bytes(), 42);
    }

    #[test]
    fn test_header_validation() {
        let header = DictionaryHeader::read(&mut Cursor::new(header_bytes(0x1A, 3, 0)))
            .expect("parse header");

        // 26 header bytes + 42 table bytes fit exactly
        assert!(header.validate(68).is_ok());
        assert!(matches!(
            header.validate(67),
            Err(DictionaryError::BlockTableTooLarge {
                records: 3,
                bytes: 42,
                available: 41
            })
        ));
    }

    #[test]
    fn test_offset_past_end() {
        let header = DictionaryHeader::read(&mut Cursor::new(header_bytes(500, 0, 0)))
            .expect("parse header");
        assert!(matches!(
            header.validate(100),
            Err(DictionaryError::BlockTableOffsetOutOfRange {
                offset: 500,
                file_length: 100
            })
        ));
    }

    #[test]
    fn test_unallocated_exceeds_length() {
        let header = DictionaryHeader::read(&mut Cursor::new(header_bytes(0x1A, 2, 3)))
            .expect("parse header");
        assert!(matches!(
            header.validate(1000),
            Err(DictionaryError::TooManyUnallocatedBlocks {
                unallocated: 3,
                length: 2
            })
        ));
    }

    #[test]
    fn test_huge_block_table_does_not_overflow() {
        let header = DictionaryHeader::read(&mut Cursor::new(header_bytes(0x1A, u32::MAX, 0)))
            .expect("parse header");
        assert!(matches!(
            header.validate(u64::from(u32::MAX)),
            Err(DictionaryError::BlockTableTooLarge { .. })
        ));
    }

    #[test]
    fn test_bad_signature_rejected_first() {
        // Everything after the signature is garbage that would also fail validation
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&[0xFF; 22]);

        let result = DictionaryHeader::read_validated(&mut Cursor::new(&data), 26);
        assert!(matches!(
            result,
            Err(DictionaryError::InvalidSignature([0, 0, 0, 0]))
        ));
    }

    #[test]
    fn test_read_validated_header_only() {
        let data = header_bytes(0x1A, 0, 0);
        let header =
            DictionaryHeader::read_validated(&mut Cursor::new(&data), 26).expect("valid header");
        assert_eq!(header.block_table_length, 0);

        let data = header_bytes(0x1A, 1, 0);
        assert!(matches!(
            DictionaryHeader::read_validated(&mut Cursor::new(&data), 26),
            Err(DictionaryError::BlockTableTooLarge { .. })
        ));
    }
}
