//! Fixed layout conventions of dictionary files

use crate::error::{DictionaryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Magic bytes at the start of every dictionary file (`%VTL`)
pub const DICTIONARY_SIGNATURE: [u8; 4] = [0x25, 0x56, 0x54, 0x4C];

/// Size of the file header in bytes
pub const HEADER_SIZE: u64 = 0x1A;

/// Size of one block table record in bytes
pub const BLOCK_RECORD_SIZE: u64 = 14;

/// Size of the module table header in bytes
pub const MODULE_TABLE_HEADER_SIZE: u64 = 8;

/// Size of one module table record in bytes
pub const MODULE_RECORD_SIZE: u64 = 0x10;

/// Block numbers and file naming rules used while decoding
///
/// Dictionaries always keep the module table in block 1 and module names in
/// block 2. These are conventions of the format rather than something the
/// block table declares, so they are carried here and handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryLayout {
    /// Block number holding the module table
    pub module_table_block: u32,

    /// Block number holding the module names
    pub module_names_block: u32,

    /// Accepted file extensions, lowercase and without the dot
    pub extensions: Vec<String>,
}

impl Default for DictionaryLayout {
    fn default() -> Self {
        Self {
            module_table_block: 1,
            module_names_block: 2,
            extensions: vec!["dic".to_string(), "cnk".to_string()],
        }
    }
}

impl DictionaryLayout {
    /// Create the standard layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module table block number
    #[must_use]
    pub const fn with_module_table_block(mut self, number: u32) -> Self {
        self.module_table_block = number;
        self
    }

    /// Set the module names block number
    #[must_use]
    pub const fn with_module_names_block(mut self, number: u32) -> Self {
        self.module_names_block = number;
        self
    }

    /// Replace the accepted file extensions
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Check that the layout can be used for decoding
    pub fn validate(&self) -> Result<()> {
        if self.module_table_block == 0 || self.module_names_block == 0 {
            return Err(DictionaryError::InvalidLayout(
                "block numbers start at 1".to_string(),
            ));
        }

        if self.module_table_block == self.module_names_block {
            return Err(DictionaryError::InvalidLayout(format!(
                "module table and module names share block {}",
                self.module_table_block
            )));
        }

        if self.extensions.is_empty() {
            return Err(DictionaryError::InvalidLayout(
                "no file extensions accepted".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the path carries one of the accepted extensions (case-insensitive)
    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}
