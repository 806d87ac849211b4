//! Text rendering of decoded dictionaries

use dexterity_dictionary::{Block, Dictionary, DictionarySummary};
use std::fmt::Write;

/// Render the header section
pub fn format_header(summary: &DictionarySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Extrapolated info from header:");
    let _ = writeln!(out, "File size: {}", summary.header_file_size);
    let _ = writeln!(out, "Block table offset: {}", summary.block_table_offset);
    let _ = writeln!(out, "Block table length: {}", summary.block_table_length);
    let _ = writeln!(out, "Unallocated block count: {}", summary.unallocated_blocks);
    out
}

/// Render one block line
pub fn format_block(block: &Block) -> String {
    format!(
        "Block {}: Type={}/{}, Start={}, Size={}, Unused={}, Used={}",
        block.number(),
        block.block_type(),
        block.block_type().code(),
        block.start(),
        block.size(),
        block.unused(),
        block.used()
    )
}

/// Render the block section, limited to the first `limit` blocks
pub fn format_blocks(dictionary: &Dictionary, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Blocks array contains {} item(s).",
        dictionary.blocks().len()
    );
    for block in dictionary.blocks().iter().take(limit) {
        let _ = writeln!(out, "{}", format_block(block));
    }
    out
}

/// Render the module counts section
pub fn format_modules(summary: &DictionarySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Modules array contains {} item(s).",
        summary.total_modules
    );
    let _ = writeln!(
        out,
        "Module table says there are {} used module(s), {} unused module(s), and {} total.",
        summary.used_modules, summary.unused_modules, summary.total_modules
    );
    let _ = writeln!(
        out,
        "{:.2}% of the modules are type 1.",
        summary.standard_module_ratio * 100.0
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn summary() -> DictionarySummary {
        DictionarySummary {
            path: PathBuf::from("/tmp/Dynamics.dic"),
            header_file_size: 4096,
            block_table_offset: 26,
            block_table_length: 12,
            unallocated_blocks: 2,
            block_count: 12,
            used_modules: 3,
            unused_modules: 1,
            total_modules: 4,
            standard_module_ratio: 0.75,
        }
    }

    #[test]
    fn test_format_header() {
        let text = format_header(&summary());
        assert!(text.contains("File size: 4096"));
        assert!(text.contains("Block table offset: 26"));
        assert!(text.contains("Block table length: 12"));
        assert!(text.contains("Unallocated block count: 2"));
    }

    #[test]
    fn test_format_modules() {
        let text = format_modules(&summary());
        assert!(text.contains("3 used module(s), 1 unused module(s), and 4 total."));
        assert!(text.contains("75.00% of the modules are type 1."));
    }
}
