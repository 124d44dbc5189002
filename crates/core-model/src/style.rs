//! Block style class derivation.
//!
//! Hosts decorate rendered blocks with a CSS-like class derived from block
//! data, e.g. `textAlign = "right"` becomes `align-right`. Only non-empty
//! string values produce a class.

use crate::Block;

/// Data key holding block text alignment.
pub const TEXT_ALIGN_KEY: &str = "textAlign";
/// Class prefix applied to the alignment value.
pub const ALIGN_CLASS_PREFIX: &str = "align-";

/// Style class for `block`, read from `data_key` and prefixed with `prefix`.
pub fn block_style_class(block: &Block, data_key: &str, prefix: &str) -> Option<String> {
    block
        .data()
        .get_str(data_key)
        .filter(|v| !v.is_empty())
        .map(|v| format!("{prefix}{v}"))
}

/// `block_style_class` with the default alignment key and prefix.
pub fn alignment_class(block: &Block) -> Option<String> {
    block_style_class(block, TEXT_ALIGN_KEY, ALIGN_CLASS_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockData;

    #[test]
    fn alignment_value_becomes_class() {
        let b = Block::unstyled("k", "x").with_data(BlockData::new().with("textAlign", "right"));
        assert_eq!(alignment_class(&b).as_deref(), Some("align-right"));
    }

    #[test]
    fn missing_empty_or_non_string_values_yield_none() {
        assert_eq!(alignment_class(&Block::unstyled("k", "x")), None);
        let empty = Block::unstyled("k", "x").with_data(BlockData::new().with("textAlign", ""));
        assert_eq!(alignment_class(&empty), None);
        let number = Block::unstyled("k", "x").with_data(BlockData::new().with("textAlign", 3));
        assert_eq!(alignment_class(&number), None);
    }

    #[test]
    fn custom_key_and_prefix() {
        let b = Block::unstyled("k", "x").with_data(BlockData::new().with("tone", "muted"));
        assert_eq!(
            block_style_class(&b, "tone", "tone--").as_deref(),
            Some("tone--muted")
        );
    }
}
