use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Stable, opaque identifier of a block within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BlockKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Block type tag. The enumeration is open: unknown tags survive a round trip
/// through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    Heading(u8),
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
    Atomic,
    Other(String),
}

const HEADINGS: [&str; 6] = [
    "header-one",
    "header-two",
    "header-three",
    "header-four",
    "header-five",
    "header-six",
];

impl BlockType {
    /// Heading of the given level, clamped to 1..=6.
    pub fn heading(level: u8) -> Self {
        BlockType::Heading(level.clamp(1, 6))
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Heading(level) => HEADINGS[usize::from((*level).clamp(1, 6) - 1)],
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::Atomic => "atomic",
            BlockType::Other(tag) => tag,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        if let Some(idx) = HEADINGS.iter().position(|h| *h == tag) {
            return BlockType::Heading(idx as u8 + 1);
        }
        match tag {
            "unstyled" | "paragraph" => BlockType::Unstyled,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "atomic" => BlockType::Atomic,
            other => BlockType::Other(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::from(tag.as_str())
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block-level metadata (text alignment, nesting depth, ...).
///
/// Ordered map so equality, debug output and serialization are deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockData(BTreeMap<String, Value>);

impl BlockData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: entries of `other` overwrite entries of `self`.
    pub fn merged(&self, other: &BlockData) -> BlockData {
        let mut out = self.0.clone();
        out.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        BlockData(out)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BlockData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        BlockData(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An immutable unit of document structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    key: BlockKey,
    block_type: BlockType,
    text: String,
    data: BlockData,
}

impl Block {
    pub fn new(key: impl Into<BlockKey>, block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            block_type,
            text: text.into(),
            data: BlockData::default(),
        }
    }

    /// Unstyled block, the common case in fixtures.
    pub fn unstyled(key: impl Into<BlockKey>, text: impl Into<String>) -> Self {
        Self::new(key, BlockType::Unstyled, text)
    }

    pub fn with_data(mut self, data: BlockData) -> Self {
        self.data = data;
        self
    }

    /// Clone of this block (same key, type and data) carrying `text`.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            key: self.key.clone(),
            block_type: self.block_type.clone(),
            text: text.into(),
            data: self.data.clone(),
        }
    }

    /// Clone of this block under a different key.
    pub fn with_key(&self, key: BlockKey) -> Self {
        Self {
            key,
            block_type: self.block_type.clone(),
            text: self.text.clone(),
            data: self.data.clone(),
        }
    }

    /// Clone of this block carrying `data`.
    pub fn with_replaced_data(&self, data: BlockData) -> Self {
        Self {
            key: self.key.clone(),
            block_type: self.block_type.clone(),
            text: self.text.clone(),
            data,
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }
    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn data(&self) -> &BlockData {
        &self.data
    }

    /// Text length in characters (the unit of selection offsets).
    pub fn char_len(&self) -> usize {
        core_text::char_len(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_type_tags_round_trip() {
        for tag in [
            "unstyled",
            "header-three",
            "unordered-list-item",
            "ordered-list-item",
            "blockquote",
            "code-block",
            "atomic",
            "x-custom",
        ] {
            assert_eq!(BlockType::from(tag).as_str(), tag);
        }
        assert_eq!(BlockType::from("header-six"), BlockType::Heading(6));
        assert_eq!(BlockType::from("paragraph"), BlockType::Unstyled);
        assert_eq!(BlockType::heading(9), BlockType::Heading(6));
    }

    #[test]
    fn with_text_keeps_identity_and_metadata() {
        let data = BlockData::new().with("textAlign", "right");
        let b = Block::new("k1", BlockType::heading(2), "old").with_data(data.clone());
        let c = b.with_text("new");
        assert_eq!(c.key(), b.key());
        assert_eq!(c.block_type(), &BlockType::Heading(2));
        assert_eq!(c.data(), &data);
        assert_eq!(c.text(), "new");
        assert_eq!(b.text(), "old");
    }

    #[test]
    fn data_merge_overwrites_right_biased() {
        let left = BlockData::new().with("textAlign", "left").with("depth", 1);
        let right = BlockData::new().with("textAlign", "center");
        let merged = left.merged(&right);
        assert_eq!(merged.get_str("textAlign"), Some("center"));
        assert_eq!(merged.get("depth"), Some(&json!(1)));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn char_len_is_in_characters() {
        assert_eq!(Block::unstyled("a", "naïve").char_len(), 5);
    }
}
