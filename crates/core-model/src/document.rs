use crate::{Block, BlockKey, ModelError};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, non-empty sequence of uniquely keyed blocks.
///
/// Cloning a `Document` clones the block *handles* only; block values are
/// shared. Equality compares block values in order.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Arc<Block>>,
    index: HashMap<BlockKey, usize>,
}

impl Document {
    /// Build a document from owned blocks.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Result<Self, ModelError> {
        Self::from_shared(blocks.into_iter().map(Arc::new).collect())
    }

    /// Build a document from shared block handles (used by transforms that
    /// keep untouched blocks as-is).
    pub fn from_shared(blocks: Vec<Arc<Block>>) -> Result<Self, ModelError> {
        if blocks.is_empty() {
            return Err(ModelError::Empty);
        }
        let mut index = HashMap::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            if index.insert(block.key().clone(), i).is_some() {
                return Err(ModelError::DuplicateKey(block.key().clone()));
            }
        }
        Ok(Self { blocks, index })
    }

    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Block>> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a constructed document; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, key: &BlockKey) -> Option<&Arc<Block>> {
        self.index.get(key).map(|&i| &self.blocks[i])
    }

    /// Position of `key` in document order.
    pub fn position(&self, key: &BlockKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &BlockKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn first(&self) -> &Arc<Block> {
        &self.blocks[0]
    }

    pub fn last(&self) -> &Arc<Block> {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Block keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &BlockKey> {
        self.blocks.iter().map(|b| b.key())
    }

    /// A key not used by any block of this document.
    ///
    /// Deterministic: probes `b<hex>` candidates starting at the block count,
    /// so the same document always yields the same fresh key.
    pub fn fresh_key(&self) -> BlockKey {
        let mut n = self.blocks.len();
        loop {
            let candidate = BlockKey::new(format!("b{n:x}"));
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Block texts joined with newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.blocks.len() == other.blocks.len()
            && self
                .blocks
                .iter()
                .zip(other.blocks.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(texts: &[(&str, &str)]) -> Document {
        Document::from_blocks(texts.iter().map(|(k, t)| Block::unstyled(*k, *t))).unwrap()
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(matches!(
            Document::from_blocks(Vec::new()),
            Err(ModelError::Empty)
        ));
        let err = Document::from_blocks([Block::unstyled("a", "x"), Block::unstyled("a", "y")])
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey(ref k) if k.as_str() == "a"));
        assert_eq!(err.to_string(), "duplicate block key `a`");
    }

    #[test]
    fn index_tracks_positions() {
        let d = doc(&[("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(d.position(&"b".into()), Some(1));
        assert_eq!(d.block(&"c".into()).map(|b| b.text()), Some("3"));
        assert!(!d.contains(&"z".into()));
        assert_eq!(d.first().key().as_str(), "a");
        assert_eq!(d.last().key().as_str(), "c");
        assert_eq!(d.plain_text(), "1\n2\n3");
    }

    #[test]
    fn fresh_key_skips_taken_candidates() {
        let d = doc(&[("b2", "x"), ("b3", "y")]);
        let key = d.fresh_key();
        assert!(!d.contains(&key));
        assert_eq!(key.as_str(), "b4");
        assert_eq!(doc(&[("a", "x")]).fresh_key().as_str(), "b1");
    }

    #[test]
    fn clones_share_blocks() {
        let d = doc(&[("a", "1")]);
        let e = d.clone();
        assert!(Arc::ptr_eq(d.first(), e.first()));
        assert_eq!(d, e);
    }
}
