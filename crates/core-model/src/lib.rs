//! Block document model: blocks, documents and block range extraction.
//!
//! A `Document` is an ordered, non-empty sequence of immutable `Block`s with
//! unique keys. Blocks are stored behind `Arc` so a transform that rewrites a
//! handful of blocks shares every untouched block with the previous snapshot.
//! Nothing here mutates in place: every "edit" constructs a new `Block` (same
//! key) or a new `Document` (new sequence).
//!
//! Core invariants (must hold for every constructed `Document`):
//! * At least one block.
//! * Keys are unique across the whole sequence.
//! * The key index always agrees with block positions.
//!
//! Offsets used against block text are character indices (see `core-text`).
//!
//! Module map:
//! * `block`    - `Block`, `BlockKey`, `BlockType`, `BlockData`
//! * `document` - `Document` and its key index
//! * `range`    - start..=end block extraction by key
//! * `style`    - block style class derivation from block data
//! * `raw`      - serde form used for fixtures and persistence

mod block;
mod document;
pub mod range;
pub mod raw;
pub mod style;

pub use block::{Block, BlockData, BlockKey, BlockType};
pub use document::Document;
pub use range::{block_keys_between, blocks_between};
pub use raw::{RawBlock, RawDocument};

/// Errors raised while constructing a document.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("document must contain at least one block")]
    Empty,
    #[error("duplicate block key `{0}`")]
    DuplicateKey(BlockKey),
    #[error("invalid raw document: {0}")]
    Raw(#[from] serde_json::Error),
}
