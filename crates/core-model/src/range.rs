//! Block range extraction.
//!
//! `blocks_between` walks the document in order: skip until `start`, take
//! until `end`, then include `end` itself. Callers normalize the endpoints
//! (selection start/end) beforehand; when `end` sorts before `start` the walk
//! never meets it and the range runs to the end of the document, after which
//! `end` is appended. That mirrors the skip/take semantics and is undefined
//! territory for the editing core, which never passes reversed keys.

use crate::{Block, BlockKey, Document};
use std::sync::Arc;

/// Blocks from `start` through `end`, inclusive, in document order.
///
/// Unknown `start` yields an empty range.
pub fn blocks_between<'d>(
    document: &'d Document,
    start: &BlockKey,
    end: &BlockKey,
) -> Vec<&'d Arc<Block>> {
    let Some(from) = document.position(start) else {
        return Vec::new();
    };
    let mut out: Vec<&Arc<Block>> = document.blocks()[from..]
        .iter()
        .take_while(|b| b.key() != end)
        .collect();
    if let Some(last) = document.block(end) {
        out.push(last);
    }
    out
}

/// Keys of `blocks_between`.
pub fn block_keys_between(document: &Document, start: &BlockKey, end: &BlockKey) -> Vec<BlockKey> {
    blocks_between(document, start, end)
        .into_iter()
        .map(|b| b.key().clone())
        .collect()
}
