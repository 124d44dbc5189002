//! Document engine contract and the reference snapshot engine.
//!
//! The editing core never builds documents itself beyond cloning single blocks
//! with new text; every structural change goes through a `DocumentEngine`
//! primitive. Primitives are total over well-formed input (selection keys
//! present, offsets in range) and report violations as `EngineError`.
//!
//! `SnapshotEngine` implements the contract over the value-type model in
//! `core-model`: each primitive allocates a new block sequence, shares every
//! untouched block handle, and records the previous state in history.

use crate::{ChangeType, EditorState, EngineError, Point, Selection};
use core_model::{Block, BlockData, BlockKey, Document, blocks_between};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

pub trait DocumentEngine {
    /// Replace the span covered by `selection` with an ordered block fragment.
    fn replace_selection_with_blocks(
        &self,
        state: &EditorState,
        selection: &Selection,
        fragment: Vec<Block>,
    ) -> Result<EditorState, EngineError>;

    /// Replace the whole block sequence, recorded as one undoable change.
    fn push_blocks(
        &self,
        state: &EditorState,
        blocks: Vec<Arc<Block>>,
        change: ChangeType,
    ) -> Result<EditorState, EngineError>;

    /// Split the block holding a collapsed caret into two blocks at the caret.
    fn split_block_at_selection(&self, state: &EditorState) -> Result<EditorState, EngineError>;

    /// Merge `data` into the metadata of every block touched by the selection.
    fn merge_block_data_at_selection(
        &self,
        state: &EditorState,
        data: &BlockData,
    ) -> Result<EditorState, EngineError>;

    /// Replace the metadata of every block touched by the selection.
    fn set_block_data_at_selection(
        &self,
        state: &EditorState,
        data: &BlockData,
    ) -> Result<EditorState, EngineError>;

    /// Replace the span covered by `selection` with plain `text`.
    fn insert_text(
        &self,
        state: &EditorState,
        selection: &Selection,
        text: &str,
    ) -> Result<EditorState, EngineError>;

    /// Install `selection` without touching content. Keys must exist; offsets
    /// are taken as given.
    fn accept_selection(
        &self,
        state: &EditorState,
        selection: Selection,
    ) -> Result<EditorState, EngineError>;
}

/// Reference engine over `Arc`-shared block snapshots.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotEngine;

impl SnapshotEngine {
    pub fn new() -> Self {
        Self
    }

    /// Restore the previous snapshot. `None` when history is empty.
    pub fn undo(&self, state: &EditorState) -> Option<EditorState> {
        let mut history = state.history.clone();
        let snap = history.undo(state.snapshot(ChangeType::InsertCharacters))?;
        Some(EditorState {
            document: snap.document,
            selection: snap.selection,
            history,
            last_change: None,
        })
    }

    /// Re-apply the most recently undone snapshot. `None` when nothing to redo.
    pub fn redo(&self, state: &EditorState) -> Option<EditorState> {
        let mut history = state.history.clone();
        let snap = history.redo(state.snapshot(ChangeType::InsertCharacters))?;
        Some(EditorState {
            document: snap.document,
            selection: snap.selection,
            history,
            last_change: None,
        })
    }
}

pub(crate) fn check_keys(document: &Document, selection: &Selection) -> Result<(), EngineError> {
    for key in [selection.anchor_key(), selection.focus_key()] {
        if !document.contains(key) {
            return Err(EngineError::UnknownBlock(key.clone()));
        }
    }
    Ok(())
}

fn check_point(document: &Document, point: &Point) -> Result<Arc<Block>, EngineError> {
    let block = document
        .block(&point.key)
        .ok_or_else(|| EngineError::UnknownBlock(point.key.clone()))?;
    let len = block.char_len();
    if point.offset > len {
        return Err(EngineError::OffsetOutOfBounds {
            key: point.key.clone(),
            offset: point.offset,
            len,
        });
    }
    Ok(Arc::clone(block))
}

/// Keys unused by `document` and by each other, one per call of `next`.
struct FreshKeys {
    taken: HashSet<BlockKey>,
    n: usize,
}

impl FreshKeys {
    fn new(document: &Document) -> Self {
        Self {
            taken: document.keys().cloned().collect(),
            n: document.len(),
        }
    }

    fn next(&mut self) -> BlockKey {
        loop {
            let candidate = BlockKey::new(format!("b{:x}", self.n));
            self.n += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Rebuild `document` with blocks `[start, end]` (by position) replaced by
/// `replacement`.
fn rebuild(
    document: &Document,
    start: usize,
    end: usize,
    replacement: Vec<Arc<Block>>,
) -> Result<Document, EngineError> {
    let blocks = document.blocks();
    let mut out = Vec::with_capacity(blocks.len() - (end - start + 1) + replacement.len());
    out.extend(blocks[..start].iter().cloned());
    out.extend(replacement);
    out.extend(blocks[end + 1..].iter().cloned());
    Ok(Document::from_shared(out)?)
}

/// Shared splice used by fragment replacement and text insertion: returns the
/// new document and the caret after the inserted content.
fn splice_fragment(
    document: &Document,
    selection: &Selection,
    fragment: Vec<Block>,
) -> Result<(Document, Selection), EngineError> {
    if fragment.is_empty() {
        return Err(EngineError::EmptyFragment);
    }
    let start_block = check_point(document, selection.start())?;
    let end_block = check_point(document, selection.end())?;
    let (Some(start_pos), Some(end_pos)) = (
        document.position(selection.start_key()),
        document.position(selection.end_key()),
    ) else {
        return Err(EngineError::UnknownBlock(selection.start_key().clone()));
    };
    let same_block = end_pos == start_pos;
    if end_pos < start_pos || (same_block && selection.end_offset() < selection.start_offset()) {
        return Err(EngineError::ReversedSelection);
    }
    let (head, _) = core_text::split_at_char(start_block.text(), selection.start_offset());
    let (_, tail) = core_text::split_at_char(end_block.text(), selection.end_offset());

    let last_idx = fragment.len() - 1;
    let mut fresh = FreshKeys::new(document);
    let mut replacement = Vec::with_capacity(fragment.len());
    let mut caret = Point::new(start_block.key().clone(), 0);
    for (i, piece) in fragment.into_iter().enumerate() {
        let mut text = String::new();
        if i == 0 {
            text.push_str(head);
        }
        text.push_str(piece.text());
        let caret_offset = core_text::char_len(&text);
        if i == last_idx {
            text.push_str(tail);
        }
        let block = if i == 0 {
            // The first piece lands inside the existing start block.
            start_block.with_text(text)
        } else {
            let key = fresh.next();
            piece.with_key(key).with_text(text)
        };
        if i == last_idx {
            caret = Point::new(block.key().clone(), caret_offset);
        }
        replacement.push(Arc::new(block));
    }
    let next = rebuild(document, start_pos, end_pos, replacement)?;
    Ok((next, Selection::from_parts(caret.clone(), caret, false)))
}

fn map_selected_blocks<F>(state: &EditorState, mut f: F) -> Result<Document, EngineError>
where
    F: FnMut(&Block) -> Block,
{
    let document = state.document();
    let selection = state.selection();
    check_keys(document, selection)?;
    let touched: HashSet<&BlockKey> =
        blocks_between(document, selection.start_key(), selection.end_key())
            .into_iter()
            .map(|b| b.key())
            .collect();
    let blocks = document
        .iter()
        .map(|b| {
            if touched.contains(b.key()) {
                Arc::new(f(b))
            } else {
                Arc::clone(b)
            }
        })
        .collect();
    Ok(Document::from_shared(blocks)?)
}

impl DocumentEngine for SnapshotEngine {
    fn replace_selection_with_blocks(
        &self,
        state: &EditorState,
        selection: &Selection,
        fragment: Vec<Block>,
    ) -> Result<EditorState, EngineError> {
        let pieces = fragment.len();
        let (document, after) = splice_fragment(state.document(), selection, fragment)?;
        trace!(target: "state.engine", op = "replace_with_fragment", pieces, start_key = %selection.start_key(), start = selection.start_offset(), end_key = %selection.end_key(), end = selection.end_offset(), "primitive");
        Ok(state.push(document, after, ChangeType::InsertFragment))
    }

    fn push_blocks(
        &self,
        state: &EditorState,
        blocks: Vec<Arc<Block>>,
        change: ChangeType,
    ) -> Result<EditorState, EngineError> {
        let document = Document::from_shared(blocks)?;
        // Keep the current selection when it still resolves; otherwise fall
        // back to the start of the new document.
        let after = if state.selection().is_valid_in(&document) {
            state.selection().clone()
        } else {
            Selection::collapsed(document.first().key().clone(), 0)
        };
        trace!(target: "state.engine", op = "push_blocks", blocks = document.len(), change = change.as_str(), "primitive");
        Ok(state.push(document, after, change))
    }

    fn split_block_at_selection(&self, state: &EditorState) -> Result<EditorState, EngineError> {
        let selection = state.selection();
        if !selection.is_collapsed() {
            return Err(EngineError::NotCollapsed);
        }
        let document = state.document();
        let block = check_point(document, selection.focus())?;
        let Some(pos) = document.position(block.key()) else {
            return Err(EngineError::UnknownBlock(block.key().clone()));
        };
        let (upper_text, lower_text) = core_text::split_at_char(block.text(), selection.focus_offset());
        let lower_key = document.fresh_key();
        let upper = block.with_text(upper_text);
        let lower = Block::new(lower_key.clone(), block.block_type().clone(), lower_text);
        let next = rebuild(document, pos, pos, vec![Arc::new(upper), Arc::new(lower)])?;
        trace!(target: "state.engine", op = "split_block", key = %block.key(), offset = selection.focus_offset(), new_key = %lower_key, "primitive");
        Ok(state.push(next, Selection::collapsed(lower_key, 0), ChangeType::SplitBlock))
    }

    fn merge_block_data_at_selection(
        &self,
        state: &EditorState,
        data: &BlockData,
    ) -> Result<EditorState, EngineError> {
        let next = map_selected_blocks(state, |b| b.with_replaced_data(b.data().merged(data)))?;
        trace!(target: "state.engine", op = "merge_block_data", entries = data.len(), "primitive");
        Ok(state.push(next, state.selection().clone(), ChangeType::ChangeBlockData))
    }

    fn set_block_data_at_selection(
        &self,
        state: &EditorState,
        data: &BlockData,
    ) -> Result<EditorState, EngineError> {
        let next = map_selected_blocks(state, |b| b.with_replaced_data(data.clone()))?;
        trace!(target: "state.engine", op = "set_block_data", entries = data.len(), "primitive");
        Ok(state.push(next, state.selection().clone(), ChangeType::ChangeBlockData))
    }

    fn insert_text(
        &self,
        state: &EditorState,
        selection: &Selection,
        text: &str,
    ) -> Result<EditorState, EngineError> {
        let start = state
            .document()
            .block(selection.start_key())
            .ok_or_else(|| EngineError::UnknownBlock(selection.start_key().clone()))?;
        let piece = start.with_text(text);
        let (document, after) = splice_fragment(state.document(), selection, vec![piece])?;
        trace!(target: "state.engine", op = "insert_text", key = %selection.start_key(), offset = selection.start_offset(), chars = core_text::char_len(text), "primitive");
        Ok(state.push(document, after, ChangeType::InsertCharacters))
    }

    fn accept_selection(
        &self,
        state: &EditorState,
        selection: Selection,
    ) -> Result<EditorState, EngineError> {
        check_keys(state.document(), &selection)?;
        trace!(target: "state.engine", op = "accept_selection", anchor_key = %selection.anchor_key(), anchor = selection.anchor_offset(), focus_key = %selection.focus_key(), focus = selection.focus_offset(), "primitive");
        Ok(state.select(selection))
    }
}
