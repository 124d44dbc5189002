//! Split a block at the caret while keeping its metadata on both halves.

use core_state::{DocumentEngine, EditorState, EngineError};
use tracing::debug;

/// Split the caret block and copy its data onto the new block.
///
/// The input state is returned as is (same document handle) when the
/// selection is a range or the caret block carries no data, so the host can
/// fall back to a plain split. Split and data merge coalesce into a single
/// undo entry.
pub fn merge_block_data_on_split<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
) -> Result<EditorState, EngineError> {
    let selection = state.selection();
    if !selection.is_collapsed() {
        debug!(target: "actions.split", reason = "range", "skip");
        return Ok(state.clone());
    }
    let key = selection.start_key();
    let block = state
        .document()
        .block(key)
        .ok_or_else(|| EngineError::UnknownBlock(key.clone()))?;
    if block.data().is_empty() {
        debug!(target: "actions.split", reason = "no_data", key = %key, "skip");
        return Ok(state.clone());
    }

    let data = block.data().clone();
    let split = engine.split_block_at_selection(state)?;
    debug!(target: "actions.split", key = %key, offset = selection.start_offset(), entries = data.len(), "merge_on_split");
    engine.merge_block_data_at_selection(&split, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{Block, BlockData, Document};
    use core_state::{Point, Selection, SnapshotEngine};

    #[test]
    fn range_selection_is_untouched() {
        let doc = Document::from_blocks([
            Block::unstyled("a", "hello").with_data(BlockData::new().with("textAlign", "left"))
        ])
        .unwrap();
        let sel = Selection::new(&doc, Point::new("a", 1), Point::new("a", 3));
        let state = EditorState::with_selection(doc, sel).unwrap();
        let out = merge_block_data_on_split(&SnapshotEngine, &state).unwrap();
        assert!(out.same_snapshot(&state));
        assert_eq!(out.undo_depth(), 0);
    }

    #[test]
    fn data_lands_on_both_halves() {
        let data = BlockData::new().with("textAlign", "center");
        let doc =
            Document::from_blocks([Block::unstyled("a", "abcd").with_data(data.clone())]).unwrap();
        let state = EditorState::with_selection(doc, Selection::collapsed("a", 2)).unwrap();
        let out = merge_block_data_on_split(&SnapshotEngine, &state).unwrap();
        let blocks = out.document().blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].data(), &data);
        assert_eq!(blocks[1].data(), &data);
    }
}
