use core_model::{BlockData, BlockKey};
use core_state::{DocumentEngine, EditorState, EngineError};
use tracing::debug;

/// Replace the data of every block touched by the selection.
pub fn set_block_data<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
    data: &BlockData,
) -> Result<EditorState, EngineError> {
    debug!(target: "actions.block_data", entries = data.len(), mode = "set", "block_data");
    engine.set_block_data_at_selection(state, data)
}

/// Merge `data` into the data of every block touched by the selection.
pub fn merge_block_data<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
    data: &BlockData,
) -> Result<EditorState, EngineError> {
    debug!(target: "actions.block_data", entries = data.len(), mode = "merge", "block_data");
    engine.merge_block_data_at_selection(state, data)
}

/// Data of the block with `key`, if present.
pub fn block_data_for_key<'a>(state: &'a EditorState, key: &BlockKey) -> Option<&'a BlockData> {
    state.document().block(key).map(|b| b.data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{Block, Document};
    use core_state::{Point, Selection, SnapshotEngine};

    fn state() -> EditorState {
        let doc = Document::from_blocks([
            Block::unstyled("a", "one").with_data(BlockData::new().with("depth", 2)),
            Block::unstyled("b", "two"),
        ])
        .unwrap();
        let sel = Selection::new(&doc, Point::new("a", 0), Point::new("a", 1));
        EditorState::with_selection(doc, sel).unwrap()
    }

    #[test]
    fn set_replaces_and_merge_keeps_existing_entries() {
        let align = BlockData::new().with("textAlign", "right");
        let key = BlockKey::from("a");

        let set = set_block_data(&SnapshotEngine, &state(), &align).unwrap();
        assert_eq!(block_data_for_key(&set, &key), Some(&align));

        let merged = merge_block_data(&SnapshotEngine, &state(), &align).unwrap();
        let data = block_data_for_key(&merged, &key).unwrap();
        assert_eq!(data.get_str("textAlign"), Some("right"));
        assert!(data.get("depth").is_some());

        assert!(block_data_for_key(&merged, &BlockKey::from("b")).unwrap().is_empty());
        assert!(block_data_for_key(&merged, &BlockKey::from("zz")).is_none());
    }
}
