#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_model::{Block, Document};
use core_state::{EditorState, Point, Selection};

/// Document of unstyled blocks from `(key, text)` pairs.
pub fn doc(blocks: &[(&str, &str)]) -> Document {
    Document::from_blocks(blocks.iter().map(|(k, t)| Block::unstyled(*k, *t))).unwrap()
}

/// State over `blocks` with a range selection from `anchor` to `focus`.
pub fn state_range(blocks: &[(&str, &str)], anchor: (&str, usize), focus: (&str, usize)) -> EditorState {
    let document = doc(blocks);
    let selection = Selection::new(
        &document,
        Point::new(anchor.0, anchor.1),
        Point::new(focus.0, focus.1),
    );
    EditorState::with_selection(document, selection).unwrap()
}

/// State over `blocks` with a caret at `key`/`offset`.
pub fn state_caret(blocks: &[(&str, &str)], key: &str, offset: usize) -> EditorState {
    EditorState::with_selection(doc(blocks), Selection::collapsed(key, offset)).unwrap()
}

pub fn texts(state: &EditorState) -> Vec<&str> {
    state.document().iter().map(|b| b.text()).collect()
}

/// (anchor offset, focus offset)
pub fn offsets(state: &EditorState) -> (usize, usize) {
    let s = state.selection();
    (s.anchor_offset(), s.focus_offset())
}

/// Both selection keys resolve in the state's document.
pub fn keys_resolve(state: &EditorState) -> bool {
    let s = state.selection();
    state.document().contains(s.anchor_key()) && state.document().contains(s.focus_key())
}
