//! Indent / outdent of the current selection.
//!
//! Indent classifies the selection shape:
//! * caret            - insert a literal tab at the caret;
//! * single-block range - replace the selected span with a one-block fragment
//!   whose text is the tab (plus the captured selected text when the range
//!   starts at column 0);
//! * multi-block range - prefix every block between start and end with a tab
//!   and push the whole sequence.
//!
//! Outdent has one path for every shape: strip one leading tab from each
//! block in range that has one, push, then recede the selection.
//!
//! Range shapes finish by installing the adjusted selection through the
//! engine's accept-selection primitive (see `adjust`). Blocks outside the range
//! are passed through as the same shared handles.

use crate::adjust::{merge_indent_selection, merge_outdent_selection};
use core_model::{Block, BlockKey, block_keys_between};
use core_state::{ChangeType, DocumentEngine, EditorState, EngineError, Selection};
use core_text::INDENT;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Direction of an indentation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentDirection {
    Increase,
    Decrease,
}

/// Indent or outdent depending on `direction`.
pub fn adjust_indent<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
    direction: IndentDirection,
) -> Result<EditorState, EngineError> {
    match direction {
        IndentDirection::Increase => indent_selection(engine, state),
        IndentDirection::Decrease => outdent_selection(engine, state),
    }
}

/// Indent the current selection by one tab.
pub fn indent_selection<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
) -> Result<EditorState, EngineError> {
    let selection = state.selection();

    if selection.is_collapsed() {
        debug!(target: "actions.indent", shape = "caret", key = %selection.focus_key(), offset = selection.focus_offset(), "indent");
        let mut tab = [0u8; 4];
        return engine.insert_text(state, selection, INDENT.encode_utf8(&mut tab));
    }

    if selection.spans_single_block() {
        return indent_block(engine, state, selection);
    }

    let keys = block_keys_between(
        state.document(),
        selection.start_key(),
        selection.end_key(),
    );
    debug!(target: "actions.indent", shape = "range", blocks = keys.len(), backward = selection.is_backward(), "indent");
    indent_blocks_for_keys(engine, state, selection, &keys)
}

fn indent_block<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
    selection: &Selection,
) -> Result<EditorState, EngineError> {
    let key = selection.start_key();
    let block = state
        .document()
        .block(key)
        .ok_or_else(|| EngineError::UnknownBlock(key.clone()))?;
    // Only the selected span is carried into the fragment; the engine keeps
    // the block text around the span.
    let captured =
        core_text::slice_chars(block.text(), selection.start_offset(), selection.end_offset());
    let text = if selection.start_offset() != 0 {
        INDENT.to_string()
    } else {
        core_text::indented(captured)
    };
    debug!(target: "actions.indent", shape = "single_block", key = %key, start = selection.start_offset(), end = selection.end_offset(), "indent");

    let replaced =
        engine.replace_selection_with_blocks(state, selection, vec![block.with_text(text)])?;
    engine.accept_selection(&replaced, merge_indent_selection(selection))
}

fn indent_blocks_for_keys<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
    selection: &Selection,
    keys: &[BlockKey],
) -> Result<EditorState, EngineError> {
    let blocks = rewrite_blocks(state, keys, |block| {
        Some(block.with_text(core_text::indented(block.text())))
    });
    let pushed = engine.push_blocks(state, blocks, ChangeType::AdjustIndent)?;
    engine.accept_selection(&pushed, merge_indent_selection(selection))
}

/// Remove one leading tab from every block in the selection's range.
///
/// Blocks without a leading tab are left as they are, but the selection still
/// recedes by one on both ends.
pub fn outdent_selection<E: DocumentEngine + ?Sized>(
    engine: &E,
    state: &EditorState,
) -> Result<EditorState, EngineError> {
    let selection = state.selection();
    let keys = block_keys_between(
        state.document(),
        selection.start_key(),
        selection.end_key(),
    );
    let mut stripped = 0usize;
    let blocks = rewrite_blocks(state, &keys, |block| {
        let rest = core_text::strip_indent(block.text())?;
        stripped += 1;
        Some(block.with_text(rest))
    });
    debug!(target: "actions.indent", shape = "outdent", blocks = keys.len(), stripped, "outdent");

    let pushed = engine.push_blocks(state, blocks, ChangeType::AdjustIndent)?;
    engine.accept_selection(&pushed, merge_outdent_selection(selection))
}

/// Map every block of the document; blocks in `keys` go through `rewrite`
/// (`None` keeps the block), all others are passed through unchanged.
fn rewrite_blocks<F>(state: &EditorState, keys: &[BlockKey], mut rewrite: F) -> Vec<Arc<Block>>
where
    F: FnMut(&Block) -> Option<Block>,
{
    let in_range: HashSet<&BlockKey> = keys.iter().collect();
    state
        .document()
        .iter()
        .map(|block| {
            if in_range.contains(block.key())
                && let Some(next) = rewrite(block)
            {
                Arc::new(next)
            } else {
                Arc::clone(block)
            }
        })
        .collect()
}
