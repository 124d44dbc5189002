//! Editor state: immutable document + selection snapshots, undo history and
//! the document engine contract.
//!
//! `EditorState` is a value. Every engine primitive takes a state by
//! reference and returns a new one; nothing in this crate mutates a state that
//! a caller can still observe. The host owns "current" state and feeds it back
//! in on the next command.
//!
//! Layout:
//! * `selection` - anchor/focus selection model and derived queries.
//! * `undo`      - snapshot history, change classification, coalescing policy.
//! * `engine`    - `DocumentEngine` trait and the `SnapshotEngine` reference
//!   implementation.
//!
//! Telemetry: primitives emit `state.engine` trace events; history lifecycle
//! emits `state.undo` events (push, pop, trim, dedupe skip).

use core_model::{BlockKey, Document, ModelError};
use std::sync::Arc;

pub mod engine;
pub mod selection;
pub mod undo;

pub use engine::{DocumentEngine, SnapshotEngine};
pub use selection::{Point, Selection};
pub use undo::{ChangeType, History, Snapshot, UNDO_HISTORY_MAX};

/// Failures reported by a document engine when a precondition is violated.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("block `{0}` is not part of the document")]
    UnknownBlock(BlockKey),
    #[error("offset {offset} is outside block `{key}` (length {len})")]
    OffsetOutOfBounds {
        key: BlockKey,
        offset: usize,
        len: usize,
    },
    #[error("operation requires a collapsed selection")]
    NotCollapsed,
    #[error("selection start follows its end in document order")]
    ReversedSelection,
    #[error("fragment must contain at least one block")]
    EmptyFragment,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Kind and resulting selection of the most recent recorded change.
#[derive(Debug, Clone, PartialEq)]
struct LastChange {
    kind: ChangeType,
    selection_after: Selection,
}

/// Immutable pairing of a document and a selection, plus engine history.
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Arc<Document>,
    selection: Selection,
    history: History,
    last_change: Option<LastChange>,
}

impl EditorState {
    /// State over `document` with the caret at the start of the first block.
    pub fn create(document: Document) -> Self {
        let selection = Selection::collapsed(document.first().key().clone(), 0);
        Self {
            document: Arc::new(document),
            selection,
            history: History::default(),
            last_change: None,
        }
    }

    /// State over `document` with an explicit selection.
    pub fn with_selection(document: Document, selection: Selection) -> Result<Self, EngineError> {
        let state = Self::create(document);
        engine::check_keys(&state.document, &selection)?;
        Ok(Self { selection, ..state })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared handle to the current document.
    pub fn document_handle(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change.as_ref().map(|c| c.kind)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// True when both states hold the very same document allocation and an
    /// equal selection.
    pub fn same_snapshot(&self, other: &EditorState) -> bool {
        Arc::ptr_eq(&self.document, &other.document) && self.selection == other.selection
    }

    fn snapshot(&self, kind: ChangeType) -> Snapshot {
        Snapshot {
            kind,
            document: Arc::clone(&self.document),
            selection: self.selection.clone(),
        }
    }

    /// Record `change` producing `document` with `selection_after`.
    pub(crate) fn push(
        &self,
        document: Document,
        selection_after: Selection,
        change: ChangeType,
    ) -> EditorState {
        let selection_unchanged = self
            .last_change
            .as_ref()
            .is_none_or(|c| c.selection_after == self.selection);
        let last = self.last_change.as_ref().map(|c| c.kind);
        let mut history = self.history.clone();
        if undo::must_become_boundary(last, change, selection_unchanged) {
            history.push(self.snapshot(change));
        }
        EditorState {
            document: Arc::new(document),
            selection: selection_after.clone(),
            history,
            last_change: Some(LastChange {
                kind: change,
                selection_after,
            }),
        }
    }

    /// Same content, new selection. No history entry.
    pub(crate) fn select(&self, selection: Selection) -> EditorState {
        EditorState {
            selection,
            ..self.clone()
        }
    }
}

impl PartialEq for EditorState {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.document, &other.document) || self.document == other.document)
            && self.selection == other.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::Block;

    fn doc() -> Document {
        Document::from_blocks([Block::unstyled("a", "alpha"), Block::unstyled("b", "beta")])
            .unwrap()
    }

    #[test]
    fn create_puts_caret_at_origin() {
        let state = EditorState::create(doc());
        assert_eq!(state.selection(), &Selection::collapsed("a", 0));
        assert_eq!(state.undo_depth(), 0);
        assert_eq!(state.last_change_type(), None);
    }

    #[test]
    fn with_selection_rejects_unknown_keys() {
        let err = EditorState::with_selection(doc(), Selection::collapsed("nope", 0)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownBlock(ref k) if k.as_str() == "nope"));
    }

    #[test]
    fn push_records_previous_snapshot() {
        let state = EditorState::create(doc());
        let next = state.push(doc(), Selection::collapsed("b", 1), ChangeType::AdjustIndent);
        assert_eq!(next.undo_depth(), 1);
        assert_eq!(next.last_change_type(), Some(ChangeType::AdjustIndent));
        assert_eq!(state.undo_depth(), 0);
        assert!(!state.same_snapshot(&next));
    }

    #[test]
    fn consecutive_inserts_coalesce_until_selection_moves() {
        let s0 = EditorState::create(doc());
        let s1 = s0.push(doc(), Selection::collapsed("a", 1), ChangeType::InsertCharacters);
        let s2 = s1.push(doc(), Selection::collapsed("a", 2), ChangeType::InsertCharacters);
        assert_eq!(s2.undo_depth(), 1);
        let moved = s2.select(Selection::collapsed("b", 0));
        let s3 = moved.push(doc(), Selection::collapsed("b", 1), ChangeType::InsertCharacters);
        assert_eq!(s3.undo_depth(), 2);
    }
}
