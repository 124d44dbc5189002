use crate::Selection;
use core_model::Document;
use std::sync::Arc;
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// Classification of a recorded change; drives coalescing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeType {
    InsertCharacters,
    InsertFragment,
    SplitBlock,
    ChangeBlockData,
    AdjustIndent,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::InsertCharacters => "insert-characters",
            ChangeType::InsertFragment => "insert-fragment",
            ChangeType::SplitBlock => "split-block",
            ChangeType::ChangeBlockData => "change-block-data",
            ChangeType::AdjustIndent => "adjust-indent",
        }
    }
}

/// Document + selection captured before a change.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub kind: ChangeType,
    pub document: Arc<Document>,
    pub selection: Selection,
}

/// Undo/redo stacks of whole-document snapshots.
///
/// Snapshots hold `Arc<Document>` so the stacks share block storage with the
/// live state; a snapshot costs one handle plus the selection.
#[derive(Clone, Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    skipped: u64,
}

/// Whether `change` applied on top of `last` must open a new undo entry.
///
/// Two runs coalesce into the entry already on the stack:
/// * consecutive character inserts at an unchanged selection (typing);
/// * block data applied straight onto a split (continue-metadata on return).
/// Everything else is a boundary.
pub fn must_become_boundary(
    last: Option<ChangeType>,
    change: ChangeType,
    selection_unchanged: bool,
) -> bool {
    if !selection_unchanged {
        return true;
    }
    !matches!(
        (last, change),
        (Some(ChangeType::InsertCharacters), ChangeType::InsertCharacters)
            | (Some(ChangeType::SplitBlock), ChangeType::ChangeBlockData)
    )
}

impl History {
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    /// Pushes dropped because the state was identical to the stack top.
    pub fn snapshots_skipped(&self) -> u64 {
        self.skipped
    }

    /// Record the pre-change snapshot. Clears redo.
    pub fn push(&mut self, snap: Snapshot) {
        if let Some(last) = self.undo_stack.last()
            && Arc::ptr_eq(&last.document, &snap.document)
            && last.selection == snap.selection
        {
            self.skipped += 1;
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "snapshot_dedupe_skip");
            return;
        }
        let kind = snap.kind.as_str();
        self.undo_stack.push(snap);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), kind, "push_snapshot");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Pop the newest undo snapshot, parking `current` on the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let last = self.undo_stack.pop()?;
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        self.redo_stack.push(Snapshot {
            kind: last.kind,
            ..current
        });
        Some(last)
    }

    /// Pop the newest redo snapshot, parking `current` on the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
        self.undo_stack.push(Snapshot {
            kind: next.kind,
            ..current
        });
        Some(next)
    }
}
