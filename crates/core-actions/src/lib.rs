//! Editing commands over block documents.
//!
//! Every operation takes the current `EditorState` by reference, computes the
//! change with pure transforms, commits it through a `DocumentEngine`
//! primitive and returns the new state. Engine errors are propagated as is.
//!
//! Modules:
//! * `adjust`     - selection offset shifts after indent/outdent
//! * `indent`     - indent / outdent of caret, single-block and multi-block selections
//! * `split`      - split at caret carrying block data onto both halves
//! * `block_data` - set / merge block data on the selected blocks
//! * `dispatcher` - `Command` enum and accept-filtered dispatch

pub mod adjust;
pub mod block_data;
pub mod dispatcher;
pub mod indent;
pub mod split;

pub use adjust::{merge_indent_selection, merge_outdent_selection};
pub use block_data::{block_data_for_key, merge_block_data, set_block_data};
pub use dispatcher::{Command, CommandKind, DispatchResult, Dispatcher, UnknownCommand};
pub use indent::{IndentDirection, adjust_indent, indent_selection, outdent_selection};
pub use split::merge_block_data_on_split;
