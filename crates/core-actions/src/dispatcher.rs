//! Enumerated command dispatch.
//!
//! Hosts translate their input (keys, toolbar buttons, menu items) into a
//! `Command` and hand it to a `Dispatcher` together with the current state.
//! The dispatcher owns the engine and an optional list of accepted command
//! kinds; anything outside that list is reported as not handled so the host
//! can run its default behaviour.

use crate::{block_data, indent, split};
use core_model::BlockData;
use core_state::{DocumentEngine, EditorState, EngineError};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Name-level identity of a command, used for filtering and bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Indent,
    Outdent,
    SplitBlock,
    ChangeBlockData,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Indent,
        CommandKind::Outdent,
        CommandKind::SplitBlock,
        CommandKind::ChangeBlockData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Indent => "indent",
            CommandKind::Outdent => "outdent",
            CommandKind::SplitBlock => "split-block",
            CommandKind::ChangeBlockData => "change-block-data",
        }
    }

    /// True when the command carries no payload and can be built from its
    /// name alone.
    pub fn is_bare(self) -> bool {
        !matches!(self, CommandKind::ChangeBlockData)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        CommandKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// A command ready to run against an editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Indent,
    Outdent,
    /// Split at the caret, carrying block data onto the new block.
    SplitWithMerge,
    /// Replace the data of the selected blocks.
    SetBlockData(BlockData),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Indent => CommandKind::Indent,
            Command::Outdent => CommandKind::Outdent,
            Command::SplitWithMerge => CommandKind::SplitBlock,
            Command::SetBlockData(_) => CommandKind::ChangeBlockData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Command for a payload-free kind; `None` for `ChangeBlockData`.
    pub fn bare(kind: CommandKind) -> Option<Command> {
        match kind {
            CommandKind::Indent => Some(Command::Indent),
            CommandKind::Outdent => Some(Command::Outdent),
            CommandKind::SplitBlock => Some(Command::SplitWithMerge),
            CommandKind::ChangeBlockData => None,
        }
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub state: EditorState,
    /// False when the command was filtered out or had nothing to do; the
    /// returned state is then the input state.
    pub handled: bool,
}

impl DispatchResult {
    pub fn handled(state: EditorState) -> Self {
        Self {
            state,
            handled: true,
        }
    }

    pub fn not_handled(state: EditorState) -> Self {
        Self {
            state,
            handled: false,
        }
    }
}

/// Runs commands through an engine, honouring an optional accept list.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<E> {
    engine: E,
    accept: Option<HashSet<CommandKind>>,
}

impl<E: DocumentEngine> Dispatcher<E> {
    /// Dispatcher accepting every command.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            accept: None,
        }
    }

    /// Restrict dispatch to `kinds`. An empty list accepts nothing.
    pub fn with_accepted(mut self, kinds: impl IntoIterator<Item = CommandKind>) -> Self {
        self.accept = Some(kinds.into_iter().collect());
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn accepts(&self, kind: CommandKind) -> bool {
        self.accept.as_ref().is_none_or(|a| a.contains(&kind))
    }

    pub fn dispatch(
        &self,
        command: &Command,
        state: &EditorState,
    ) -> Result<DispatchResult, EngineError> {
        let kind = command.kind();
        if !self.accepts(kind) {
            debug!(target: "actions.dispatch", command = kind.as_str(), handled = false, reason = "filtered", "dispatch");
            return Ok(DispatchResult::not_handled(state.clone()));
        }

        let result = match command {
            Command::Indent => DispatchResult::handled(indent::indent_selection(&self.engine, state)?),
            Command::Outdent => {
                DispatchResult::handled(indent::outdent_selection(&self.engine, state)?)
            }
            Command::SplitWithMerge => {
                let next = split::merge_block_data_on_split(&self.engine, state)?;
                if next.same_snapshot(state) {
                    DispatchResult::not_handled(next)
                } else {
                    DispatchResult::handled(next)
                }
            }
            Command::SetBlockData(data) => {
                DispatchResult::handled(block_data::set_block_data(&self.engine, state, data)?)
            }
        };
        debug!(target: "actions.dispatch", command = kind.as_str(), handled = result.handled, undo_depth = result.state.undo_depth(), "dispatch");
        Ok(result)
    }
}
