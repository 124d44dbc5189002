mod common;
use common::*;

use core_actions::{Command, CommandKind, Dispatcher};
use core_model::{BlockData, BlockKey};
use core_state::SnapshotEngine;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

#[test]
fn indent_and_outdent_dispatch() {
    let dispatcher = Dispatcher::new(SnapshotEngine);
    let state = state_range(&[("b1", "foo"), ("b2", "bar")], ("b1", 1), ("b2", 1));

    let up = dispatcher.dispatch(&Command::Indent, &state).unwrap();
    assert!(up.handled);
    assert_eq!(texts(&up.state), vec!["\tfoo", "\tbar"]);

    let down = dispatcher.dispatch(&Command::Outdent, &up.state).unwrap();
    assert!(down.handled);
    assert_eq!(texts(&down.state), vec!["foo", "bar"]);
}

#[test]
fn filtered_command_is_not_handled() {
    let dispatcher = Dispatcher::new(SnapshotEngine).with_accepted([CommandKind::Outdent]);
    let state = state_caret(&[("b1", "hello")], "b1", 1);
    assert!(!dispatcher.accepts(CommandKind::Indent));

    let result = dispatcher.dispatch(&Command::Indent, &state).unwrap();
    assert!(!result.handled);
    assert!(result.state.same_snapshot(&state));
}

#[test]
fn empty_accept_list_rejects_everything() {
    let dispatcher = Dispatcher::new(SnapshotEngine).with_accepted(Vec::<CommandKind>::new());
    for kind in CommandKind::ALL {
        assert!(!dispatcher.accepts(kind));
    }
}

#[test]
fn split_without_data_falls_through_to_host() {
    let dispatcher = Dispatcher::new(SnapshotEngine);
    let state = state_caret(&[("b1", "hello")], "b1", 2);
    let result = dispatcher.dispatch(&Command::SplitWithMerge, &state).unwrap();
    assert!(!result.handled);
    assert!(result.state.same_snapshot(&state));
}

#[test]
fn set_block_data_then_split_carries_alignment() {
    let dispatcher = Dispatcher::new(SnapshotEngine);
    let state = state_caret(&[("b1", "hello")], "b1", 3);
    let align = BlockData::new().with("textAlign", "center");

    let aligned = dispatcher
        .dispatch(&Command::SetBlockData(align.clone()), &state)
        .unwrap();
    assert!(aligned.handled);
    assert_eq!(
        core_actions::block_data_for_key(&aligned.state, &BlockKey::from("b1")),
        Some(&align)
    );

    let split = dispatcher
        .dispatch(&Command::SplitWithMerge, &aligned.state)
        .unwrap();
    assert!(split.handled);
    assert_eq!(texts(&split.state), vec!["hel", "lo"]);
    assert!(split.state.document().iter().all(|b| b.data() == &align));
}

#[test]
fn dispatch_logs_under_actions_target() {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter { inner: buf.clone() })
        .finish();
    let dispatcher = Dispatcher::new(SnapshotEngine).with_accepted([CommandKind::Indent]);
    let state = state_caret(&[("b1", "x")], "b1", 0);

    with_default(subscriber, || {
        dispatcher.dispatch(&Command::Indent, &state).unwrap();
        dispatcher.dispatch(&Command::Outdent, &state).unwrap();
    });

    let out = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
    assert!(out.contains("actions.dispatch"));
    assert!(out.contains("command=\"indent\""));
    assert!(out.contains("reason=\"filtered\""));
    assert!(out.contains("actions.indent"));
}
