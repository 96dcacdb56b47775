// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{FixedCompleter, FixedLookup, MemoryNavigator, OutputDeviceExt, StdoutMock,
            VirtualTerminal, VirtualTerminalLog, new_scripted_event_source};
use crate::{Candidate, Editor, HistoryStore, OutputDevice, ReaderEvent, SessionHistory,
            ShellSignal, SignalListener, StdMutex};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub const TEST_TERMINAL_WIDTH: u16 = 40;

/// An [`Editor`] wired to in-memory devices, plus the handles to drive and inspect them.
#[allow(missing_debug_implementations)]
pub struct TestEditor {
    pub editor: Editor,
    pub stdout_mock: StdoutMock,
    pub terminal_log: Arc<StdMutex<VirtualTerminalLog>>,
    pub signal_sender: UnboundedSender<ShellSignal>,
    pub event_injector: UnboundedSender<ReaderEvent>,
}

impl TestEditor {
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.editor.completer = Box::new(FixedCompleter { candidates });
    }

    /// Start a new session history on top of `store`.
    pub fn replace_store(&mut self, store: impl HistoryStore + 'static) {
        self.editor.history = SessionHistory::new(Some(Box::new(store)));
    }
}

/// Editor that plays back `events` once its read starts. No history store, no
/// completion candidates, [`MemoryNavigator::new_project()`] for navigation, and `ls`
/// as the only external command.
pub fn new_test_editor(events: Vec<ReaderEvent>) -> TestEditor {
    let (terminal, terminal_log) = VirtualTerminal::new(TEST_TERMINAL_WIDTH);
    let (output_device, stdout_mock) = OutputDevice::new_mock();
    let (signals, signal_sender) = SignalListener::from_channel();
    let event_source = new_scripted_event_source(events);
    let event_injector = event_source.injector();

    let editor = Editor::builder()
        .with_terminal(Box::new(terminal))
        .with_output_device(output_device)
        .with_event_source(event_source)
        .with_signals(signals)
        .with_completer(Box::new(FixedCompleter::default()))
        .with_navigator(Box::new(MemoryNavigator::new_project()))
        .with_lookup(Arc::new(FixedLookup::new(["ls"])))
        .build()
        .unwrap();

    TestEditor {
        editor,
        stdout_mock,
        terminal_log,
        signal_sender,
        event_injector,
    }
}
