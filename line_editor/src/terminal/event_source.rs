// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{KeyPress, PinnedInputStream};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use tokio::{sync::mpsc, task::JoinHandle};

/// One decoded unit of terminal input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReaderEvent {
    Key(KeyPress),
    /// Cursor position report (1 based). The editor does not ask for these, stray ones
    /// are ignored.
    CursorPosition { row: u16, col: u16 },
    /// The decoder hit something it could not make sense of. Not fatal.
    Error(String),
    /// The input stream has ended.
    Eof,
}

/// Produces a fresh input stream every time the [`EventSource`] is started.
pub type EventStreamFactory = Box<dyn FnMut() -> PinnedInputStream<ReaderEvent> + Send>;

/// Decodes terminal input in its own task and hands [`ReaderEvent`]s to the editor
/// over an unbounded channel.
///
/// - [`Self::start()`] spawns the decode task. It reads from a stream built by the
///   [`EventStreamFactory`], and sends [`ReaderEvent::Eof`] once that stream ends.
/// - [`Self::stop()`] aborts the task and drops any events that were not delivered yet.
///   It is idempotent.
///
/// The default stream is crossterm's [`EventStream`], see [`Self::new_crossterm()`].
/// Tests use [`crate::PinnedInputStream`]s built with `async_stream`, and can push events
/// directly with [`Self::injector()`].
#[allow(missing_debug_implementations)]
pub struct EventSource {
    factory: EventStreamFactory,
    sender: mpsc::UnboundedSender<ReaderEvent>,
    receiver: mpsc::UnboundedReceiver<ReaderEvent>,
    task: Option<JoinHandle<()>>,
}

impl EventSource {
    #[must_use]
    pub fn new(factory: EventStreamFactory) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            factory,
            sender,
            receiver,
            task: None,
        }
    }

    #[must_use]
    pub fn new_crossterm() -> Self { Self::new(Box::new(crossterm_event_stream)) }

    /// Spawn the decode task, unless it is already running. Must be called from inside
    /// a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let mut stream = (self.factory)();
        let sender = self.sender.clone();
        self.task = Some(tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                if sender.send(event).is_err() {
                    return;
                }
            }
            sender.send(ReaderEvent::Eof).ok();
        }));
        tracing::debug!(message = "event source started");
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!(message = "event source stopped");
        }
        while self.receiver.try_recv().is_ok() {}
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait for the next event. Cancel safe, so it can be used in a `tokio::select!`
    /// branch.
    pub async fn recv(&mut self) -> ReaderEvent {
        // The sender half is owned by self, so the channel never closes.
        self.receiver.recv().await.unwrap_or(ReaderEvent::Eof)
    }

    /// Sender that delivers events exactly as if the decode task had produced them.
    #[must_use]
    pub fn injector(&self) -> mpsc::UnboundedSender<ReaderEvent> { self.sender.clone() }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Crossterm's [`EventStream`], reduced to [`ReaderEvent`]s. Key releases and repeats,
/// mouse, focus, paste and resize events are dropped (resizes arrive as `SIGWINCH`).
fn crossterm_event_stream() -> PinnedInputStream<ReaderEvent> {
    let it = EventStream::new().filter_map(|result| async move {
        match result {
            Ok(Event::Key(key_event)) => KeyPress::try_from(key_event).ok().map(ReaderEvent::Key),
            Ok(_) => None,
            Err(err) => Some(ReaderEvent::Error(err.to_string())),
        }
    });
    Box::pin(it)
}
