// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{COMPILER_ERROR_TIP, CompletionProvider, EditingState, EditorBuilder, EventSource,
            ExecutableLookup, INTERACTIVE_SOURCE_NAME, KeyLookup, KeyPress, Keymaps,
            LanguageFrontend, LineRead, NO_BINDING_TIP, NavigationProvider, NextAction,
            OutputDevice, ReadLineError, ReaderEvent, Renderer, SessionHistory, ShellSignal,
            SignalListener, StyleHint, TerminalDevice, TerminalMode, Token, TokenKind,
            is_executable_path, lock_output_device_as_mut, terminal_session};
use std::{collections::HashSet, io, path::Path, sync::Arc};
use tokio::sync::mpsc;

/// Produces the prompt (or right prompt) at the top of every event loop iteration.
pub type PromptFn = Box<dyn FnMut() -> String + Send>;

/// A key may be re-dispatched this many times in a row before it is dropped.
pub const MAX_REPROCESS_COUNT: usize = 16;

/// The line editor. One per process, reused for every read. Build one with
/// [`EditorBuilder`].
///
/// Each call to [`Self::read_line()`] goes through these phases:
///
/// 1. Setup: reset the [`EditingState`], start the background executable lookup and the
///    [`EventSource`], then [`terminal_session::enter()`]. If entering fails, the read
///    fails and nothing needs restoring.
/// 2. Event loop, see [`Self::read_line()`].
/// 3. Teardown, see [`Self::finish_read_line()`]. Runs on every exit out of the event
///    loop.
#[allow(missing_debug_implementations)]
pub struct Editor {
    pub terminal: Box<dyn TerminalDevice>,
    pub output_device: OutputDevice,
    pub event_source: EventSource,
    pub signals: SignalListener,
    pub history: SessionHistory,
    pub frontend: Box<dyn LanguageFrontend>,
    pub completer: Box<dyn CompletionProvider>,
    pub navigator: Box<dyn NavigationProvider>,
    pub lookup: Arc<dyn ExecutableLookup>,
    pub keymaps: Keymaps,
    pub renderer: Box<dyn Renderer>,
    pub prompt: PromptFn,
    pub rprompt: PromptFn,
    pub state: EditingState,
}

impl Editor {
    #[must_use]
    pub fn builder() -> EditorBuilder { EditorBuilder::default() }

    /// Read one line.
    ///
    /// Every iteration of the event loop recomputes the prompts, refreshes the display,
    /// clears the tips, then waits for whichever is ready first:
    ///
    /// | Source          | Effect                                                     |
    /// |-----------------|------------------------------------------------------------|
    /// | Lookup result   | Stored in [`EditingState::is_external`].                   |
    /// | `SIGINT`        | Start over with a fresh [`EditingState`].                  |
    /// | `SIGWINCH`      | Nothing, the next iteration redraws.                       |
    /// | `SIGCHLD`       | Nothing.                                                   |
    /// | Other signals   | Tip `ignored signal <NAME>`.                               |
    /// | Key             | Dispatched through the [`Keymaps`].                        |
    /// | Decode error    | Tip with the error.                                        |
    /// | Cursor position | Nothing.                                                   |
    /// | End of input    | The read returns [`LineRead::Eof`].                        |
    ///
    /// A non-empty line that is accepted is appended to the session history (and the
    /// store) before the terminal is restored.
    pub async fn read_line(&mut self) -> LineRead {
        self.state = EditingState::default();

        let (lookup_sender, mut lookup_receiver) = mpsc::channel::<HashSet<String>>(1);
        let lookup = Arc::clone(&self.lookup);
        tokio::task::spawn_blocking(move || {
            let names = lookup.executable_names();
            lookup_sender.blocking_send(names).ok();
        });

        self.renderer.reset();
        self.event_source.start();

        let saved_mode = {
            let term = lock_output_device_as_mut!(self.output_device);
            terminal_session::enter(self.terminal.as_mut(), term)
        };
        let saved_mode = match saved_mode {
            Ok(it) => it,
            Err(err) => {
                tracing::error!(message = "can't enter editing mode", error = %err);
                self.event_source.stop();
                return LineRead::Err(err.into());
            }
        };

        let result = self.run_event_loop(&mut lookup_receiver).await;

        if let LineRead::Line(line) = &result
            && !line.is_empty()
        {
            self.history.append(line);
        }

        let teardown_errors = self.finish_read_line(&saved_mode);
        if teardown_errors.is_empty() {
            return result;
        }
        let mut errors = vec![];
        if let LineRead::Err(err) = result {
            errors.push(err);
        }
        errors.extend(teardown_errors);
        match ReadLineError::from_many(errors) {
            Some(err) => LineRead::Err(err),
            None => LineRead::Eof,
        }
    }

    async fn run_event_loop(
        &mut self,
        lookup_receiver: &mut mpsc::Receiver<HashSet<String>>,
    ) -> LineRead {
        loop {
            self.state.prompt = (self.prompt)();
            self.state.rprompt = (self.rprompt)();
            if let Err(err) = self.refresh() {
                return LineRead::Err(ReadLineError::Render(err));
            }
            self.state.clear_tips();

            tokio::select! {
                biased;

                // All branches are cancel safe, they only wait on channel receivers.
                Some(names) = lookup_receiver.recv() => {
                    tracing::debug!(message = "executable lookup done", count = names.len());
                    self.state.is_external = names;
                }

                Some(signal) = self.signals.recv() => {
                    self.handle_signal(signal);
                }

                event = self.event_source.recv() => {
                    if let Some(result) = self.handle_event(event) {
                        return result;
                    }
                }
            }
        }
    }

    fn handle_signal(&mut self, signal: ShellSignal) {
        match signal {
            ShellSignal::Interrupt => {
                tracing::debug!(message = "interrupt, starting over");
                self.state.reset_keeping_external();
            }
            ShellSignal::WindowChange | ShellSignal::ChildStatus => {}
            ShellSignal::Other(_) => {
                tracing::warn!(message = "ignored signal", signal = %signal);
                self.state.push_tip(format!("ignored signal {signal}"));
            }
        }
    }

    fn handle_event(&mut self, event: ReaderEvent) -> Option<LineRead> {
        match event {
            ReaderEvent::Key(key) => self.dispatch(key),
            ReaderEvent::CursorPosition { .. } => None,
            ReaderEvent::Error(message) => {
                tracing::warn!(message = "input decode error", error = %message);
                self.state.push_tip(message);
                None
            }
            ReaderEvent::Eof => Some(LineRead::Eof),
        }
    }

    /// Run the builtin bound to `key` in the current mode, again and again for as long as
    /// it asks for the key to be reprocessed.
    pub fn dispatch(&mut self, key: KeyPress) -> Option<LineRead> {
        self.state.last_key = Some(key);
        for _ in 0..MAX_REPROCESS_COUNT {
            let builtin = match self.keymaps.lookup(self.state.mode, &key) {
                KeyLookup::Found(it) => it,
                KeyLookup::NoTable => {
                    self.state.push_tip(NO_BINDING_TIP);
                    return None;
                }
                KeyLookup::Unbound => {
                    self.state.push_tip(format!("unbound key {key}"));
                    return None;
                }
            };
            tracing::trace!(message = "dispatch", key = %key, builtin = builtin.name);
            match builtin.call(self) {
                NextAction::NoAction => return None,
                NextAction::ExitReadLine(result) => return Some(result),
                NextAction::ReprocessKey => {
                    if let Err(err) = self.refresh() {
                        return Some(LineRead::Err(ReadLineError::Render(err)));
                    }
                }
            }
        }
        tracing::warn!(message = "key reprocessed too many times, dropped", key = %key);
        None
    }

    /// Re-lex the buffer (except in [`crate::Mode::Completion`], where the buffer is not
    /// being edited) and draw.
    ///
    /// # Errors
    ///
    /// Returns an error if the output device can't be written to.
    pub fn refresh(&mut self) -> io::Result<()> {
        if self.state.mode != crate::Mode::Completion {
            self.relex();
        }
        self.render()
    }

    fn render(&mut self) -> io::Result<()> {
        let width = self.terminal.width();
        let out = lock_output_device_as_mut!(self.output_device);
        self.renderer.render(&self.state, width, out)
    }

    /// Recompute [`EditingState::tokens`] from the buffer. Command heads are marked good
    /// or bad, and a compile diagnostic marks the token it points into.
    pub fn relex(&mut self) {
        let line = &self.state.line;
        let tree = match self.frontend.parse(line) {
            Ok(tree) => tree,
            Err(_) => {
                self.state.tokens = vec![Token::new(TokenKind::ParserError, line, 0..line.len())];
                return;
            }
        };

        let mut tokens = tree.tokens.clone();
        for token in tokens
            .iter_mut()
            .filter(|it| it.kind == TokenKind::CommandHead)
        {
            let hint = if self.is_good_command(&token.text) {
                StyleHint::GoodCommand
            } else {
                StyleHint::BadCommand
            };
            token.more_style.push(hint);
        }

        let compile_error = self.frontend.compile(INTERACTIVE_SOURCE_NAME, line, &tree);
        if let Some(err) = compile_error {
            let position = err.position;
            let target = tokens
                .iter()
                .position(|it| it.contains(position))
                .or_else(|| tokens.len().checked_sub(1).filter(|_| position >= line.len()));
            if let Some(index) = target {
                tokens[index].more_style.push(StyleHint::CompilerError);
            }
            if !self.state.tips.iter().any(|it| it == COMPILER_ERROR_TIP) {
                self.state.push_tip(COMPILER_ERROR_TIP);
            }
        }

        self.state.tokens = tokens;
    }

    fn is_good_command(&self, name: &str) -> bool {
        self.frontend.is_builtin(name)
            || self.state.is_external.contains(name)
            || (name.contains('/') && is_executable_path(Path::new(name)))
    }

    /// Draw the final frame of the read and give the terminal back:
    ///
    /// 1. Back to [`crate::Mode::Insert`], no tips, no overlay, dot at the end, no right
    ///    prompt.
    /// 2. Draw once more, then a newline.
    /// 3. Stop the [`EventSource`].
    /// 4. [`terminal_session::restore()`] with the mode saved on entry.
    ///
    /// Every step runs, whatever happened before it. The errors are returned.
    pub fn finish_read_line(&mut self, saved_mode: &TerminalMode) -> Vec<ReadLineError> {
        let mut errors = vec![];

        self.state.prepare_for_teardown();
        self.relex();
        self.state.clear_tips();
        if let Err(err) = self.render() {
            errors.push(ReadLineError::Render(err));
        }

        {
            let term = lock_output_device_as_mut!(self.output_device);
            if let Err(err) = term.write_all(b"\n").and_then(|()| term.flush()) {
                errors.push(ReadLineError::Render(err));
            }
        }

        self.event_source.stop();

        {
            let term = lock_output_device_as_mut!(self.output_device);
            errors.extend(
                terminal_session::restore(self.terminal.as_mut(), term, saved_mode)
                    .into_iter()
                    .map(ReadLineError::from),
            );
        }

        self.state = EditingState::default();
        tracing::debug!(message = "read finished", error_count = errors.len());
        errors
    }
}
