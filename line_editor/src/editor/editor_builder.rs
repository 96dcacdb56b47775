// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{AnsiRenderer, CompletionProvider, EditingState, Editor, EditorConfig,
            EventSource, ExecutableLookup, FilenameCompleter, FsNavigationProvider,
            HistoryStore, Keymaps, KvHistoryStore, LanguageFrontend, NavigationProvider,
            OutputDevice, PathLookup, PromptFn, Renderer, SessionHistory,
            ShellWordsFrontend, SignalListener, TerminalDevice};
use miette::{IntoDiagnostic, WrapErr};
use std::sync::Arc;

pub const DEFAULT_PROMPT: &str = "> ";

/// Assembles an [`Editor`]. Anything not provided falls back to a default:
///
/// | Part            | Default                                                  |
/// |-----------------|----------------------------------------------------------|
/// | Terminal        | The controlling terminal ([`crate::TtyDevice`]).         |
/// | Output          | `stdout`.                                                |
/// | Events          | crossterm's `EventStream`.                               |
/// | Signals         | [`crate::spawn_signal_listener()`].                      |
/// | History store   | None, session history only.                              |
/// | Frontend        | [`ShellWordsFrontend`].                                  |
/// | Completion      | [`FilenameCompleter`].                                   |
/// | Navigation      | [`FsNavigationProvider`].                                |
/// | Lookup          | [`PathLookup`] over `$PATH`.                             |
/// | Keymaps         | [`Keymaps::with_defaults()`].                            |
/// | Renderer        | [`AnsiRenderer`].                                        |
/// | Prompts         | [`DEFAULT_PROMPT`] and an empty right prompt.            |
#[derive(Default)]
#[allow(missing_debug_implementations)]
pub struct EditorBuilder {
    terminal: Option<Box<dyn TerminalDevice>>,
    output_device: Option<OutputDevice>,
    event_source: Option<EventSource>,
    signals: Option<SignalListener>,
    history_store: Option<Box<dyn HistoryStore>>,
    frontend: Option<Box<dyn LanguageFrontend>>,
    completer: Option<Box<dyn CompletionProvider>>,
    navigator: Option<Box<dyn NavigationProvider>>,
    lookup: Option<Arc<dyn ExecutableLookup>>,
    keymaps: Option<Keymaps>,
    renderer: Option<Box<dyn Renderer>>,
    prompt: Option<PromptFn>,
    rprompt: Option<PromptFn>,
}

impl EditorBuilder {
    #[must_use]
    pub fn with_terminal(mut self, terminal: Box<dyn TerminalDevice>) -> Self {
        self.terminal = Some(terminal);
        self
    }

    #[must_use]
    pub fn with_output_device(mut self, output_device: OutputDevice) -> Self {
        self.output_device = Some(output_device);
        self
    }

    #[must_use]
    pub fn with_event_source(mut self, event_source: EventSource) -> Self {
        self.event_source = Some(event_source);
        self
    }

    #[must_use]
    pub fn with_signals(mut self, signals: SignalListener) -> Self {
        self.signals = Some(signals);
        self
    }

    #[must_use]
    pub fn with_history_store(mut self, store: Box<dyn HistoryStore>) -> Self {
        self.history_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_frontend(mut self, frontend: Box<dyn LanguageFrontend>) -> Self {
        self.frontend = Some(frontend);
        self
    }

    #[must_use]
    pub fn with_completer(mut self, completer: Box<dyn CompletionProvider>) -> Self {
        self.completer = Some(completer);
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Box<dyn NavigationProvider>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: Arc<dyn ExecutableLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    #[must_use]
    pub fn with_keymaps(mut self, keymaps: Keymaps) -> Self {
        self.keymaps = Some(keymaps);
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: PromptFn) -> Self {
        self.prompt = Some(prompt);
        self
    }

    #[must_use]
    pub fn with_rprompt(mut self, rprompt: PromptFn) -> Self {
        self.rprompt = Some(rprompt);
        self
    }

    /// Open the history store named in `config` (if any) and apply its key bindings on
    /// top of the keymaps set so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the store can't be opened or a binding is invalid.
    pub fn with_config(mut self, config: &EditorConfig) -> miette::Result<Self> {
        if let Some(path) = &config.history_store_path {
            let store = KvHistoryStore::open(path)?;
            self.history_store = Some(Box::new(store));
        }
        let mut keymaps = self.keymaps.take().unwrap_or_default();
        config
            .apply_bindings(&mut keymaps)
            .wrap_err("can't apply key bindings from config")?;
        self.keymaps = Some(keymaps);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns an error if no terminal device was given and the controlling terminal
    /// can't be opened, or if the OS signal handlers can't be registered.
    pub fn build(self) -> miette::Result<Editor> {
        let terminal = match self.terminal {
            Some(it) => it,
            None => open_controlling_terminal()?,
        };
        let signals = match self.signals {
            Some(it) => it,
            None => listen_to_os_signals()?,
        };

        Ok(Editor {
            terminal,
            output_device: self.output_device.unwrap_or_default(),
            event_source: self.event_source.unwrap_or_else(EventSource::new_crossterm),
            signals,
            history: SessionHistory::new(self.history_store),
            frontend: self
                .frontend
                .unwrap_or_else(|| Box::new(ShellWordsFrontend::default())),
            completer: self.completer.unwrap_or_else(|| Box::new(FilenameCompleter)),
            navigator: self
                .navigator
                .unwrap_or_else(|| Box::new(FsNavigationProvider)),
            lookup: self
                .lookup
                .unwrap_or_else(|| Arc::new(PathLookup::from_env())),
            keymaps: self.keymaps.unwrap_or_default(),
            renderer: self
                .renderer
                .unwrap_or_else(|| Box::new(AnsiRenderer::default())),
            prompt: self
                .prompt
                .unwrap_or_else(|| Box::new(|| DEFAULT_PROMPT.to_string())),
            rprompt: self.rprompt.unwrap_or_else(|| Box::new(String::new)),
            state: EditingState::default(),
        })
    }
}

#[cfg(unix)]
fn open_controlling_terminal() -> miette::Result<Box<dyn TerminalDevice>> {
    let device = crate::TtyDevice::open()
        .into_diagnostic()
        .wrap_err("can't open the controlling terminal")?;
    Ok(Box::new(device))
}

#[cfg(not(unix))]
fn open_controlling_terminal() -> miette::Result<Box<dyn TerminalDevice>> {
    miette::bail!("no terminal device given, and there is no default on this platform")
}

#[cfg(unix)]
fn listen_to_os_signals() -> miette::Result<SignalListener> {
    crate::spawn_signal_listener()
        .into_diagnostic()
        .wrap_err("can't register OS signal handlers")
}

#[cfg(not(unix))]
fn listen_to_os_signals() -> miette::Result<SignalListener> {
    let (listener, _sender) = SignalListener::from_channel();
    Ok(listener)
}
