/// Application context: owns the configuration, the open sessions and the
/// shortcut table, and applies UI events to them one at a time.

use crate::config::{Config, ConfigStore};
use crate::error::Result;
use crate::keybinding::{Action, KeybindingManager, Modifiers};
use crate::session::{Session, SessionId, SessionRegistry, TerminalFactory};
use crate::shell::SpawnRequest;
use log::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NewTab,
    CloseTab(SessionId),
    Select(SessionId),
    Shortcut(Action),
}

#[derive(Debug)]
pub enum Dispatch<W> {
    /// Not consumed; let the toolkit deliver it elsewhere.
    Ignored,
    Handled,
    Created(SessionId),
    /// The caller detaches the widget from its container.
    Closed(Session<W>),
}

impl<W> Dispatch<W> {
    pub fn consumed(&self) -> bool {
        !matches!(self, Dispatch::Ignored)
    }
}

pub struct App<F: TerminalFactory> {
    config: Config,
    /// `None` keeps the configuration in memory only.
    store: Option<ConfigStore>,
    /// Shell for new tabs; the user's default shell when unset.
    shell: Option<String>,
    sessions: SessionRegistry<F::Widget>,
    keys: KeybindingManager,
    factory: F,
}

impl<F: TerminalFactory> App<F> {
    /// Load the configuration from `store` and start with no sessions.
    pub fn new(store: ConfigStore, factory: F) -> Self {
        let config = store.load();
        Self::build(config, Some(store), factory)
    }

    /// Default configuration that is never written to disk.
    pub fn in_memory(factory: F) -> Self {
        Self::build(Config::default(), None, factory)
    }

    fn build(config: Config, store: Option<ConfigStore>, factory: F) -> Self {
        Self {
            config,
            store,
            shell: None,
            sessions: SessionRegistry::new(),
            keys: KeybindingManager::new(),
            factory,
        }
    }

    /// Run `shell` in new tabs instead of the user's default shell.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &SessionRegistry<F::Widget> {
        &self.sessions
    }

    pub fn dispatch(&mut self, event: Event) -> Result<Dispatch<F::Widget>> {
        debug!("dispatch {event:?}");
        match event {
            Event::NewTab => {
                let request = match &self.shell {
                    Some(shell) => SpawnRequest::for_shell(shell),
                    None => SpawnRequest::user_shell(),
                }
                .inspect_err(|e| error!("{e}"))?;
                self.open_session(&request).map(Dispatch::Created)
            }
            Event::CloseTab(id) => Ok(match self.sessions.close_session(id) {
                Some(session) => Dispatch::Closed(session),
                None => Dispatch::Ignored,
            }),
            Event::Select(id) => Ok(if self.sessions.select(id) {
                Dispatch::Handled
            } else {
                Dispatch::Ignored
            }),
            Event::Shortcut(action) => Ok(self.run_shortcut(action)),
        }
    }

    /// Translate a key press into a shortcut, if one is bound.
    pub fn handle_key(
        &mut self,
        modifiers: Modifiers,
        key: &str,
    ) -> Result<Dispatch<F::Widget>> {
        match self.keys.lookup(modifiers, key) {
            Some(action) => self.dispatch(Event::Shortcut(action)),
            None => Ok(Dispatch::Ignored),
        }
    }

    /// Open a tab with an explicit spawn request, styled from the current config.
    pub fn open_session(&mut self, request: &SpawnRequest) -> Result<SessionId> {
        let Config { theme, font_scale } = self.config;
        self.sessions
            .create_session(&mut self.factory, request, theme, font_scale)
            .inspect_err(|e| error!("{e}"))
    }

    /// One line per shortcut, e.g. `Ctrl+w: next theme`.
    pub fn shortcut_help(&self) -> String {
        let actions = [
            (Action::CycleTheme, "next theme"),
            (Action::IncreaseFontScale, "larger font"),
            (Action::DecreaseFontScale, "smaller font"),
        ];
        actions
            .iter()
            .filter_map(|(action, what)| {
                let keys: Vec<String> = self.keys.bindings_for(*action)
                    .into_iter()
                    .map(KeybindingManager::display)
                    .collect();
                (!keys.is_empty()).then(|| format!("{}: {what}", keys.join(" / ")))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn run_shortcut(&mut self, action: Action) -> Dispatch<F::Widget> {
        let Some(session) = self.sessions.active_session() else {
            debug!("{action:?} ignored: no active session");
            return Dispatch::Ignored;
        };
        match action {
            Action::CycleTheme => {
                let theme = self.config.cycle_theme();
                session.apply_theme(theme);
                info!("theme changed to {theme}");
            }
            Action::IncreaseFontScale => {
                session.apply_font_scale(self.config.increase_font_scale());
            }
            Action::DecreaseFontScale => {
                session.apply_font_scale(self.config.decrease_font_scale());
            }
        }
        self.persist();
        Dispatch::Handled
    }

    fn persist(&self) {
        let Some(store) = &self.store else { return };
        if let Err(e) = store.save(&self.config) {
            error!("{e}");
        }
    }
}
