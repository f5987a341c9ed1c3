/// Session registry: the ordered set of terminal tabs and which one is active.
/// The terminal widget itself is an external collaborator reached through
/// `TerminalFactory` and `TerminalWidget`.

use crate::error::Result;
use crate::shell::SpawnRequest;
use crate::theme::{Palette, Theme};
use log::info;
use std::fmt;

pub const DEFAULT_LABEL: &str = "Terminal";

/// What the registry needs from a live terminal widget.
pub trait TerminalWidget {
    fn set_colors(&self, palette: &Palette);
    fn set_font_scale(&self, scale: f64);
}

/// Creates terminal widgets running a shell.
pub trait TerminalFactory {
    type Widget: TerminalWidget;

    fn spawn(&mut self, request: &SpawnRequest) -> Result<Self::Widget>;
}

/// Registry-assigned tab identity. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Session<W> {
    id: SessionId,
    label: String,
    widget: W,
}

impl<W: TerminalWidget> Session<W> {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn into_widget(self) -> W {
        self.widget
    }

    pub fn apply_theme(&self, theme: Theme) {
        self.widget.set_colors(&theme.palette());
    }

    pub fn apply_font_scale(&self, scale: f64) {
        self.widget.set_font_scale(scale);
    }
}

pub struct SessionRegistry<W> {
    sessions: Vec<Session<W>>,
    active: Option<usize>,
    next_id: u64,
}

impl<W: TerminalWidget> Default for SessionRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TerminalWidget> SessionRegistry<W> {
    pub fn new() -> Self {
        Self { sessions: Vec::new(), active: None, next_id: 1 }
    }

    /// Spawn a widget, style it, append it as the last tab and activate it.
    /// A spawn failure leaves the registry untouched.
    pub fn create_session<F>(
        &mut self,
        factory: &mut F,
        request: &SpawnRequest,
        theme: Theme,
        font_scale: f64,
    ) -> Result<SessionId>
    where
        F: TerminalFactory<Widget = W>,
    {
        let widget = factory.spawn(request)?;
        let id = SessionId(self.next_id);
        self.next_id += 1;

        let session = Session { id, label: DEFAULT_LABEL.into(), widget };
        session.apply_theme(theme);
        session.apply_font_scale(font_scale);

        self.sessions.push(session);
        self.active = Some(self.sessions.len() - 1);
        info!("opened session {id} running {}", request.shell.display());
        Ok(id)
    }

    /// Remove a session. Unknown ids are ignored.
    pub fn close_session(&mut self, id: SessionId) -> Option<Session<W>> {
        let index = self.position(id)?;
        let session = self.sessions.remove(index);

        self.active = match self.active {
            _ if self.sessions.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.sessions.len() - 1)),
            other => other,
        };
        info!("closed session {id}");
        Some(session)
    }

    pub fn active_session(&self) -> Option<&Session<W>> {
        self.active.and_then(|i| self.sessions.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Make `id` the active tab. Returns false if it is not registered.
    pub fn select(&mut self, id: SessionId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.sessions.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn position(&self, id: SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: SessionId) -> Option<&Session<W>> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session<W>> {
        self.sessions.iter()
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|s| s.id).collect()
    }
}
