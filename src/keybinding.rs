/// Keyboard shortcuts: Ctrl+w cycles the theme, Ctrl+plus/equal/minus
/// resize the font. Keys are the printable character of the key pressed.

use bitflags::bitflags;
use log::warn;
use std::collections::HashMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CONTROL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub key: String,
}

impl KeyBinding {
    pub fn ctrl(key: &str) -> Self {
        Self { modifiers: Modifiers::CONTROL, key: key.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CycleTheme,
    IncreaseFontScale,
    DecreaseFontScale,
}

pub struct KeybindingManager {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for KeybindingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingManager {
    pub fn new() -> Self {
        let mut mgr = Self { bindings: HashMap::new() };
        mgr.load_defaults();
        mgr
    }

    fn load_defaults(&mut self) {
        let defaults = [
            ("w", Action::CycleTheme),
            ("+", Action::IncreaseFontScale),
            ("=", Action::IncreaseFontScale),
            ("-", Action::DecreaseFontScale),
        ];
        for (key, action) in defaults {
            self.bind(KeyBinding::ctrl(key), action);
        }
    }

    /// Add or override a keybinding. Shortcuts need at least one modifier so
    /// plain typing reaches the shell; a binding without one is refused and
    /// `false` is returned.
    pub fn bind(&mut self, binding: KeyBinding, action: Action) -> bool {
        if binding.modifiers.is_empty() {
            warn!("refusing binding '{}' without modifiers", binding.key);
            return false;
        }
        self.bindings.insert(binding, action);
        true
    }

    pub fn unbind(&mut self, binding: &KeyBinding) {
        self.bindings.remove(binding);
    }

    /// Look up the action for a key press. A binding matches when all of its
    /// modifiers are held; extra ones (Shift for `+`) are tolerated. The match
    /// with the most modifiers wins. Among equally specific matches the one
    /// with the higher modifier bits wins (Super > Alt > Shift > Control).
    pub fn lookup(&self, modifiers: Modifiers, key: &str) -> Option<Action> {
        self.bindings
            .iter()
            .filter(|(b, _)| b.key == key && modifiers.contains(b.modifiers))
            .max_by_key(|(b, _)| (b.modifiers.bits().count_ones(), b.modifiers.bits()))
            .map(|(_, action)| *action)
    }

    /// All bindings for an action, sorted by key for stable display.
    pub fn bindings_for(&self, action: Action) -> Vec<&KeyBinding> {
        let mut found: Vec<_> = self.bindings.iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k)
            .collect();
        found.sort_by(|a, b| a.key.cmp(&b.key));
        found
    }

    /// Display string for a keybinding, e.g. `Ctrl+w`.
    pub fn display(binding: &KeyBinding) -> String {
        let names = [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::SUPER, "Super"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
        ];
        let mut parts: Vec<&str> = names.iter()
            .filter(|(m, _)| binding.modifiers.contains(*m))
            .map(|(_, name)| *name)
            .collect();
        parts.push(&binding.key);
        parts.join("+")
    }
}
