//! Type-safe key bindings.
//!
//! A [`Binding`] groups the key presses that trigger one action together with
//! the help text shown for it. Components expose their bindings through the
//! [`KeyMap`] trait so the help view can render them.
//!
//! ```rust
//! use tea_countdown::key::{Binding, KeyPress};
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let quit = Binding::new(vec![
//!     KeyPress::from(KeyCode::Char('q')),
//!     KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL)),
//! ])
//! .with_help("q", "quit");
//!
//! let msg = KeyMsg { key: KeyCode::Char('q'), modifiers: KeyModifiers::NONE };
//! assert!(quit.matches(&msg));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub code: KeyCode,
    /// Modifiers that must be held.
    pub mods: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, mods): (KeyCode, KeyModifiers)) -> Self {
        Self { code, mods }
    }
}

impl KeyPress {
    /// Whether `msg` is this key press.
    ///
    /// Character bindings declared without modifiers also accept SHIFT, since
    /// terminals report it for characters like `?` or `+`.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        if self.mods == msg.modifiers {
            return true;
        }
        matches!(self.code, KeyCode::Char(_))
            && self.mods.is_empty()
            && msg.modifiers == KeyModifiers::SHIFT
    }
}

/// Help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// How the key is displayed, e.g. `"space"`.
    pub key: String,
    /// What it does, e.g. `"start"`.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates an enabled binding with no help text.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the binding with its enabled state set.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.disabled = !enabled;
        self
    }

    /// Enables or disables the binding. Disabled bindings never match and are
    /// hidden from help.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding can fire and should be shown.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// The help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether `msg` triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Whether `msg` triggers any of `bindings`.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

/// Bindings a component wants displayed in the help view.
pub trait KeyMap {
    /// Bindings for the compact, single-line help.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings grouped into columns for the expanded help.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_binding_matches_any_of_its_keys() {
        let b = Binding::new(vec![KeyCode::Char(' '), KeyCode::Enter]).with_help("space", "start");
        assert!(b.matches(&key(KeyCode::Char(' '))));
        assert!(b.matches(&key(KeyCode::Enter)));
        assert!(!b.matches(&key(KeyCode::Char('x'))));
        assert_eq!(b.help().key, "space");
        assert_eq!(b.help().desc, "start");
    }

    #[test]
    fn test_modifiers_must_match() {
        let b = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert!(!b.matches(&key(KeyCode::Char('c'))));
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        }));
    }

    #[test]
    fn test_shifted_characters_match_plain_bindings() {
        let b = Binding::new(vec![KeyCode::Char('?')]);
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('?'),
            modifiers: KeyModifiers::SHIFT,
        }));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = Binding::new(vec![KeyCode::Char('r')]);
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&key(KeyCode::Char('r'))));
        b.set_enabled(true);
        assert!(b.matches(&key(KeyCode::Char('r'))));
    }

    #[test]
    fn test_empty_binding_is_disabled() {
        let b = Binding::new(Vec::<KeyCode>::new());
        assert!(!b.enabled());
    }

    #[test]
    fn test_matches_helper() {
        let a = Binding::new(vec![KeyCode::Up]);
        let b = Binding::new(vec![KeyCode::Down]);
        assert!(matches(&key(KeyCode::Down), &[&a, &b]));
        assert!(!matches(&key(KeyCode::Left), &[&a, &b]));
    }
}
