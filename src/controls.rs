//! Start/pause/reset controls.
//!
//! The controls hold no countdown state of their own. Each frame the
//! composition tells them what the engine and the input look like through
//! [`Model::sync`], and the controls work out which actions are available:
//!
//! | Action | Shown            | Enabled                                  |
//! |--------|------------------|------------------------------------------|
//! | Start  | when not running | a duration is set or a run is active     |
//! | Pause  | while running    | always                                   |
//! | Reset  | always           | a duration is set or a run has happened  |
//!
//! Start and Pause share a key and are never shown together.

use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss::Color;
use lipgloss_extras::prelude::*;

use crate::key::{self, Binding};

/// An action requested through the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Begin a fresh run with the input's duration.
    Start,
    /// Halt the running countdown.
    Pause,
    /// Return to idle.
    Reset,
}

/// Key bindings for the controls.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Start or pause, depending on the state.
    pub toggle: Binding,
    /// Reset.
    pub reset: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Enter])
                .with_help("space", "start"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
        }
    }
}

impl key::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.toggle, &self.reset]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.toggle, &self.reset]]
    }
}

/// Snapshot of what the controls depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct State {
    /// The engine is counting down.
    pub running: bool,
    /// The input holds a non-zero duration.
    pub has_time: bool,
    /// A run has time on the clock.
    pub active: bool,
    /// A run exists, in any status, including a completed one.
    pub has_run: bool,
}

/// Controls model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Key bindings.
    pub keymap: KeyMap,
    state: State,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates controls with nothing enabled until the first [`Model::sync`].
    pub fn new() -> Self {
        let mut m = Self {
            keymap: KeyMap::default(),
            state: State::default(),
        };
        m.sync(State::default());
        m
    }

    /// Updates availability from the current state.
    pub fn sync(&mut self, state: State) {
        self.state = state;
        let toggle_help = if state.running { "pause" } else { "start" };
        self.keymap.toggle = self
            .keymap
            .toggle
            .clone()
            .with_help("space", toggle_help)
            .with_enabled(state.running || self.start_enabled());
        self.keymap.reset.set_enabled(self.reset_enabled());
    }

    /// Whether Start is shown and can fire.
    pub fn start_enabled(&self) -> bool {
        !self.state.running && (self.state.has_time || self.state.active)
    }

    /// Whether Pause is shown (it is always enabled when shown).
    pub fn pause_shown(&self) -> bool {
        self.state.running
    }

    /// Whether Reset can fire.
    pub fn reset_enabled(&self) -> bool {
        self.state.has_time || self.state.has_run
    }

    /// Maps a key message to the action it requests, if available.
    pub fn update(&self, msg: &Msg) -> Option<Action> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.toggle.matches(key_msg) {
            return if self.state.running {
                Some(Action::Pause)
            } else {
                Some(Action::Start)
            };
        }
        if self.keymap.reset.matches(key_msg) {
            return Some(Action::Reset);
        }
        None
    }

    /// Renders the buttons.
    pub fn view(&self) -> String {
        let active = Style::new()
            .foreground(Color::from("#FFFDF5"))
            .background(Color::from("#7571F9"))
            .bold(true);
        let outline = Style::new().foreground(Color::from("#7571F9")).bold(true);
        let ghost = Style::new().foreground(Color::from("#A49FA5"));
        let disabled = Style::new().foreground(Color::from("#4A4A4A"));

        let primary = if self.pause_shown() {
            outline.render(" ❚❚ Pause ")
        } else if self.start_enabled() {
            active.render(" ▶ Start ")
        } else {
            disabled.render(" ▶ Start ")
        };
        let reset = if self.reset_enabled() {
            ghost.render(" ↺ Reset ")
        } else {
            disabled.render(" ↺ Reset ")
        };

        format!("{}   {}", primary, reset)
    }
}
