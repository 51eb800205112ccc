#![warn(missing_docs)]

//! # tea-countdown
//!
//! A countdown timer widget for the terminal, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) and styled with
//! lipgloss.
//!
//! ## Overview
//!
//! The user enters a duration in minutes and seconds, starts the countdown and
//! watches a circular progress ring drain as time passes. The color of the
//! ring follows the urgency of the remaining time, the last five seconds
//! pulse, and completion raises an audible cue plus a desktop notification
//! when those are allowed.
//!
//! Each piece follows the Elm Architecture with `update()` and `view()`
//! methods, and they are composed by [`app::TimerApp`]:
//!
//! | Module | Role |
//! |--------|------|
//! | [`countdown`] | Countdown engine: status, remaining seconds, tick scheduling |
//! | [`display`] | Pure derivations: `MM:SS`, progress ratio, urgency category |
//! | [`progress`] | Circular progress ring |
//! | [`time_input`] | Minutes/seconds entry with clamping and presets |
//! | [`controls`] | Start/pause/reset availability and buttons |
//! | [`alert`] | Completion tones and desktop notifications |
//! | [`help`] / [`key`] | Key bindings and their help line |
//! | [`config`] | TOML configuration |
//!
//! ## Driving the engine
//!
//! The engine can be used on its own. Ticks are normally delivered by the
//! bubbletea runtime, but [`countdown::Model::tick`] advances it directly:
//!
//! ```rust
//! use tea_countdown::countdown::{Model, Status, TickOutcome};
//! use tea_countdown::display::{classify, Category};
//!
//! let mut engine = Model::new();
//! let _cmd = engine.start(3);
//! assert_eq!(engine.status(), Status::Running);
//!
//! assert_eq!(engine.tick(), TickOutcome::Ticked);
//! let display = classify(engine.remaining(), engine.total(), engine.running());
//! assert_eq!(display.formatted_time, "00:02");
//! assert_eq!(display.category, Category::Critical);
//!
//! engine.tick();
//! assert_eq!(engine.tick(), TickOutcome::Completed);
//! assert!(engine.completed());
//! ```
//!
//! ## Key Bindings
//!
//! Components use the key binding types from the [`key`] module:
//!
//! ```rust
//! use tea_countdown::key::{Binding, KeyMap};
//! use crossterm::event::KeyCode;
//!
//! struct Keys {
//!     start: Binding,
//! }
//!
//! impl KeyMap for Keys {
//!     fn short_help(&self) -> Vec<&Binding> {
//!         vec![&self.start]
//!     }
//!
//!     fn full_help(&self) -> Vec<Vec<&Binding>> {
//!         vec![vec![&self.start]]
//!     }
//! }
//!
//! let keys = Keys {
//!     start: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start"),
//! };
//! assert_eq!(keys.short_help().len(), 1);
//! ```

pub mod alert;
pub mod app;
pub mod config;
pub mod controls;
pub mod countdown;
pub mod display;
pub mod error;
pub mod help;
pub mod key;
pub mod progress;
pub mod time_input;

use bubbletea_rs::Cmd;

/// Core trait for components that take keyboard focus.
///
/// A focused component receives key messages and shows its active state; a
/// blurred one ignores keys and renders inactive.
///
/// ```rust
/// use tea_countdown::prelude::*;
///
/// let mut input = TimeInput::new(1, 30);
/// assert!(input.focused());
///
/// input.blur();
/// assert!(!input.focused());
///
/// let _cmd = input.focus();
/// assert!(input.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state. May return a command to run.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred state.
    fn blur(&mut self);

    /// Returns whether the component is focused.
    fn focused(&self) -> bool;
}

pub use app::TimerApp;
pub use config::Config;
pub use error::{Error, Result};

/// Prelude module for convenient imports.
///
/// ```rust
/// use tea_countdown::prelude::*;
///
/// let display = classify(42, 60, true);
/// assert_eq!(display.formatted_time, "00:42");
/// ```
pub mod prelude {
    pub use crate::alert::{Notifier, NotificationSink, Permission, Tone, ToneSink};
    pub use crate::app::TimerApp;
    pub use crate::config::Config;
    pub use crate::controls::{Action as ControlAction, Model as Controls};
    pub use crate::countdown::{
        CompletedMsg, Model as Countdown, Status, TickMsg as CountdownTickMsg, TickOutcome,
    };
    pub use crate::display::{classify, format_time, Category, Display};
    pub use crate::help::Model as HelpModel;
    pub use crate::key::{matches, Binding, Help as KeyHelp, KeyMap, KeyPress};
    pub use crate::progress::{new as ring_new, Model as Ring, RingOption};
    pub use crate::time_input::{Field, Model as TimeInput};
    pub use crate::Component;
    pub use crate::{Error, Result};
}
