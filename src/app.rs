//! The countdown widget, assembled.
//!
//! [`TimerApp`] is a `bubbletea_rs::Model` wiring the time input, the
//! countdown engine, the progress ring, the controls and the alert notifier
//! together. Messages flow one way: the input's duration starts the engine,
//! every tick re-renders the ring, and the completion message raises the
//! alert. Reset brings the input back.
//!
//! ```rust,no_run
//! use tea_countdown::{app, Config};
//!
//! #[tokio::main]
//! async fn main() -> tea_countdown::Result<()> {
//!     app::run(Config::default()).await
//! }
//! ```

use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::Color;
use lipgloss_extras::prelude::*;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::alert::{DesktopNotifications, Notifier, RodioTones};
use crate::config::Config;
use crate::controls::{self, Action};
use crate::countdown::{self, CompletedMsg};
use crate::display::classify;
use crate::error::{Error, Result};
use crate::help;
use crate::key::{self, Binding, KeyMap as _, KeyPress};
use crate::progress;
use crate::time_input;

// `Model::init` takes no arguments; `run` leaves the configuration here.
static LAUNCH_CONFIG: OnceCell<Config> = OnceCell::new();

/// Shown when no duration is set.
pub const INSTRUCTION: &str = "Set a time above to start your timer";

/// Shown while sound alerts are muted.
pub const MUTED_NOTICE: &str = "Sound alerts are muted";

/// Application-level key bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Toggle sound alerts.
    pub mute: Binding,
    /// Toggle the expanded help.
    pub help: Binding,
    /// Leave the program.
    pub quit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            mute: Binding::new(vec![KeyCode::Char('m')]).with_help("m", "mute"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "help"),
            quit: Binding::new(vec![
                KeyPress::from(KeyCode::Char('q')),
                KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL)),
            ])
            .with_help("q", "quit"),
        }
    }
}

/// The countdown widget.
#[derive(Debug)]
pub struct TimerApp {
    /// Duration entry.
    pub input: time_input::Model,
    /// Countdown engine.
    pub engine: countdown::Model,
    /// Progress ring.
    pub ring: progress::Model,
    /// Start/pause/reset.
    pub controls: controls::Model,
    /// Completion alerts.
    pub notifier: Notifier,
    /// Key help.
    pub help: help::Model,
    /// Application keys.
    pub keymap: KeyMap,

    completions: usize,
    quitting: bool,
}

impl TimerApp {
    /// Builds the widget from configuration and an alert notifier.
    ///
    /// The notifier is asked for notification permission here, the first
    /// time the widget exists.
    pub fn new(config: &Config, notifier: Notifier) -> Self {
        Self::with_interval(config, notifier, countdown::DEFAULT_INTERVAL)
    }

    /// Like [`TimerApp::new`] with a custom tick interval.
    pub fn with_interval(config: &Config, mut notifier: Notifier, interval: Duration) -> Self {
        notifier.on_shown();
        let mut app = Self {
            input: time_input::Model::new(config.minutes, config.seconds),
            engine: countdown::Model::with_interval(interval),
            ring: progress::new(&[]),
            controls: controls::Model::new(),
            notifier,
            help: help::Model::new(),
            keymap: KeyMap::default(),
            completions: 0,
            quitting: false,
        };
        app.sync();
        app
    }

    /// Completion alerts raised so far.
    pub fn completions(&self) -> usize {
        self.completions
    }

    /// Whether quit was requested.
    pub fn quitting(&self) -> bool {
        self.quitting
    }

    /// Whether the duration input is on screen.
    pub fn input_visible(&self) -> bool {
        !self.engine.active()
    }

    /// Whether the ring is on screen.
    pub fn ring_visible(&self) -> bool {
        self.engine.active() || self.engine.running() || self.engine.completed()
    }

    /// Performs a control action.
    pub fn apply(&mut self, action: Action) -> Option<Cmd> {
        debug!(?action, "control action");
        let cmd = match action {
            Action::Start => self.engine.start(self.input.total_seconds()),
            Action::Pause => {
                self.engine.pause();
                None
            }
            Action::Reset => {
                self.engine.reset();
                None
            }
        };
        self.sync();
        cmd
    }

    fn handle_key(&mut self, key_msg: &KeyMsg, msg: &Msg) -> Option<Cmd> {
        if self.keymap.quit.matches(key_msg) {
            self.engine.cancel();
            self.quitting = true;
            return Some(quit());
        }
        if self.keymap.mute.matches(key_msg) {
            self.notifier.toggle_mute();
            return None;
        }
        if self.keymap.help.matches(key_msg) {
            self.help.toggle();
            return None;
        }
        if let Some(action) = self.controls.update(msg) {
            return self.apply(action);
        }
        if self.input_visible() {
            self.input.update(msg);
            self.sync();
        }
        None
    }

    fn on_completed(&mut self) {
        self.completions += 1;
        self.notifier.on_completed();
        self.sync();
    }

    // Pushes engine and input state into the dependent components.
    fn sync(&mut self) {
        self.input.set_disabled(self.engine.running());
        self.controls.sync(controls::State {
            running: self.engine.running(),
            has_time: self.input.has_time(),
            active: self.engine.active(),
            has_run: self.engine.total() > 0,
        });
    }

    fn header(&self) -> String {
        let title = Style::new().bold(true).render("Timer");
        let sound = if self.notifier.muted() {
            Style::new().foreground(Color::from("#E5484D")).render("🔇 muted")
        } else {
            Style::new().foreground(Color::from("#626262")).render("🔊 sound on")
        };
        format!("{}    {}", title, sound)
    }
}

impl key::KeyMap for TimerApp {
    fn short_help(&self) -> Vec<&Binding> {
        let mut bindings = vec![&self.controls.keymap.toggle, &self.controls.keymap.reset];
        if self.input_visible() {
            bindings.push(&self.input.keymap.next_field);
            bindings.push(&self.input.keymap.increment);
        }
        bindings.extend([&self.keymap.mute, &self.keymap.help, &self.keymap.quit]);
        bindings
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        let mut groups = self.controls.keymap.full_help();
        if self.input_visible() {
            groups.extend(self.input.keymap.full_help());
        }
        groups.push(vec![&self.keymap.mute, &self.keymap.help, &self.keymap.quit]);
        groups
    }
}

impl BubbleTeaModel for TimerApp {
    fn init() -> (Self, Option<Cmd>) {
        let config = LAUNCH_CONFIG.get().cloned().unwrap_or_default();
        let notifier = Notifier::new(
            Arc::new(RodioTones),
            Arc::new(DesktopNotifications::new(config.notifications)),
        )
        .with_muted(config.muted);
        (TimerApp::new(&config, notifier), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg, &msg);
        }

        if let Some(completed) = msg.downcast_ref::<CompletedMsg>() {
            if completed.id == self.engine.id() {
                self.on_completed();
            }
            return None;
        }

        let cmd = self.engine.update(msg);
        self.sync();
        cmd
    }

    fn view(&self) -> String {
        let mut sections = vec![self.header()];

        if self.input_visible() {
            sections.push(self.input.view());
        }
        if self.ring_visible() {
            let display = classify(
                self.engine.remaining(),
                self.engine.total(),
                self.engine.running(),
            );
            sections.push(self.ring.view(&display));
        }
        sections.push(self.controls.view());

        let notice = Style::new().foreground(Color::from("#A49FA5"));
        if !self.input.has_time() && !self.engine.active() {
            sections.push(notice.render(INSTRUCTION));
        }
        if self.notifier.muted() {
            sections.push(notice.render(MUTED_NOTICE));
        }

        sections.push(self.help.view(self));
        sections.join("\n\n")
    }
}

/// Runs the widget full-screen until the user quits.
pub async fn run(config: Config) -> Result<()> {
    info!(
        minutes = config.minutes,
        seconds = config.seconds,
        muted = config.muted,
        "starting countdown"
    );
    if LAUNCH_CONFIG.set(config).is_err() {
        debug!("configuration already set, keeping the first one");
    }

    let program = Program::<TimerApp>::builder()
        .alt_screen(true)
        .build()
        .map_err(|e| Error::Program(e.to_string()))?;
    program
        .run()
        .await
        .map_err(|e| Error::Program(e.to_string()))?;

    info!("countdown closed");
    Ok(())
}
