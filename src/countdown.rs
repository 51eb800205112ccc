//! Countdown engine for Bubble Tea applications.
//!
//! The engine owns the remaining time of a run, its status and the single live
//! tick schedule. It counts down in whole seconds and reports completion
//! exactly once per run.
//!
//! # Basic Usage
//!
//! The engine can be driven directly, which is how the state machine is
//! tested:
//!
//! ```rust
//! use tea_countdown::countdown::{Model, Status, TickOutcome};
//!
//! let mut engine = Model::new();
//! assert!(engine.start(3).is_some());
//!
//! assert_eq!(engine.tick(), TickOutcome::Ticked);
//! assert_eq!(engine.tick(), TickOutcome::Ticked);
//! assert_eq!(engine.tick(), TickOutcome::Completed);
//! assert_eq!(engine.tick(), TickOutcome::Ignored);
//!
//! assert_eq!(engine.remaining(), 0);
//! assert_eq!(engine.status(), Status::Idle);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use tea_countdown::countdown::{CompletedMsg, Model};
//!
//! struct MyApp {
//!     engine: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut engine = Model::new();
//!         let cmd = engine.start(10);
//!         (Self { engine, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(completed) = msg.downcast_ref::<CompletedMsg>() {
//!             if completed.id == self.engine.id() {
//!                 self.done = true;
//!                 return None;
//!             }
//!         }
//!         self.engine.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.engine.view()
//!     }
//! }
//! ```
//!
//! # Tick handles
//!
//! Every `start` installs a new tick handle, a tag that travels inside each
//! [`TickMsg`]. Pausing, resetting and completing clear the handle. A tick that
//! arrives carrying any other tag belongs to a schedule that was cancelled and
//! is dropped, so at most one schedule ever mutates the engine.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::display::{category, format_time};

// Internal ID management for engine instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default time between ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle status of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// No run is counting. Also the state after a run completes.
    #[default]
    Idle,
    /// A run is counting down.
    Running,
    /// A run was halted; its values are kept for display.
    Paused,
}

/// Result of a single [`Model::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Ignored,
    /// One second was taken off and time remains.
    Ticked,
    /// One second was taken off and the run reached zero.
    Completed,
}

/// Message sent once per interval while a run is counting.
///
/// Only the engine with the matching `id`, holding the tick handle named by
/// the private tag, acts on it.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The engine this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// Message sent when a run reaches zero.
///
/// Delivered once per run, after the tick that brought the remaining time to
/// zero.
#[derive(Debug, Clone)]
pub struct CompletedMsg {
    /// The engine that completed.
    pub id: i64,
}

/// Handle of the one live tick schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TickHandle(i64);

/// Countdown engine.
///
/// Holds `remaining <= total` at all times. `total` is fixed for the lifetime
/// of a run: set by [`Model::start`], cleared by [`Model::reset`].
#[derive(Debug, Clone)]
pub struct Model {
    /// The time between ticks. One second unless overridden.
    pub interval: Duration,

    id: i64,
    remaining: u32,
    total: u32,
    status: Status,
    handle: Option<TickHandle>,
    last_tag: i64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an idle engine ticking once per second.
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_INTERVAL)
    }

    /// Creates an idle engine with a custom tick interval.
    ///
    /// The engine still takes one second off per tick; the interval only
    /// controls how often ticks are scheduled.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            id: next_id(),
            remaining: 0,
            total: 0,
            status: Status::Idle,
            handle: None,
            last_tag: 0,
        }
    }

    /// Unique identifier used to route tick and completion messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Seconds left in the current run.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds the current run started with, `0` when no run exists.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the engine is counting down.
    pub fn running(&self) -> bool {
        self.status == Status::Running
    }

    /// Whether a run has time on the clock, running or paused.
    pub fn active(&self) -> bool {
        self.remaining > 0
    }

    /// Whether the last run counted all the way down and has not been reset.
    pub fn completed(&self) -> bool {
        self.status == Status::Idle && self.total > 0 && self.remaining == 0
    }

    /// Whether a tick schedule is currently installed.
    pub fn has_pending_tick(&self) -> bool {
        self.handle.is_some()
    }

    /// Starts a fresh run of `seconds`.
    ///
    /// Any run in progress, running or paused, is discarded. Returns the
    /// command scheduling the first tick, or `None` when `seconds` is zero, in
    /// which case nothing changes.
    pub fn start(&mut self, seconds: u32) -> Option<Cmd> {
        if seconds == 0 {
            debug!(engine = self.id, "ignoring start with an empty duration");
            return None;
        }

        self.total = seconds;
        self.remaining = seconds;
        self.status = Status::Running;
        let handle = self.install_handle();
        debug!(engine = self.id, seconds, tag = handle.0, "countdown started");

        Some(self.tick_cmd(handle))
    }

    /// Halts a running countdown, keeping its values.
    ///
    /// Returns `false` when the engine was not running.
    pub fn pause(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.status = Status::Paused;
        self.cancel();
        debug!(engine = self.id, remaining = self.remaining, "countdown paused");
        true
    }

    /// Returns to idle with no run, whatever the prior status.
    pub fn reset(&mut self) {
        self.cancel();
        self.status = Status::Idle;
        self.remaining = 0;
        self.total = 0;
        debug!(engine = self.id, "countdown reset");
    }

    /// Clears the tick handle so in-flight ticks are dropped.
    ///
    /// Used on teardown; the transitions above call it themselves.
    pub fn cancel(&mut self) {
        self.handle = None;
    }

    /// Takes one second off a running countdown.
    ///
    /// This is the state machine step behind every honoured [`TickMsg`]. It
    /// does nothing unless the engine is running with time left. The call
    /// that brings the remaining time to zero returns
    /// [`TickOutcome::Completed`]; there is never a second one for that run.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != Status::Running || self.remaining == 0 {
            return TickOutcome::Ignored;
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            debug!(
                engine = self.id,
                remaining = self.remaining,
                category = category(self.remaining, self.total).label(),
                "tick"
            );
            return TickOutcome::Ticked;
        }

        self.status = Status::Idle;
        self.cancel();
        debug!(engine = self.id, total = self.total, "countdown completed");
        TickOutcome::Completed
    }

    /// Handles tick messages addressed to this engine.
    ///
    /// Returns the next tick command while the run continues, or a command
    /// delivering [`CompletedMsg`] when it finishes. Foreign, stale and
    /// unrelated messages yield `None`.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let tick_msg = msg.downcast_ref::<TickMsg>()?;
        if tick_msg.id != self.id {
            return None;
        }

        // A tick from a cancelled schedule must not double-count time.
        let handle = self.handle?;
        if tick_msg.tag != handle.0 {
            return None;
        }

        match self.tick() {
            TickOutcome::Ticked => Some(self.tick_cmd(handle)),
            TickOutcome::Completed => Some(self.completed_cmd()),
            TickOutcome::Ignored => None,
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn view(&self) -> String {
        format_time(self.remaining)
    }

    fn install_handle(&mut self) -> TickHandle {
        self.last_tag += 1;
        let handle = TickHandle(self.last_tag);
        self.handle = Some(handle);
        handle
    }

    fn tick_cmd(&self, handle: TickHandle) -> Cmd {
        let id = self.id;
        let tag = handle.0;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn completed_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(CompletedMsg { id }) as Msg
        })
    }

    #[cfg(test)]
    fn current_tick(&self) -> Option<TickMsg> {
        self.handle.map(|handle| TickMsg {
            id: self.id,
            tag: handle.0,
        })
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
