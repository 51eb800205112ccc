//! Display classification for the countdown.
//!
//! Everything the countdown shows on screen is derived from two numbers: the
//! seconds still remaining and the seconds the run started with. This module
//! turns that pair into the formatted time text, the progress ratio that drives
//! the ring, and an urgency [`Category`] that picks colors and decides when the
//! time text should pulse.
//!
//! The functions here are pure. They hold no state and can be called on every
//! render.
//!
//! # Examples
//!
//! ```rust
//! use tea_countdown::display::{classify, Category};
//!
//! let d = classify(4, 60, true);
//! assert_eq!(d.formatted_time, "00:04");
//! assert_eq!(d.category, Category::Critical);
//! assert!(d.pulse);
//!
//! let done = classify(0, 60, false);
//! assert_eq!(done.category, Category::Complete);
//! assert_eq!(done.progress_ratio, 1.0);
//! ```

use lipgloss_extras::lipgloss::Color;

/// Upper bound (inclusive) of the critical band, in seconds.
pub const CRITICAL_THRESHOLD: u32 = 5;

/// Upper bound (inclusive) of the low band, in seconds.
pub const LOW_THRESHOLD: u32 = 10;

/// Urgency classification of the remaining time.
///
/// Exactly one category applies to any `(remaining, total)` pair:
///
/// | Category   | Condition                         |
/// |------------|-----------------------------------|
/// | `Complete` | `remaining == 0` and `total > 0`  |
/// | `Critical` | `1 <= remaining <= 5`             |
/// | `Low`      | `6 <= remaining <= 10`            |
/// | `Normal`   | anything else                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Plenty of time left, or no run has been started.
    #[default]
    Normal,
    /// Ten seconds or less.
    Low,
    /// Five seconds or less.
    Critical,
    /// The run reached zero.
    Complete,
}

impl Category {
    /// Foreground color used for the time text and the filled ring cells.
    pub fn color(self) -> Color {
        Color::from(self.hex())
    }

    /// Hex code behind [`Category::color`].
    pub fn hex(self) -> &'static str {
        match self {
            Category::Normal => "#7571F9",
            Category::Low => "#F5A524",
            Category::Critical => "#E5484D",
            Category::Complete => "#30A46C",
        }
    }

    /// Short label used in log fields.
    pub fn label(self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Low => "low",
            Category::Critical => "critical",
            Category::Complete => "complete",
        }
    }
}

/// Everything needed to draw one frame of the countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    /// Remaining time as zero-padded `MM:SS`.
    pub formatted_time: String,
    /// Elapsed fraction of the run in `[0.0, 1.0]`.
    pub progress_ratio: f64,
    /// Urgency classification.
    pub category: Category,
    /// Whether the time text should pulse.
    pub pulse: bool,
}

/// Formats a number of seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours; the widget never counts past 99:59.
///
/// ```rust
/// use tea_countdown::display::format_time;
///
/// assert_eq!(format_time(0), "00:00");
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(99 * 60 + 59), "99:59");
/// ```
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed fraction of a run, `0.0` when no run has been started.
pub fn progress_ratio(remaining: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let elapsed = total.saturating_sub(remaining);
    (f64::from(elapsed) / f64::from(total)).clamp(0.0, 1.0)
}

/// Classifies the remaining time into a [`Category`].
pub fn category(remaining: u32, total: u32) -> Category {
    match remaining {
        0 if total > 0 => Category::Complete,
        0 => Category::Normal,
        r if r <= CRITICAL_THRESHOLD => Category::Critical,
        r if r <= LOW_THRESHOLD => Category::Low,
        _ => Category::Normal,
    }
}

/// Derives the full [`Display`] for a frame.
///
/// `is_running` only affects `pulse`: a paused countdown in the critical band
/// keeps its color but stops pulsing.
pub fn classify(remaining: u32, total: u32, is_running: bool) -> Display {
    let category = category(remaining, total);
    Display {
        formatted_time: format_time(remaining),
        progress_ratio: progress_ratio(remaining, total),
        category,
        pulse: is_running && (1..=CRITICAL_THRESHOLD).contains(&remaining),
    }
}
