//! Duration entry for the countdown.
//!
//! Two integer fields, minutes (0–99) and seconds (0–59), edited with the
//! keyboard. Every edit is clamped to the field's range, so the model can never
//! hold an invalid duration:
//!
//! - digits typed into the focused field are appended and re-parsed, Backspace
//!   drops the last digit;
//! - Up/Down (or `+`/`-`) step the focused field and stop at the bounds;
//! - F1–F4 load the 5, 10, 15 and 30 minute presets, replacing both fields.
//!
//! While the countdown runs the input is disabled and ignores every message.
//!
//! ```rust
//! use tea_countdown::time_input::Model;
//!
//! let mut input = Model::new(5, 0);
//! input.set_minutes_str("150");
//! input.set_seconds_str("-5");
//! assert_eq!((input.minutes(), input.seconds()), (99, 0));
//! assert_eq!(input.total_seconds(), 99 * 60);
//! ```

use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::Color;
use lipgloss_extras::prelude::*;

use crate::key::{self, Binding, KeyPress};
use crate::Component;

/// Largest value of the minutes field.
pub const MAX_MINUTES: u32 = 99;

/// Largest value of the seconds field.
pub const MAX_SECONDS: u32 = 59;

/// Preset durations in minutes.
pub const PRESETS: [u32; 4] = [5, 10, 15, 30];

/// Which field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    /// The minutes field.
    #[default]
    Minutes,
    /// The seconds field.
    Seconds,
}

impl Field {
    fn other(self) -> Self {
        match self {
            Field::Minutes => Field::Seconds,
            Field::Seconds => Field::Minutes,
        }
    }

    fn max(self) -> u32 {
        match self {
            Field::Minutes => MAX_MINUTES,
            Field::Seconds => MAX_SECONDS,
        }
    }
}

/// Parses the leading integer of `s` the way a numeric text field does.
///
/// Leading whitespace and one sign are accepted, then as many digits as
/// follow. Anything unparseable yields `0`. Very long inputs saturate.
///
/// ```rust
/// use tea_countdown::time_input::parse_leading_int;
///
/// assert_eq!(parse_leading_int("42"), 42);
/// assert_eq!(parse_leading_int("  -7"), -7);
/// assert_eq!(parse_leading_int("12abc"), 12);
/// assert_eq!(parse_leading_int("abc"), 0);
/// assert_eq!(parse_leading_int(""), 0);
/// ```
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -value
    } else {
        value
    }
}

fn clamp_field(value: i64, max: u32) -> u32 {
    // The clamp keeps the value inside u32 range.
    value.clamp(0, i64::from(max)) as u32
}

/// Key bindings for the time input.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move focus to the next field.
    pub next_field: Binding,
    /// Move focus to the previous field.
    pub prev_field: Binding,
    /// Add one to the focused field.
    pub increment: Binding,
    /// Subtract one from the focused field.
    pub decrement: Binding,
    /// Remove the last digit of the focused field.
    pub delete_digit: Binding,
    /// Preset keys, in [`PRESETS`] order.
    pub presets: [Binding; 4],
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next_field: Binding::new(vec![KeyCode::Tab, KeyCode::Right])
                .with_help("tab", "next field"),
            prev_field: Binding::new(vec![
                KeyPress::from(KeyCode::BackTab),
                KeyPress::from((KeyCode::BackTab, KeyModifiers::SHIFT)),
                KeyPress::from(KeyCode::Left),
            ])
            .with_help("shift+tab", "prev field"),
            increment: Binding::new(vec![KeyCode::Up, KeyCode::Char('+')])
                .with_help("↑/+", "increase"),
            decrement: Binding::new(vec![KeyCode::Down, KeyCode::Char('-')])
                .with_help("↓/-", "decrease"),
            delete_digit: Binding::new(vec![KeyCode::Backspace]).with_help("⌫", "delete digit"),
            presets: [
                Binding::new(vec![KeyCode::F(1)]).with_help("f1", "5 min"),
                Binding::new(vec![KeyCode::F(2)]).with_help("f2", "10 min"),
                Binding::new(vec![KeyCode::F(3)]).with_help("f3", "15 min"),
                Binding::new(vec![KeyCode::F(4)]).with_help("f4", "30 min"),
            ],
        }
    }
}

impl KeyMap {
    fn set_enabled(&mut self, enabled: bool) {
        self.next_field.set_enabled(enabled);
        self.prev_field.set_enabled(enabled);
        self.increment.set_enabled(enabled);
        self.decrement.set_enabled(enabled);
        self.delete_digit.set_enabled(enabled);
        for preset in &mut self.presets {
            preset.set_enabled(enabled);
        }
    }
}

impl key::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next_field, &self.increment, &self.decrement]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![
                &self.next_field,
                &self.prev_field,
                &self.increment,
                &self.decrement,
                &self.delete_digit,
            ],
            self.presets.iter().collect(),
        ]
    }
}

/// Styles for the time input.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Field labels.
    pub label: Style,
    /// The focused field's value.
    pub focused: Style,
    /// Unfocused values.
    pub blurred: Style,
    /// Everything while disabled.
    pub disabled: Style,
    /// The preset legend.
    pub legend: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            label: Style::new().foreground(Color::from("#A49FA5")),
            focused: Style::new().foreground(Color::from("#7571F9")).bold(true),
            blurred: Style::new().foreground(Color::from("#DDDDDD")),
            disabled: Style::new().foreground(Color::from("#4A4A4A")),
            legend: Style::new().foreground(Color::from("#626262")),
        }
    }
}

/// Minutes/seconds input.
#[derive(Debug, Clone)]
pub struct Model {
    /// Key bindings.
    pub keymap: KeyMap,
    /// Styling.
    pub styles: Styles,

    minutes: u32,
    seconds: u32,
    field: Field,
    focus: bool,
    disabled: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(5, 0)
    }
}

impl Model {
    /// Creates an input holding `minutes:seconds`, clamped, with focus on the
    /// minutes field.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            keymap: KeyMap::default(),
            styles: Styles::default(),
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
            field: Field::Minutes,
            focus: true,
            disabled: false,
        }
    }

    /// Minutes field.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Seconds field.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The duration in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    /// Whether a non-zero duration is set.
    pub fn has_time(&self) -> bool {
        self.total_seconds() > 0
    }

    /// The focused field.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Focuses a specific field.
    pub fn set_field(&mut self, field: Field) {
        self.field = field;
    }

    /// Whether edits are currently refused.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Refuses or accepts edits. Disabled inputs also hide their key help.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.keymap.set_enabled(!disabled);
    }

    /// Sets minutes from free text. Returns `false` when disabled.
    pub fn set_minutes_str(&mut self, text: &str) -> bool {
        self.set_str(Field::Minutes, text)
    }

    /// Sets seconds from free text. Returns `false` when disabled.
    pub fn set_seconds_str(&mut self, text: &str) -> bool {
        self.set_str(Field::Seconds, text)
    }

    /// Adds one to `field`, stopping at its maximum.
    pub fn increment(&mut self, field: Field) -> bool {
        let value = self.value(field);
        self.set_value(field, (value + 1).min(field.max()))
    }

    /// Subtracts one from `field`, stopping at zero.
    pub fn decrement(&mut self, field: Field) -> bool {
        let value = self.value(field);
        self.set_value(field, value.saturating_sub(1))
    }

    /// Loads a preset: `minutes` minutes and zero seconds.
    pub fn apply_preset(&mut self, minutes: u32) -> bool {
        if self.disabled {
            return false;
        }
        self.minutes = minutes.min(MAX_MINUTES);
        self.seconds = 0;
        true
    }

    /// Appends a digit to the focused field, as typing into it would.
    pub fn push_digit(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            return false;
        }
        let text = format!("{}{}", self.value(self.field), digit);
        self.set_str(self.field, &text)
    }

    /// Drops the last digit of the focused field.
    pub fn pop_digit(&mut self) -> bool {
        let mut text = self.value(self.field).to_string();
        text.pop();
        self.set_str(self.field, &text)
    }

    /// Handles key messages. Never produces a command.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if self.disabled || !self.focus {
            return None;
        }
        let key_msg = msg.downcast_ref::<KeyMsg>()?;

        if self.keymap.next_field.matches(key_msg) || self.keymap.prev_field.matches(key_msg) {
            self.field = self.field.other();
        } else if self.keymap.increment.matches(key_msg) {
            self.increment(self.field);
        } else if self.keymap.decrement.matches(key_msg) {
            self.decrement(self.field);
        } else if self.keymap.delete_digit.matches(key_msg) {
            self.pop_digit();
        } else if let Some(i) = self.keymap.presets.iter().position(|b| b.matches(key_msg)) {
            self.apply_preset(PRESETS[i]);
        } else if let KeyCode::Char(c) = key_msg.key {
            if key_msg.modifiers.is_empty() {
                self.push_digit(c);
            }
        }
        None
    }

    /// Renders the two fields and the preset legend.
    pub fn view(&self) -> String {
        let value_style = |field: Field| {
            if self.disabled {
                self.styles.disabled.clone()
            } else if self.focus && self.field == field {
                self.styles.focused.clone()
            } else {
                self.styles.blurred.clone()
            }
        };
        let render_field = |field: Field| {
            let value = format!("{:02}", self.value(field));
            let boxed = if self.focus && self.field == field && !self.disabled {
                format!("▸ {} ◂", value)
            } else {
                format!("  {}  ", value)
            };
            value_style(field).render(&boxed)
        };

        let labels = self.styles.label.render("Minutes    Seconds");
        let fields = format!(
            "{}  :  {}",
            render_field(Field::Minutes),
            render_field(Field::Seconds)
        );
        let legend = PRESETS
            .iter()
            .enumerate()
            .map(|(i, m)| format!("f{} {} min", i + 1, m))
            .collect::<Vec<_>>()
            .join(" · ");

        format!(
            "{}\n{}\n{}",
            labels,
            fields,
            self.styles.legend.render(&legend)
        )
    }

    fn value(&self, field: Field) -> u32 {
        match field {
            Field::Minutes => self.minutes,
            Field::Seconds => self.seconds,
        }
    }

    fn set_value(&mut self, field: Field, value: u32) -> bool {
        if self.disabled {
            return false;
        }
        let value = value.min(field.max());
        match field {
            Field::Minutes => self.minutes = value,
            Field::Seconds => self.seconds = value,
        }
        true
    }

    fn set_str(&mut self, field: Field, text: &str) -> bool {
        let value = clamp_field(parse_leading_int(text), field.max());
        self.set_value(field, value)
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }) as Msg
    }

    #[test]
    fn test_defaults() {
        let input = Model::default();
        assert_eq!((input.minutes(), input.seconds()), (5, 0));
        assert_eq!(input.field(), Field::Minutes);
        assert!(input.focused());
        assert!(!input.disabled());
    }

    #[test]
    fn test_new_clamps() {
        let input = Model::new(500, 500);
        assert_eq!((input.minutes(), input.seconds()), (99, 59));
    }

    #[test]
    fn test_direct_entry_clamps_and_defaults() {
        let mut input = Model::new(0, 0);
        input.set_minutes_str("150");
        assert_eq!(input.minutes(), 99);
        input.set_seconds_str("-5");
        assert_eq!(input.seconds(), 0);
        input.set_seconds_str("abc");
        assert_eq!(input.seconds(), 0);
        input.set_seconds_str("42xyz");
        assert_eq!(input.seconds(), 42);
        input.set_seconds_str("99999999999999999999999");
        assert_eq!(input.seconds(), 59);
    }

    #[test]
    fn test_step_saturates() {
        let mut input = Model::new(0, 59);
        input.decrement(Field::Minutes);
        assert_eq!(input.minutes(), 0);
        input.increment(Field::Seconds);
        assert_eq!(input.seconds(), 59);

        let mut input = Model::new(99, 0);
        input.increment(Field::Minutes);
        assert_eq!(input.minutes(), 99);
        input.decrement(Field::Seconds);
        assert_eq!(input.seconds(), 0);
    }

    #[test]
    fn test_preset_overwrites() {
        let mut input = Model::new(42, 17);
        input.apply_preset(10);
        assert_eq!((input.minutes(), input.seconds()), (10, 0));
    }

    #[test]
    fn test_typing_digits() {
        let mut input = Model::new(0, 0);
        input.push_digit('7');
        assert_eq!(input.minutes(), 7);
        input.push_digit('5');
        assert_eq!(input.minutes(), 75);
        input.push_digit('3');
        assert_eq!(input.minutes(), 99);
        input.pop_digit();
        assert_eq!(input.minutes(), 9);
        input.pop_digit();
        assert_eq!(input.minutes(), 0);
        assert!(!input.push_digit('x'));
    }

    #[test]
    fn test_disabled_refuses_everything() {
        let mut input = Model::new(3, 4);
        input.set_disabled(true);
        assert!(!input.set_minutes_str("10"));
        assert!(!input.increment(Field::Minutes));
        assert!(!input.decrement(Field::Seconds));
        assert!(!input.apply_preset(30));
        assert!(!input.push_digit('1'));
        input.update(&key(KeyCode::Up));
        input.update(&key(KeyCode::F(4)));
        assert_eq!((input.minutes(), input.seconds()), (3, 4));

        input.set_disabled(false);
        assert!(input.apply_preset(30));
        assert_eq!(input.minutes(), 30);
    }

    #[test]
    fn test_key_handling() {
        let mut input = Model::new(1, 0);
        input.update(&key(KeyCode::Up));
        assert_eq!(input.minutes(), 2);
        input.update(&key(KeyCode::Tab));
        assert_eq!(input.field(), Field::Seconds);
        input.update(&key(KeyCode::Char('4')));
        input.update(&key(KeyCode::Char('5')));
        assert_eq!(input.seconds(), 45);
        input.update(&key(KeyCode::Down));
        assert_eq!(input.seconds(), 44);
        input.update(&key(KeyCode::Backspace));
        assert_eq!(input.seconds(), 4);
        input.update(&key(KeyCode::BackTab));
        assert_eq!(input.field(), Field::Minutes);
        input.update(&key(KeyCode::F(3)));
        assert_eq!((input.minutes(), input.seconds()), (15, 0));
    }

    #[test]
    fn test_blurred_input_ignores_keys() {
        let mut input = Model::new(1, 0);
        input.blur();
        input.update(&key(KeyCode::Up));
        assert_eq!(input.minutes(), 1);
        let _ = input.focus();
        input.update(&key(KeyCode::Up));
        assert_eq!(input.minutes(), 2);
    }

    #[test]
    fn test_view_shows_values_and_presets() {
        let input = Model::new(7, 5);
        let out = strip_ansi_escapes::strip_str(input.view());
        assert!(out.contains("Minutes"));
        assert!(out.contains("07"));
        assert!(out.contains("05"));
        assert!(out.contains("f4 30 min"));
        assert!(out.contains("▸ 07 ◂"));
    }

    #[test]
    fn test_disabled_hides_help() {
        use crate::key::KeyMap as _;
        let mut input = Model::new(1, 0);
        input.set_disabled(true);
        assert!(input.keymap.short_help().iter().all(|b| !b.enabled()));
    }
}
