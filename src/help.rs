//! Key binding help for the countdown.
//!
//! Renders the bindings of a [`KeyMap`] either as a compact single line
//! (`space start • r reset • q quit`) or, with `show_all`, as aligned columns.
//! Disabled bindings are left out, so the help always reflects what the
//! widget accepts right now: while the countdown runs the time-input keys
//! disappear.

use crate::key::{self, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles for the help view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Key names.
    pub key: Style,
    /// Descriptions.
    pub desc: Style,
    /// Separators and the truncation ellipsis.
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        Self {
            key: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            desc: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
            separator: Style::new().foreground(AdaptiveColor {
                Light: "#DDDADA",
                Dark: "#3C3C3C",
            }),
        }
    }
}

/// Help view state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Show the expanded, multi-column help.
    pub show_all: bool,
    /// Maximum width in cells, `0` for unlimited.
    pub width: usize,
    /// Separator between items on the short line.
    pub short_separator: String,
    /// Separator between columns of the full help.
    pub full_separator: String,
    /// Marker appended when items had to be dropped.
    pub ellipsis: String,
    /// Styling.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a compact, unlimited-width help view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the rendered width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Switches between the compact and the expanded view.
    pub fn toggle(&mut self) {
        self.show_all = !self.show_all;
    }

    /// Renders help for `keymap` in the current mode.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// Renders bindings on one line, truncating with an ellipsis when `width`
    /// is exceeded.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        let mut out = String::new();
        let mut total_width = 0;
        for binding in bindings.into_iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let item = format!("{}{}", sep, self.item(binding));
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow(total_width, item_width) {
                out.push_str(&tail);
                break;
            }
            total_width += item_width;
            out.push_str(&item);
        }
        out
    }

    /// Renders each group as a column, skipping groups with nothing enabled.
    pub fn full_help_view(&self, groups: Vec<Vec<&key::Binding>>) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.full_separator);

        let mut columns: Vec<String> = Vec::new();
        let mut total_width = 0;
        for group in groups.iter().filter(|g| should_render_column(g)) {
            let column = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| self.item(b))
                .collect::<Vec<_>>()
                .join("\n");
            let sep_width = if columns.is_empty() {
                0
            } else {
                lipgloss::width_visible(&separator)
            };
            let column_width = lipgloss::width_visible(&column) + sep_width;

            if let Some(tail) = self.overflow(total_width, column_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += column_width;
            columns.push(column);
        }

        let mut parts: Vec<&str> = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(column.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    fn item(&self, binding: &key::Binding) -> String {
        let help = binding.help();
        format!(
            "{} {}",
            self.styles.key.clone().inline(true).render(&help.key),
            self.styles.desc.clone().inline(true).render(&help.desc)
        )
    }

    // Some(tail) when the next item does not fit; the tail is the ellipsis if
    // even that fits, empty otherwise.
    fn overflow(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles
                .separator
                .clone()
                .inline(true)
                .render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}

/// Whether a column has at least one enabled binding.
pub fn should_render_column(bindings: &[&key::Binding]) -> bool {
    bindings.iter().any(|b| b.enabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Binding;
    use crossterm::event::KeyCode;

    fn plain(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    struct Keys {
        start: Binding,
        reset: Binding,
        quit: Binding,
    }

    impl KeyMap for Keys {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.start, &self.reset, &self.quit]
        }

        fn full_help(&self) -> Vec<Vec<&Binding>> {
            vec![vec![&self.start, &self.reset], vec![&self.quit]]
        }
    }

    fn keys() -> Keys {
        Keys {
            start: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "start"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
        }
    }

    #[test]
    fn test_short_help_lists_enabled_bindings() {
        let help = Model::new();
        assert_eq!(plain(&help.view(&keys())), "space start • r reset • q quit");
    }

    #[test]
    fn test_short_help_skips_disabled() {
        let mut k = keys();
        k.reset.set_enabled(false);
        let help = Model::new();
        assert_eq!(plain(&help.view(&k)), "space start • q quit");
    }

    #[test]
    fn test_short_help_truncates_with_ellipsis() {
        let help = Model::new().with_width(24);
        let out = plain(&help.view(&keys()));
        assert!(out.starts_with("space start • r reset"));
        assert!(out.ends_with('…'));
        assert!(!out.contains("quit"));
    }

    #[test]
    fn test_ellipsis_needs_room_to_spare() {
        // "space start • r reset" is 21 columns and " …" needs 2 more.
        let help = Model::new().with_width(23);
        let out = plain(&help.view(&keys()));
        assert_eq!(out, "space start • r reset");
    }

    #[test]
    fn test_full_help_renders_columns() {
        let mut help = Model::new();
        help.toggle();
        let out = plain(&help.view(&keys()));
        assert!(out.contains("space start"));
        assert!(out.contains("r reset"));
        assert!(out.contains("q quit"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_should_render_column() {
        let on = Binding::new(vec![KeyCode::Enter]).with_help("enter", "go");
        let off = Binding::new(vec![KeyCode::Delete]).with_enabled(false);
        assert!(should_render_column(&[&on, &off]));
        assert!(!should_render_column(&[&off]));
        assert!(!should_render_column(&[]));
    }
}
