//! Circular progress ring.
//!
//! The ring is a loop of cells laid out on an ellipse, starting at twelve
//! o'clock and running clockwise. As a run elapses the filled arc grows in the
//! color of the current [`Category`]; the remaining time sits in the middle.
//!
//! ```rust
//! use tea_countdown::display::classify;
//! use tea_countdown::progress::{new, with_radius, with_segments};
//!
//! let ring = new(&[with_radius(8, 4), with_segments(32)]);
//! let frame = ring.view(&classify(30, 60, true));
//! assert!(frame.contains("00:30"));
//! ```

use lipgloss_extras::lipgloss::Color;
use lipgloss_extras::prelude::*;
use std::f64::consts::TAU;
use unicode_width::UnicodeWidthStr;

use crate::display::{Category, Display};

const DEFAULT_RADIUS_X: usize = 10;
const DEFAULT_RADIUS_Y: usize = 5;
const DEFAULT_SEGMENTS: usize = 48;

/// Text shown under the ring once a run completes.
pub const COMPLETE_BANNER: &str = "Time's up!";

/// Configuration options for the ring.
#[derive(Debug, Clone)]
pub enum RingOption {
    /// Horizontal and vertical radius in cells.
    WithRadius(usize, usize),
    /// Number of cells around the ring.
    WithSegments(usize),
    /// Glyphs for elapsed and remaining cells.
    WithFillCharacters(char, char),
    /// Color of the remaining cells.
    WithEmptyColor(String),
    /// Hides the completion banner.
    WithoutBanner,
}

impl RingOption {
    fn apply(&self, m: &mut Model) {
        match self {
            RingOption::WithRadius(x, y) => {
                // The time text needs at least one free cell on each side.
                m.radius_x = (*x).max(4);
                m.radius_y = (*y).max(2);
            }
            RingOption::WithSegments(n) => m.segments = (*n).max(4),
            RingOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            RingOption::WithEmptyColor(color) => m.empty_color = color.clone(),
            RingOption::WithoutBanner => m.show_banner = false,
        }
    }
}

/// Sets the ring radius.
pub fn with_radius(x: usize, y: usize) -> RingOption {
    RingOption::WithRadius(x, y)
}

/// Sets how many cells make up the ring.
pub fn with_segments(n: usize) -> RingOption {
    RingOption::WithSegments(n)
}

/// Sets the elapsed and remaining glyphs.
pub fn with_fill_characters(full: char, empty: char) -> RingOption {
    RingOption::WithFillCharacters(full, empty)
}

/// Sets the color of the remaining part of the ring.
pub fn with_empty_color(color: impl Into<String>) -> RingOption {
    RingOption::WithEmptyColor(color.into())
}

/// Hides the "Time's up!" banner.
pub fn without_banner() -> RingOption {
    RingOption::WithoutBanner
}

/// Progress ring renderer.
#[derive(Debug, Clone)]
pub struct Model {
    /// Horizontal radius in cells.
    pub radius_x: usize,
    /// Vertical radius in cells.
    pub radius_y: usize,
    /// Cells around the ring.
    pub segments: usize,
    /// Glyph for the elapsed arc.
    pub full: char,
    /// Glyph for the remaining arc.
    pub empty: char,
    /// Color of the remaining arc.
    pub empty_color: String,
    /// Render [`COMPLETE_BANNER`] under a completed ring.
    pub show_banner: bool,
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

/// Creates a ring with defaults and applies `opts` in order.
pub fn new(opts: &[RingOption]) -> Model {
    let mut m = Model {
        radius_x: DEFAULT_RADIUS_X,
        radius_y: DEFAULT_RADIUS_Y,
        segments: DEFAULT_SEGMENTS,
        full: '●',
        empty: '·',
        empty_color: "#606060".to_string(),
        show_banner: true,
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

impl Model {
    /// Number of cells that belong to the elapsed arc at `ratio`.
    pub fn filled_segments(&self, ratio: f64) -> usize {
        let ratio = ratio.clamp(0.0, 1.0);
        ((self.segments as f64) * ratio).round() as usize
    }

    /// Renders one frame.
    pub fn view(&self, display: &Display) -> String {
        let grid = self.layout();
        let filled = self.filled_segments(display.progress_ratio);
        let color = display.category.color();

        let full_cell = Style::new()
            .foreground(color.clone())
            .render(&self.full.to_string());
        let empty_cell = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string());

        let mut time_style = Style::new().foreground(color.clone()).bold(true);
        if display.pulse {
            time_style = time_style.blink(true);
        }
        let time_text = time_style.render(&display.formatted_time);
        let text_width = UnicodeWidthStr::width(display.formatted_time.as_str());
        let text_start = self.radius_x.saturating_sub(text_width / 2);
        let text_end = text_start + text_width;

        let mut lines = Vec::with_capacity(grid.len() + 1);
        for (y, row) in grid.iter().enumerate() {
            let mut line = String::new();
            for (x, cell) in row.iter().enumerate() {
                if y == self.radius_y && (text_start..text_end).contains(&x) {
                    if x == text_start {
                        line.push_str(&time_text);
                    }
                    continue;
                }
                match cell {
                    Some(k) if *k < filled => line.push_str(&full_cell),
                    Some(_) => line.push_str(&empty_cell),
                    None => line.push(' '),
                }
            }
            lines.push(line);
        }

        if self.show_banner && display.category == Category::Complete {
            let banner_width = UnicodeWidthStr::width(COMPLETE_BANNER);
            let pad = (self.radius_x * 2 + 1).saturating_sub(banner_width) / 2;
            let banner = Style::new()
                .foreground(Category::Complete.color())
                .bold(true)
                .render(COMPLETE_BANNER);
            lines.push(format!("{}{}", " ".repeat(pad), banner));
        }

        lines.join("\n")
    }

    // Maps every cell of the bounding box to the segment drawn there, if any.
    fn layout(&self) -> Vec<Vec<Option<usize>>> {
        let width = self.radius_x * 2 + 1;
        let height = self.radius_y * 2 + 1;
        let mut grid = vec![vec![None; width]; height];

        let (rx, ry) = (self.radius_x as f64, self.radius_y as f64);
        for k in 0..self.segments {
            let theta = TAU * (k as f64) / (self.segments as f64);
            let x = (rx + rx * theta.sin()).round() as usize;
            let y = (ry - ry * theta.cos()).round() as usize;
            if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                if cell.is_none() {
                    *cell = Some(k);
                }
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::classify;

    fn plain(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    #[test]
    fn test_defaults() {
        let ring = new(&[]);
        assert_eq!(ring.radius_x, DEFAULT_RADIUS_X);
        assert_eq!(ring.radius_y, DEFAULT_RADIUS_Y);
        assert_eq!(ring.segments, DEFAULT_SEGMENTS);
        assert_eq!(ring.full, '●');
        assert_eq!(ring.empty, '·');
        assert!(ring.show_banner);
    }

    #[test]
    fn test_options_apply_in_order() {
        let ring = new(&[
            with_radius(6, 3),
            with_segments(24),
            with_fill_characters('#', '.'),
            with_empty_color("#111111"),
            without_banner(),
        ]);
        assert_eq!((ring.radius_x, ring.radius_y), (6, 3));
        assert_eq!(ring.segments, 24);
        assert_eq!((ring.full, ring.empty), ('#', '.'));
        assert_eq!(ring.empty_color, "#111111");
        assert!(!ring.show_banner);
    }

    #[test]
    fn test_radius_has_a_floor() {
        let ring = new(&[with_radius(0, 0), with_segments(0)]);
        assert!(ring.radius_x >= 4);
        assert!(ring.radius_y >= 2);
        assert!(ring.segments >= 4);
    }

    #[test]
    fn test_filled_segments() {
        let ring = new(&[with_segments(40)]);
        assert_eq!(ring.filled_segments(0.0), 0);
        assert_eq!(ring.filled_segments(0.5), 20);
        assert_eq!(ring.filled_segments(1.0), 40);
        assert_eq!(ring.filled_segments(3.0), 40);
        assert_eq!(ring.filled_segments(-1.0), 0);
    }

    #[test]
    fn test_frame_dimensions() {
        let ring = new(&[with_radius(8, 4)]);
        let out = plain(&ring.view(&classify(30, 60, true)));
        assert_eq!(out.lines().count(), 9);
        for line in out.lines() {
            assert_eq!(UnicodeWidthStr::width(line), 17);
        }
    }

    #[test]
    fn test_time_text_is_centered() {
        let ring = new(&[]);
        let out = plain(&ring.view(&classify(65, 120, true)));
        let middle = out.lines().nth(DEFAULT_RADIUS_Y).unwrap();
        assert!(middle.contains("01:05"));
    }

    #[test]
    fn test_ring_fills_as_time_elapses() {
        let ring = new(&[]);
        let count = |remaining: u32| {
            plain(&ring.view(&classify(remaining, 60, true)))
                .chars()
                .filter(|c| *c == '●')
                .count()
        };

        assert_eq!(count(60), 0);
        let mut last = 0;
        for remaining in (1..=60).rev() {
            let filled = count(remaining);
            assert!(filled >= last);
            last = filled;
        }
    }

    #[test]
    fn test_complete_ring_is_full_with_banner() {
        let ring = new(&[]);
        let out = plain(&ring.view(&classify(0, 60, false)));
        assert!(!out.contains('·'));
        assert!(out.contains("00:00"));
        assert!(out.lines().last().unwrap().contains(COMPLETE_BANNER));
    }

    #[test]
    fn test_banner_hidden_when_disabled_or_not_complete() {
        let ring = new(&[without_banner()]);
        assert!(!plain(&ring.view(&classify(0, 60, false))).contains(COMPLETE_BANNER));

        let ring = new(&[]);
        assert!(!plain(&ring.view(&classify(3, 60, true))).contains(COMPLETE_BANNER));
    }
}
