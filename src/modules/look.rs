// Appearance shared by the built-in modules, plus option value types

use std::str::FromStr;
use std::time::Duration;

use ratatui::style::{Color, Style};
use serde::Deserialize;

use crate::bar::{Cell, PointerShape, cells_from_str};

/// A colour option: any name or `#rrggbb` ratatui understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Paint(pub Color);

impl TryFrom<String> for Paint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_str(value.trim())
            .map(Paint)
            .map_err(|_| format!("invalid colour: \"{}\"", value))
    }
}

/// A duration option: `500ms`, `5s`, `2m`, `1h`, or a bare number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IntervalSpec")]
pub struct Interval(pub Duration);

#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalSpec {
    Seconds(u64),
    Text(String),
}

impl TryFrom<IntervalSpec> for Interval {
    type Error = String;

    fn try_from(spec: IntervalSpec) -> Result<Self, Self::Error> {
        let duration = match spec {
            IntervalSpec::Seconds(secs) => Duration::from_secs(secs),
            IntervalSpec::Text(text) => parse_duration(&text)?,
        };
        if duration.is_zero() {
            return Err("interval must be greater than zero".to_string());
        }
        Ok(Interval(duration))
    }
}

impl Interval {
    pub fn from_secs(secs: u64) -> Self {
        Interval(Duration::from_secs(secs))
    }
}

fn parse_duration(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, unit) = text.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration: \"{}\"", text))?;

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(value)),
        "" | "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 3600)),
        other => Err(format!("unknown duration unit \"{}\" in \"{}\"", other, text)),
    }
}

/// Current look of a module, mutated by mouse actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Look {
    pub format: String,
    /// `Color::Reset` leaves the terminal's colour alone
    pub fg: Color,
    pub bg: Color,
    pub cursor: PointerShape,
}

impl Look {
    pub fn new(format: impl Into<String>, fg: Option<Paint>, bg: Option<Paint>, cursor: PointerShape) -> Self {
        Self {
            format: format.into(),
            fg: fg.map_or(Color::Reset, |p| p.0),
            bg: bg.map_or(Color::Reset, |p| p.0),
            cursor,
        }
    }

    pub fn style(&self) -> Style {
        let mut style = Style::default();
        if self.fg != Color::Reset {
            style = style.fg(self.fg);
        }
        if self.bg != Color::Reset {
            style = style.bg(self.bg);
        }
        style
    }

    /// Interactive cells for `text` in this look
    pub fn cells(&self, text: &str) -> Vec<Cell> {
        self.cells_styled(text, self.style())
    }

    pub fn cells_styled(&self, text: &str, style: Style) -> Vec<Cell> {
        cells_from_str(text, style)
            .into_iter()
            .map(|c| c.with_pointer(self.cursor))
            .collect()
    }

    pub fn apply(&mut self, overlay: &LookOverlay) {
        if let Some(format) = &overlay.format {
            self.format = format.clone();
        }
        if let Some(fg) = overlay.fg {
            self.fg = fg.0;
        }
        if let Some(bg) = overlay.bg {
            self.bg = bg.0;
        }
        if let Some(cursor) = overlay.cursor {
            self.cursor = cursor;
        }
    }

    /// Overlay that restores every field of `self`
    pub fn capture(&self) -> LookOverlay {
        LookOverlay {
            format: Some(self.format.clone()),
            fg: Some(Paint(self.fg)),
            bg: Some(Paint(self.bg)),
            cursor: Some(self.cursor),
        }
    }

    /// Overlay that restores only the fields `overlay` would change
    pub fn capture_for(&self, overlay: &LookOverlay) -> LookOverlay {
        let all = self.capture();
        LookOverlay {
            format: overlay.format.as_ref().and(all.format),
            fg: overlay.fg.and(all.fg),
            bg: overlay.bg.and(all.bg),
            cursor: overlay.cursor.and(all.cursor),
        }
    }
}

/// Partial look used by `onmouse` config steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookOverlay {
    pub format: Option<String>,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
    pub cursor: Option<PointerShape>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// At or above `percent`
    #[default]
    Up,
    /// At or below `percent`
    Down,
}

/// Colour override once a percentage crosses a limit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Threshold {
    pub percent: u8,
    #[serde(default)]
    pub direction: Direction,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
}

impl Threshold {
    pub fn matches(&self, value: u8) -> bool {
        match self.direction {
            Direction::Up => value >= self.percent,
            Direction::Down => value <= self.percent,
        }
    }
}

/// Patch `base` with the last threshold matching `value`
pub fn threshold_style(thresholds: &[Threshold], value: u8, base: Style) -> Style {
    let Some(hit) = thresholds.iter().rev().find(|t| t.matches(value)) else {
        return base;
    };
    let mut style = base;
    if let Some(fg) = hit.fg {
        style = style.fg(fg.0);
    }
    if let Some(bg) = hit.bg {
        style = style.bg(bg.0);
    }
    style
}

/// Reject thresholds outside 0-100
pub fn check_thresholds(thresholds: &[Threshold]) -> Result<(), String> {
    match thresholds.iter().find(|t| t.percent > 100) {
        Some(t) => Err(format!("threshold percent must be 0-100, got {}", t.percent)),
        None => Ok(()),
    }
}
