// Clock module: local time through a strftime format

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;

use super::actions::{ActionMap, Actions, check_formats};
use super::look::{Interval, Look, Paint};
use super::{Face, SharedFace, lock, spawn_driver};
use crate::bar::{Cell, EVENT_CAPACITY, Module, PointerShape, Wiring, wiring};
use crate::error::ModuleError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockOptions {
    pub format: String,
    pub tick: Interval,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
    pub cursor: PointerShape,
    pub onmouse: ActionMap,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d %H:%M:%S".to_string(),
            tick: Interval::from_secs(5),
            fg: None,
            bg: None,
            cursor: PointerShape::Default,
            onmouse: ActionMap::new(),
        }
    }
}

fn check_strftime(format: &str) -> Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid time format \"{}\"", format));
    }
    Ok(())
}

/// Format `time`; an unsupported specifier is a render failure
pub fn format_time<Tz>(format: &str, time: &DateTime<Tz>) -> Result<String, ModuleError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", time.format(format))
        .map_err(|_| ModuleError::Render(format!("invalid time format \"{}\"", format)))?;
    Ok(out)
}

pub struct Clock {
    face: SharedFace,
    tick: Interval,
}

impl Clock {
    pub const NAME: &'static str = "clock";

    pub fn new(options: ClockOptions) -> Result<Self, ModuleError> {
        let invalid = |reason: String| ModuleError::Invalid {
            module: Self::NAME.to_string(),
            reason,
        };
        check_strftime(&options.format).map_err(invalid)?;
        check_formats(&options.onmouse, check_strftime).map_err(invalid)?;

        let look = Look::new(options.format, options.fg, options.bg, options.cursor);
        let actions = Actions::new(options.onmouse, &look);
        Ok(Self {
            face: Face::shared(look, actions),
            tick: options.tick,
        })
    }
}

impl Module for Clock {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self) -> Result<Wiring, ModuleError> {
        let (wiring, ports) = wiring(EVENT_CAPACITY);
        spawn_driver(Self::NAME, ports, self.face.clone(), Some(self.tick.0), || true)?;
        Ok(wiring)
    }

    fn render(&self) -> Result<Vec<Cell>, ModuleError> {
        let face = lock(Self::NAME, &self.face)?;
        let text = format_time(&face.look.format, &Local::now())?;
        Ok(face.look.cells(&text))
    }
}
