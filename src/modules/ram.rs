// Memory usage from the shared system monitor

use humansize::{BINARY, format_size};
use serde::Deserialize;

use super::actions::{ActionMap, Actions, check_formats};
use super::look::{Interval, Look, Paint, Threshold, check_thresholds, threshold_style};
use super::{Face, SharedFace, lock, spawn_driver, template};
use crate::bar::{Cell, EVENT_CAPACITY, Module, PointerShape, Wiring, wiring};
use crate::error::ModuleError;
use crate::services::{SystemMonitor, SystemSnapshot, SystemStats};

const PLACEHOLDERS: &[&str] = &["used", "free", "total", "used_percent", "free_percent"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RamOptions {
    pub format: String,
    pub tick: Interval,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
    pub cursor: PointerShape,
    /// Matched against the used percentage
    pub threshold: Vec<Threshold>,
    pub onmouse: ActionMap,
}

impl Default for RamOptions {
    fn default() -> Self {
        Self {
            format: "mem {used_percent}%".to_string(),
            tick: Interval::from_secs(5),
            fg: None,
            bg: None,
            cursor: PointerShape::Default,
            threshold: Vec::new(),
            onmouse: ActionMap::new(),
        }
    }
}

fn value(snapshot: &SystemSnapshot, name: &str) -> Option<String> {
    let used = snapshot.memory_used_percent();
    match name {
        "used" => Some(format_size(snapshot.used_memory, BINARY)),
        "free" => Some(format_size(snapshot.available_memory, BINARY)),
        "total" => Some(format_size(snapshot.total_memory, BINARY)),
        "used_percent" => Some(used.to_string()),
        "free_percent" => Some((100 - used.min(100)).to_string()),
        _ => None,
    }
}

pub struct Ram {
    face: SharedFace,
    tick: Interval,
    thresholds: Vec<Threshold>,
    stats: SystemStats,
}

impl Ram {
    pub const NAME: &'static str = "ram";

    pub fn new(options: RamOptions, stats: SystemStats) -> Result<Self, ModuleError> {
        let invalid = |reason: String| ModuleError::Invalid {
            module: Self::NAME.to_string(),
            reason,
        };
        template::check(&options.format, PLACEHOLDERS).map_err(invalid)?;
        check_thresholds(&options.threshold).map_err(invalid)?;
        check_formats(&options.onmouse, |f| template::check(f, PLACEHOLDERS)).map_err(invalid)?;

        let look = Look::new(options.format, options.fg, options.bg, options.cursor);
        let actions = Actions::new(options.onmouse, &look);
        Ok(Self {
            face: Face::shared(look, actions),
            tick: options.tick,
            thresholds: options.threshold,
            stats,
        })
    }
}

impl Module for Ram {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn dependencies(&self) -> &[&'static str] {
        &[SystemMonitor::NAME]
    }

    fn run(&mut self) -> Result<Wiring, ModuleError> {
        let (wiring, ports) = wiring(EVENT_CAPACITY);
        spawn_driver(Self::NAME, ports, self.face.clone(), Some(self.tick.0), || true)?;
        Ok(wiring)
    }

    fn render(&self) -> Result<Vec<Cell>, ModuleError> {
        let Some(snapshot) = self.stats.snapshot() else {
            return Ok(Vec::new());
        };

        let face = lock(Self::NAME, &self.face)?;
        let text = template::render(&face.look.format, |name| value(&snapshot, name))?;
        let style = threshold_style(&self.thresholds, snapshot.memory_used_percent(), face.look.style());
        Ok(face.look.cells_styled(&text, style))
    }
}
