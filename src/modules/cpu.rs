// CPU usage from the shared system monitor

use serde::Deserialize;

use super::actions::{ActionMap, Actions, check_formats};
use super::look::{Interval, Look, Paint, Threshold, check_thresholds, threshold_style};
use super::{Face, SharedFace, lock, spawn_driver, template};
use crate::bar::{Cell, EVENT_CAPACITY, Module, PointerShape, Wiring, wiring};
use crate::error::ModuleError;
use crate::services::{SystemMonitor, SystemStats};

const PLACEHOLDERS: &[&str] = &["usage"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpuOptions {
    pub format: String,
    pub tick: Interval,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
    pub cursor: PointerShape,
    pub threshold: Vec<Threshold>,
    pub onmouse: ActionMap,
}

impl Default for CpuOptions {
    fn default() -> Self {
        Self {
            format: "cpu {usage}%".to_string(),
            tick: Interval::from_secs(5),
            fg: None,
            bg: None,
            cursor: PointerShape::Default,
            threshold: Vec::new(),
            onmouse: ActionMap::new(),
        }
    }
}

pub struct Cpu {
    face: SharedFace,
    tick: Interval,
    thresholds: Vec<Threshold>,
    stats: SystemStats,
}

impl Cpu {
    pub const NAME: &'static str = "cpu";

    pub fn new(options: CpuOptions, stats: SystemStats) -> Result<Self, ModuleError> {
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

impl Module for Cpu {
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
        let usage = snapshot.cpu_usage.clamp(0.0, 100.0).round() as u8;

        let face = lock(Self::NAME, &self.face)?;
        let text = template::render(&face.look.format, |name| match name {
            "usage" => Some(usage.to_string()),
            _ => None,
        })?;
        let style = threshold_style(&self.thresholds, usage, face.look.style());
        Ok(face.look.cells_styled(&text, style))
    }
}
