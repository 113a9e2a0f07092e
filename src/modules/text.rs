// Static label

use serde::Deserialize;

use super::actions::{ActionMap, Actions, check_formats};
use super::look::{Look, Paint};
use super::template;
use super::{Face, SharedFace, lock, spawn_driver};
use crate::bar::{Cell, EVENT_CAPACITY, Module, PointerShape, Wiring, wiring};
use crate::error::ModuleError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextOptions {
    #[serde(alias = "text")]
    pub format: String,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
    pub cursor: PointerShape,
    pub onmouse: ActionMap,
}

pub struct Text {
    face: SharedFace,
    interactive: bool,
}

impl Text {
    pub const NAME: &'static str = "text";

    pub fn new(options: TextOptions) -> Result<Self, ModuleError> {
        let invalid = |reason: String| ModuleError::Invalid {
            module: Self::NAME.to_string(),
            reason,
        };
        template::check(&options.format, &[]).map_err(invalid)?;
        check_formats(&options.onmouse, |f| template::check(f, &[])).map_err(invalid)?;

        let look = Look::new(options.format, options.fg, options.bg, options.cursor);
        let actions = Actions::new(options.onmouse, &look);
        Ok(Self {
            interactive: !actions.is_empty(),
            face: Face::shared(look, actions),
        })
    }
}

impl Module for Text {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self) -> Result<Wiring, ModuleError> {
        if !self.interactive {
            return Ok(Wiring::inert());
        }
        let (wiring, ports) = wiring(EVENT_CAPACITY);
        spawn_driver(Self::NAME, ports, self.face.clone(), None, || false)?;
        Ok(wiring)
    }

    fn render(&self) -> Result<Vec<Cell>, ModuleError> {
        let face = lock(Self::NAME, &self.face)?;
        let text = template::render(&face.look.format, |_| None)?;
        Ok(face.look.cells(&text))
    }
}
