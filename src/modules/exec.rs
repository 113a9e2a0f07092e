// Shell command output, refreshed on an interval

use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use super::actions::{ActionMap, Actions, check_formats};
use super::look::{Interval, Look, Paint};
use super::{Face, SharedFace, lock, spawn_driver, template};
use crate::bar::{Cell, EVENT_CAPACITY, Module, PointerShape, Wiring, wiring};
use crate::error::ModuleError;

const PLACEHOLDERS: &[&str] = &["output"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecOptions {
    /// Run through `sh -c`
    pub command: String,
    pub interval: Interval,
    pub format: String,
    pub fg: Option<Paint>,
    pub bg: Option<Paint>,
    pub cursor: PointerShape,
    pub onmouse: ActionMap,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            command: String::new(),
            interval: Interval::from_secs(10),
            format: "{output}".to_string(),
            fg: None,
            bg: None,
            cursor: PointerShape::Default,
            onmouse: ActionMap::new(),
        }
    }
}

/// First line of stdout, or None when the command fails
pub fn run_command(command: &str) -> Option<String> {
    let output = match Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("exec: failed to run {:?}: {}", command, e);
            return None;
        }
    };

    if !output.status.success() {
        tracing::debug!("exec: {:?} exited with {}", command, output.status);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Some(stdout.lines().next().unwrap_or_default().trim_end().to_string())
}

pub struct Exec {
    face: SharedFace,
    command: String,
    interval: Interval,
    output: Arc<Mutex<Option<String>>>,
}

impl Exec {
    pub const NAME: &'static str = "exec";

    pub fn new(options: ExecOptions) -> Result<Self, ModuleError> {
        let invalid = |reason: String| ModuleError::Invalid {
            module: Self::NAME.to_string(),
            reason,
        };
        if options.command.trim().is_empty() {
            return Err(invalid("command is required".to_string()));
        }
        template::check(&options.format, PLACEHOLDERS).map_err(invalid)?;
        check_formats(&options.onmouse, |f| template::check(f, PLACEHOLDERS)).map_err(invalid)?;

        let look = Look::new(options.format, options.fg, options.bg, options.cursor);
        let actions = Actions::new(options.onmouse, &look);
        Ok(Self {
            face: Face::shared(look, actions),
            command: options.command,
            interval: options.interval,
            output: Arc::new(Mutex::new(None)),
        })
    }
}

impl Module for Exec {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self) -> Result<Wiring, ModuleError> {
        let (wiring, ports) = wiring(EVENT_CAPACITY);
        let command = self.command.clone();
        let output = self.output.clone();

        spawn_driver(Self::NAME, ports, self.face.clone(), Some(self.interval.0), move || {
            let fresh = run_command(&command);
            match output.lock() {
                Ok(mut slot) if *slot != fresh => {
                    *slot = fresh;
                    true
                }
                _ => false,
            }
        })?;
        Ok(wiring)
    }

    fn render(&self) -> Result<Vec<Cell>, ModuleError> {
        let Some(output) = lock(Self::NAME, &self.output)?.clone() else {
            return Ok(Vec::new());
        };

        let face = lock(Self::NAME, &self.face)?;
        let text = template::render(&face.look.format, |name| (name == "output").then(|| output.clone()))?;
        Ok(face.look.cells(&text))
    }
}
