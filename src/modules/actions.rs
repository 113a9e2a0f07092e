// Mouse and hover actions configured under `onmouse`

use std::collections::BTreeMap;
use std::process::{Command, Stdio};
use std::thread;

use serde::Deserialize;

use super::look::{Look, LookOverlay};
use crate::bar::{Button, ModuleEvent, Phase, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    Hover,
}

impl From<Button> for Trigger {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => Trigger::Left,
            Button::Middle => Trigger::Middle,
            Button::Right => Trigger::Right,
            Button::WheelUp => Trigger::WheelUp,
            Button::WheelDown => Trigger::WheelDown,
            Button::WheelLeft => Trigger::WheelLeft,
            Button::WheelRight => Trigger::WheelRight,
        }
    }
}

/// Program to launch: a shell-like string or an argv list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Launch {
    Line(String),
    Argv(Vec<String>),
}

impl Launch {
    pub fn argv(&self) -> Option<Vec<String>> {
        let argv = match self {
            Launch::Line(line) => shlex::split(line)?,
            Launch::Argv(argv) => argv.clone(),
        };
        (!argv.is_empty()).then_some(argv)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum Steps {
    One(LookOverlay),
    Many(Vec<LookOverlay>),
}

fn steps<'de, D>(deserializer: D) -> Result<Vec<LookOverlay>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Steps::deserialize(deserializer)? {
        Steps::One(step) => vec![step],
        Steps::Many(steps) => steps,
    })
}

/// One `onmouse.<trigger>` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MouseAction {
    pub run: Option<Launch>,
    pub notify: Option<String>,
    #[serde(default, deserialize_with = "steps")]
    pub config: Vec<LookOverlay>,
}

impl MouseAction {
    pub fn is_empty(&self) -> bool {
        self.run.is_none() && self.notify.is_none() && self.config.is_empty()
    }

    /// Fire the external side effects: `notify` and `run`
    pub fn launch(&self) {
        if let Some(message) = &self.notify {
            spawn_detached(vec!["notify-send".to_string(), message.clone()]);
        }
        if let Some(argv) = self.run.as_ref().and_then(Launch::argv) {
            spawn_detached(argv);
        }
    }
}

fn spawn_detached(argv: Vec<String>) {
    let mut command = Command::new(&argv[0]);
    command
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match command.spawn() {
        Ok(mut child) => {
            // reap so finished children do not linger as zombies
            let _ = thread::Builder::new()
                .name("reaper".to_string())
                .spawn(move || child.wait());
        }
        Err(e) => tracing::warn!("failed to launch {:?}: {}", argv[0], e),
    }
}

pub type ActionMap = BTreeMap<Trigger, MouseAction>;

/// Validate every config step format of an action map
pub fn check_formats(actions: &ActionMap, check: impl Fn(&str) -> Result<(), String>) -> Result<(), String> {
    for (trigger, action) in actions {
        if action.is_empty() {
            return Err(format!("onmouse.{:?} is empty", trigger));
        }
        for step in &action.config {
            if let Some(format) = &step.format {
                check(format).map_err(|e| format!("onmouse.{:?}: {}", trigger, e))?;
            }
        }
    }
    Ok(())
}

struct Cycle {
    action: MouseAction,
    steps: Vec<LookOverlay>,
    next: usize,
}

impl Cycle {
    /// Apply the next step, returning it
    fn advance(&mut self, look: &mut Look) -> Option<&LookOverlay> {
        if self.steps.is_empty() {
            return None;
        }
        let step = &self.steps[self.next % self.steps.len()];
        self.next += 1;
        look.apply(step);
        Some(step)
    }
}

/// Runtime state of a module's mouse actions.
///
/// Press steps cycle through the configured overrides followed by the
/// initial look. Hover applies its next override on focus-in and restores
/// the touched fields on focus-out.
pub struct Actions {
    cycles: BTreeMap<Trigger, Cycle>,
    hover_undo: Option<LookOverlay>,
}

impl Actions {
    pub fn new(map: ActionMap, initial: &Look) -> Self {
        let cycles = map
            .into_iter()
            .map(|(trigger, action)| {
                let mut steps = action.config.clone();
                if !steps.is_empty() && trigger != Trigger::Hover {
                    steps.push(initial.capture());
                }
                (
                    trigger,
                    Cycle {
                        action,
                        steps,
                        next: 0,
                    },
                )
            })
            .collect();

        Self {
            cycles,
            hover_undo: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Returns true when the look changed
    pub fn press(&mut self, button: Button, look: &mut Look) -> bool {
        let trigger = Trigger::from(button);
        let Some(cycle) = self.cycles.get_mut(&trigger) else {
            return false;
        };

        cycle.action.launch();
        let Some(step) = cycle.advance(look) else {
            return false;
        };

        // fields changed by a press while hovered are kept on focus-out
        if let Some(undo) = self.hover_undo.as_mut() {
            let now = look.capture_for(step);
            if undo.format.is_some() && now.format.is_some() {
                undo.format = now.format;
            }
            if undo.fg.is_some() && now.fg.is_some() {
                undo.fg = now.fg;
            }
            if undo.bg.is_some() && now.bg.is_some() {
                undo.bg = now.bg;
            }
            if undo.cursor.is_some() && now.cursor.is_some() {
                undo.cursor = now.cursor;
            }
        }
        true
    }

    pub fn hover_in(&mut self, look: &mut Look) -> bool {
        let Some(cycle) = self.cycles.get_mut(&Trigger::Hover) else {
            return false;
        };
        cycle.action.launch();
        if cycle.steps.is_empty() {
            return false;
        }

        if self.hover_undo.is_none() {
            self.hover_undo = Some(look.capture_for(&merged(&cycle.steps)));
        }
        cycle.advance(look).is_some()
    }

    pub fn hover_out(&mut self, look: &mut Look) -> bool {
        match self.hover_undo.take() {
            Some(undo) => {
                look.apply(&undo);
                true
            }
            None => false,
        }
    }

    /// Apply one routed event. Returns true when the look changed.
    pub fn handle(&mut self, event: &ModuleEvent, look: &mut Look) -> bool {
        match event {
            ModuleEvent::Pointer { event, .. } => match event.button {
                Some(button) if triggers(event, button) => self.press(button, look),
                _ => false,
            },
            ModuleEvent::FocusIn { .. } => self.hover_in(look),
            ModuleEvent::FocusOut { .. } => self.hover_out(look),
        }
    }
}

/// Buttons act on release, wheel notches on their single scroll event
fn triggers(event: &PointerEvent, button: Button) -> bool {
    match event.phase {
        Phase::Release => !button.is_wheel(),
        Phase::Press => button.is_wheel(),
        Phase::Drag | Phase::Motion => false,
    }
}

/// Overlay marking every field any of `steps` touches
fn merged(steps: &[LookOverlay]) -> LookOverlay {
    let mut all = LookOverlay::default();
    for step in steps {
        all.format = all.format.or_else(|| step.format.clone());
        all.fg = all.fg.or(step.fg);
        all.bg = all.bg.or(step.bg);
        all.cursor = all.cursor.or(step.cursor);
    }
    all
}
