#![allow(dead_code)]

use cellbar::bar::{
    Cell, Groups, LayoutSettings, Module, ModuleEvent, ModuleId, Notifier, Panel, Ports, PointerShape, Wiring,
    cells_from_str, runtime, wiring,
};
use cellbar::error::ModuleError;
use cellbar::services::ServiceRegistry;
use ratatui::style::Style;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// Handle the test keeps to drive a `Label` from outside
#[derive(Clone, Default)]
pub struct Feed {
    pub text: Arc<Mutex<String>>,
    pub ports: Arc<Mutex<Option<Ports>>>,
}

impl Feed {
    pub fn new(text: &str) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.to_string())),
            ports: Arc::new(Mutex::new(None)),
        }
    }

    /// Everything delivered to the module so far
    pub fn events(&self) -> Vec<ModuleEvent> {
        let guard = self.ports.lock().unwrap();
        match guard.as_ref() {
            Some(ports) => ports.events.try_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn notifier(&self) -> Option<Notifier> {
        self.ports.lock().unwrap().as_ref().map(|p| p.notifier.clone())
    }

    /// Drop the module-side channels so its adapter thread exits
    pub fn hang_up(&self) {
        self.ports.lock().unwrap().take();
    }

    pub fn was_started(&self) -> bool {
        self.ports.lock().unwrap().is_some()
    }
}

/// Plain text module whose content and input the test controls
pub struct Label {
    name: &'static str,
    feed: Feed,
    pointer: Option<PointerShape>,
    fail: bool,
}

impl Label {
    pub fn boxed(name: &'static str, feed: &Feed) -> Box<dyn Module> {
        Box::new(Self {
            name,
            feed: feed.clone(),
            pointer: None,
            fail: false,
        })
    }

    pub fn clickable(name: &'static str, feed: &Feed) -> Box<dyn Module> {
        Box::new(Self {
            name,
            feed: feed.clone(),
            pointer: Some(PointerShape::Pointer),
            fail: false,
        })
    }

    pub fn broken(name: &'static str, feed: &Feed) -> Box<dyn Module> {
        Box::new(Self {
            name,
            feed: feed.clone(),
            pointer: None,
            fail: true,
        })
    }
}

impl Module for Label {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self) -> Result<Wiring, ModuleError> {
        if self.fail {
            return Err(ModuleError::Unavailable {
                module: self.name.to_string(),
                reason: "no such device".to_string(),
            });
        }
        let (wiring, ports) = wiring(16);
        *self.feed.ports.lock().unwrap() = Some(ports);
        Ok(wiring)
    }

    fn render(&self) -> Result<Vec<Cell>, ModuleError> {
        let text = self.feed.text.lock().unwrap().clone();
        let cells = cells_from_str(&text, Style::default());
        Ok(match self.pointer {
            Some(shape) => cells.into_iter().map(|c| c.with_pointer(shape)).collect(),
            None => cells,
        })
    }
}

/// Start the configured modules and build a panel around them
pub fn start_panel<E>(
    configured: Groups<Vec<Box<dyn Module>>>,
    width: usize,
    queue: &Sender<E>,
) -> Panel
where
    E: From<ModuleId> + Send + 'static,
{
    let mut services = ServiceRegistry::new();
    let (table, groups) = runtime::start(configured, &mut services, queue);
    let mut panel = Panel::new(table, groups, width, LayoutSettings::default());
    panel.full_refresh();
    panel
}
