// Module runtime: starts modules and fans their refresh signals into one queue

use std::sync::mpsc::Sender;
use std::thread;

use super::cell::{Cell, ModuleId};
use super::layout::Groups;
use super::module::{EventSink, Module, ModuleEvent, Wiring};
use crate::error::ModuleError;
use crate::services::ServiceRegistry;

struct Slot {
    module: Box<dyn Module>,
    sink: EventSink,
}

/// Every successfully started module, addressed by `ModuleId`
#[derive(Default)]
pub struct ModuleTable {
    slots: Vec<Slot>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.slots.get(id.0).map(|s| s.module.name())
    }

    fn insert(&mut self, module: Box<dyn Module>, sink: EventSink) -> ModuleId {
        self.slots.push(Slot { module, sink });
        ModuleId(self.slots.len() - 1)
    }

    /// Render one module and stamp ownership onto its interactive cells.
    /// A render failure counts as "no cells this pass".
    pub fn render(&self, id: ModuleId) -> Vec<Cell> {
        let Some(slot) = self.slots.get(id.0) else {
            return Vec::new();
        };

        match slot.module.render() {
            Ok(mut cells) => {
                for cell in &mut cells {
                    cell.owner = cell.interactive.then_some(id);
                }
                cells
            }
            Err(e) => {
                tracing::warn!("{}: {}", slot.module.name(), e);
                Vec::new()
            }
        }
    }

    /// Forward an input event without blocking
    pub fn deliver(&self, id: ModuleId, event: ModuleEvent) -> bool {
        match self.slots.get(id.0) {
            Some(slot) => slot.sink.deliver(event),
            None => false,
        }
    }
}

/// Start every configured module.
///
/// Modules whose dependencies or `run` fail are logged and left out: they
/// get no id, no adapter thread and never appear in the returned groups.
/// Each started module gets one adapter thread that turns every signal into
/// one queue entry.
pub fn start<E>(
    configured: Groups<Vec<Box<dyn Module>>>,
    services: &mut ServiceRegistry,
    queue: &Sender<E>,
) -> (ModuleTable, Groups<Vec<ModuleId>>)
where
    E: From<ModuleId> + Send + 'static,
{
    let mut table = ModuleTable::new();
    let groups = configured.map(|anchor, modules| {
        let mut started = Vec::with_capacity(modules.len());
        for module in modules {
            match start_one(module, services, &mut table, queue) {
                Ok(id) => {
                    tracing::info!("started module '{}' ({})", table.name(id).unwrap_or("?"), anchor.label());
                    started.push(id);
                }
                Err(e) => tracing::warn!("error starting module: {}", e),
            }
        }
        started
    });

    (table, groups)
}

fn start_one<E>(
    mut module: Box<dyn Module>,
    services: &mut ServiceRegistry,
    table: &mut ModuleTable,
    queue: &Sender<E>,
) -> Result<ModuleId, ModuleError>
where
    E: From<ModuleId> + Send + 'static,
{
    for service in module.dependencies() {
        services
            .ensure_running(service)
            .map_err(|source| ModuleError::Dependency {
                module: module.name().to_string(),
                service: service.to_string(),
                source,
            })?;
    }

    let Wiring { signal, sink } = module.run()?;
    let name = module.name().to_string();
    let id = ModuleId(table.len());

    let queue = queue.clone();
    thread::Builder::new()
        .name(format!("refresh-{}", name))
        .spawn(move || {
            while signal.wait() {
                if queue.send(E::from(id)).is_err() {
                    break; // Event loop dropped the receiver
                }
            }
            tracing::debug!("module '{}' stopped signalling", name);
        })?;

    Ok(table.insert(module, sink))
}
