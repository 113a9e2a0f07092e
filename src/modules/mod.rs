// Built-in data sources and the pieces they share

use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crate::bar::Ports;
use crate::error::ModuleError;

pub mod actions;
pub mod clock;
pub mod cpu;
pub mod exec;
pub mod look;
pub mod ram;
pub mod registry;
pub mod template;
pub mod text;

pub use registry::{FactoryContext, ModuleRegistry};

use actions::Actions;
use look::Look;

/// A module's current look and the mouse actions that change it
pub struct Face {
    pub look: Look,
    pub actions: Actions,
}

pub type SharedFace = Arc<Mutex<Face>>;

impl Face {
    pub fn shared(look: Look, actions: Actions) -> SharedFace {
        Arc::new(Mutex::new(Face { look, actions }))
    }
}

pub(crate) fn lock<'a, T>(name: &str, mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>, ModuleError> {
    mutex
        .lock()
        .map_err(|_| ModuleError::Render(format!("{}: state lock poisoned", name)))
}

/// Spawn a module's background thread.
///
/// The thread applies routed input to `face` and calls `on_tick` at once
/// and then every `tick`. Whenever either reports a change the bar is asked to refresh.
/// It ends once the runtime drops either end of the wiring.
pub(crate) fn spawn_driver<F>(
    name: &str,
    ports: Ports,
    face: SharedFace,
    tick: Option<Duration>,
    mut on_tick: F,
) -> Result<(), ModuleError>
where
    F: FnMut() -> bool + Send + 'static,
{
    let thread_name = name.to_string();
    thread::Builder::new().name(name.to_string()).spawn(move || {
        let Ports { notifier, events } = ports;
        // first tick fires right away
        let mut deadline = tick.map(|_| Instant::now());

        loop {
            let received = match deadline {
                Some(at) => events.recv_timeout(at.saturating_duration_since(Instant::now())),
                None => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            let changed = match received {
                Ok(event) => match face.lock() {
                    Ok(mut guard) => {
                        let Face { look, actions } = &mut *guard;
                        actions.handle(&event, look)
                    }
                    Err(_) => break,
                },
                Err(RecvTimeoutError::Timeout) => {
                    deadline = tick.map(|t| Instant::now() + t);
                    on_tick()
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if changed && !notifier.notify() {
                break;
            }
        }
        tracing::debug!("module thread '{}' exiting", thread_name);
    })?;

    Ok(())
}
