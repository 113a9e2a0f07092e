// Module contract and the channels that connect a module to the runtime

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use super::cell::{Cell, ModuleId};
use crate::error::ModuleError;

/// Default capacity of a module's input channel
pub const EVENT_CAPACITY: usize = 32;

/// An independent, concurrently updating content source.
///
/// `render` runs on the event loop thread, possibly while the module's own
/// background threads are active. Any state both sides touch must be
/// synchronized inside the module, and mutated before `Notifier::notify`.
pub trait Module {
    fn name(&self) -> &str;

    /// Services that must be running before `run` is called
    fn dependencies(&self) -> &[&'static str] {
        &[]
    }

    /// Start background activity and hand back the runtime half of the wiring
    fn run(&mut self) -> Result<Wiring, ModuleError>;

    /// Snapshot of the current display state
    fn render(&self) -> Result<Vec<Cell>, ModuleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
}

impl Button {
    pub fn is_wheel(self) -> bool {
        matches!(
            self,
            Button::WheelUp | Button::WheelDown | Button::WheelLeft | Button::WheelRight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Press,
    Release,
    Drag,
    Motion,
}

/// Pointer activity reported by the terminal surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub column: u16,
    pub row: u16,
    pub button: Option<Button>,
    pub phase: Phase,
}

impl PointerEvent {
    pub fn motion(column: u16, row: u16) -> Self {
        Self {
            column,
            row,
            button: None,
            phase: Phase::Motion,
        }
    }

    pub fn press(column: u16, row: u16, button: Button) -> Self {
        Self {
            column,
            row,
            button: Some(button),
            phase: Phase::Press,
        }
    }

    pub fn release(column: u16, row: u16, button: Button) -> Self {
        Self {
            column,
            row,
            button: Some(button),
            phase: Phase::Release,
        }
    }

    pub fn is_press(&self) -> bool {
        self.phase == Phase::Press
    }
}

/// Hover ownership transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub from: Option<ModuleId>,
    pub to: Option<ModuleId>,
}

/// Input delivered to a module's sink
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleEvent {
    Pointer { event: PointerEvent, cell: Cell },
    FocusIn { change: FocusChange, cell: Cell },
    FocusOut { change: FocusChange, cell: Cell },
}

/// Module side: request a recomposite without ever blocking
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: SyncSender<()>,
}

impl Notifier {
    /// Returns false once the runtime has gone away.
    pub fn notify(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// Runtime side: "content changed" notifications
#[derive(Debug)]
pub struct Signal {
    rx: Receiver<()>,
}

impl Signal {
    /// Block until the module signals. False when the module dropped its notifier.
    pub fn wait(&self) -> bool {
        self.rx.recv().is_ok()
    }
}

/// Runtime side: best-effort delivery of input events
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: SyncSender<ModuleEvent>,
}

impl EventSink {
    /// Never blocks; drops the event when the module is behind or gone.
    pub fn deliver(&self, event: ModuleEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!("module input queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// What `Module::run` hands back to the runtime
#[derive(Debug)]
pub struct Wiring {
    pub signal: Signal,
    pub sink: EventSink,
}

impl Wiring {
    /// Wiring for modules with no background activity: never signals,
    /// silently discards input.
    pub fn inert() -> Self {
        let (wiring, _ports) = wiring(1);
        wiring
    }
}

/// What the module keeps for its background threads
#[derive(Debug)]
pub struct Ports {
    pub notifier: Notifier,
    pub events: Receiver<ModuleEvent>,
}

/// Create both halves of a module's channels
pub fn wiring(event_capacity: usize) -> (Wiring, Ports) {
    let (signal_tx, signal_rx) = mpsc::sync_channel(1);
    let (event_tx, event_rx) = mpsc::sync_channel(event_capacity.max(1));

    (
        Wiring {
            signal: Signal { rx: signal_rx },
            sink: EventSink { tx: event_tx },
        },
        Ports {
            notifier: Notifier { tx: signal_tx },
            events: event_rx,
        },
    )
}
