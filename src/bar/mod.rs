// Bar runtime: cells, modules, composition and input routing

pub mod cell;
pub mod compositor;
pub mod layout;
pub mod module;
pub mod panel;
pub mod router;
pub mod runtime;
pub mod truncate;

pub use cell::{Cell, ModuleId, PointerShape, cells_from_str};
pub use compositor::Compositor;
pub use layout::{Anchor, Groups, LayoutSettings};
pub use module::{
    Button, EVENT_CAPACITY, EventSink, FocusChange, Module, ModuleEvent, Notifier, Phase, PointerEvent, Ports,
    Signal, Wiring, wiring,
};
pub use panel::Panel;
pub use router::{Dispatch, HoverRouter};
pub use runtime::ModuleTable;
