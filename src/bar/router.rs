// Hit testing and hover/focus routing against the composited line

use super::cell::{Cell, ModuleId, PointerShape};
use super::module::{FocusChange, ModuleEvent, PointerEvent};
use super::runtime::ModuleTable;

/// Where routed events go. Delivery must never block.
pub trait Dispatch {
    fn dispatch(&self, id: ModuleId, event: ModuleEvent) -> bool;
}

impl Dispatch for ModuleTable {
    fn dispatch(&self, id: ModuleId, event: ModuleEvent) -> bool {
        self.deliver(id, event)
    }
}

/// Hover state: which module owns the cell under the pointer.
///
/// Lives on the event loop thread only.
#[derive(Debug, Default)]
pub struct HoverRouter {
    hovered: Option<(ModuleId, Cell)>,
    column: Option<u16>,
    shape: PointerShape,
}

impl HoverRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<ModuleId> {
        self.hovered.as_ref().map(|(id, _)| *id)
    }

    pub fn hovered_cell(&self) -> Option<&Cell> {
        self.hovered.as_ref().map(|(_, cell)| cell)
    }

    pub fn shape(&self) -> PointerShape {
        self.shape
    }

    /// Route one pointer event.
    ///
    /// Returns the new pointer shape when it differs from the last one applied.
    pub fn pointer(&mut self, event: PointerEvent, line: &[Cell], sink: &dyn Dispatch) -> Option<PointerShape> {
        if event.row != 0 {
            return self.leave(sink);
        }

        self.column = Some(event.column);
        let cell = line.get(event.column as usize);
        let owner = cell.and_then(|c| c.owner);
        self.hover(owner, cell, sink);

        if let (Some(id), Some(cell)) = (owner, cell) {
            sink.dispatch(
                id,
                ModuleEvent::Pointer {
                    event,
                    cell: cell.clone(),
                },
            );
        }

        self.update_shape()
    }

    /// Re-run the hit test at the last pointer column after the line changed
    /// under a stationary pointer. No raw pointer event is forwarded.
    pub fn retarget(&mut self, line: &[Cell], sink: &dyn Dispatch) -> Option<PointerShape> {
        let column = self.column?;
        let cell = line.get(column as usize);
        let owner = cell.and_then(|c| c.owner);
        self.hover(owner, cell, sink);
        self.update_shape()
    }

    /// The pointer left the bar row or the terminal lost focus
    pub fn leave(&mut self, sink: &dyn Dispatch) -> Option<PointerShape> {
        self.column = None;
        self.hover(None, None, sink);
        self.update_shape()
    }

    fn hover(&mut self, owner: Option<ModuleId>, cell: Option<&Cell>, sink: &dyn Dispatch) {
        let previous = self.hovered();
        if previous == owner {
            // same module, track the specific cell
            if let (Some((_, hovered)), Some(cell)) = (self.hovered.as_mut(), cell) {
                *hovered = cell.clone();
            }
            return;
        }

        let change = FocusChange {
            from: previous,
            to: owner,
        };
        if let Some((old, old_cell)) = self.hovered.take() {
            sink.dispatch(
                old,
                ModuleEvent::FocusOut {
                    change,
                    cell: old_cell,
                },
            );
        }
        if let (Some(new), Some(cell)) = (owner, cell) {
            sink.dispatch(
                new,
                ModuleEvent::FocusIn {
                    change,
                    cell: cell.clone(),
                },
            );
            self.hovered = Some((new, cell.clone()));
        }
    }

    fn update_shape(&mut self) -> Option<PointerShape> {
        let wanted = self
            .hovered_cell()
            .and_then(|c| c.pointer)
            .unwrap_or_default();
        if wanted == self.shape {
            return None;
        }
        self.shape = wanted;
        Some(wanted)
    }
}
