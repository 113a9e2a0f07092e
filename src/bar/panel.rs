// Panel: the single owner of the module table, compositor and hover state

use super::cell::{Cell, ModuleId, PointerShape};
use super::compositor::Compositor;
use super::layout::{Groups, LayoutSettings};
use super::module::PointerEvent;
use super::router::HoverRouter;
use super::runtime::ModuleTable;

/// Everything the event loop mutates. Nothing here is shared with modules.
pub struct Panel {
    table: ModuleTable,
    compositor: Compositor,
    router: HoverRouter,
}

impl Panel {
    pub fn new(table: ModuleTable, groups: Groups<Vec<ModuleId>>, width: usize, settings: LayoutSettings) -> Self {
        Self {
            table,
            compositor: Compositor::new(groups, width, settings),
            router: HoverRouter::new(),
        }
    }

    pub fn line(&self) -> &[Cell] {
        self.compositor.line()
    }

    pub fn width(&self) -> usize {
        self.compositor.width()
    }

    pub fn hovered(&self) -> Option<ModuleId> {
        self.router.hovered()
    }

    /// Shape last requested for the pointer
    pub fn pointer_shape(&self) -> PointerShape {
        self.router.shape()
    }

    pub fn module_name(&self, id: ModuleId) -> Option<&str> {
        self.table.name(id)
    }

    pub fn module_count(&self) -> usize {
        self.table.len()
    }

    /// Startup, redraw request or resume
    pub fn full_refresh(&mut self) -> Option<PointerShape> {
        self.compositor.full_refresh(&self.table);
        self.router.retarget(self.compositor.line(), &self.table)
    }

    /// One module's aggregation-queue entry
    pub fn refresh(&mut self, id: ModuleId) -> Option<PointerShape> {
        self.compositor.refresh(id, &self.table);
        self.router.retarget(self.compositor.line(), &self.table)
    }

    pub fn resize(&mut self, width: usize) -> Option<PointerShape> {
        self.compositor.resize(width, &self.table);
        self.router.retarget(self.compositor.line(), &self.table)
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Option<PointerShape> {
        self.router.pointer(event, self.compositor.line(), &self.table)
    }

    pub fn focus_lost(&mut self) -> Option<PointerShape> {
        self.router.leave(&self.table)
    }
}
