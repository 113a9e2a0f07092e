// Compositor: per-module render caches and the line buffer built from them

use std::collections::HashMap;

use super::cell::{Cell, ModuleId};
use super::layout::{Anchor, Groups, LayoutSettings, compose};
use super::runtime::ModuleTable;

/// Ordered modules of one anchor plus their last rendered output
#[derive(Debug, Default)]
struct AnchorGroup {
    modules: Vec<ModuleId>,
    cache: HashMap<ModuleId, Vec<Cell>>,
}

impl AnchorGroup {
    fn new(modules: Vec<ModuleId>) -> Self {
        Self {
            modules,
            cache: HashMap::new(),
        }
    }

    fn contains(&self, id: ModuleId) -> bool {
        self.modules.contains(&id)
    }

    /// Concatenate the caches in configured module order
    fn flatten(&self) -> Vec<Cell> {
        self.modules
            .iter()
            .filter_map(|id| self.cache.get(id))
            .flatten()
            .cloned()
            .collect()
    }
}

/// Owns the line buffer. Only the event loop holds one.
#[derive(Debug)]
pub struct Compositor {
    width: usize,
    groups: Groups<AnchorGroup>,
    settings: LayoutSettings,
    line: Vec<Cell>,
}

impl Compositor {
    pub fn new(groups: Groups<Vec<ModuleId>>, width: usize, settings: LayoutSettings) -> Self {
        Self {
            width,
            groups: groups.map(|_, modules| AnchorGroup::new(modules)),
            settings,
            line: vec![Cell::blank(); width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Current line buffer, exactly `width` slots
    pub fn line(&self) -> &[Cell] {
        &self.line
    }

    /// Re-render every active module, then recompute the line
    pub fn full_refresh(&mut self, table: &ModuleTable) {
        for anchor in Anchor::ALL {
            let group = self.groups.get_mut(anchor);
            for id in group.modules.clone() {
                group.cache.insert(id, table.render(id));
            }
        }
        self.composite();
    }

    /// Re-render one module, then recompute the whole line.
    /// Ids that belong to no group are ignored.
    pub fn refresh(&mut self, id: ModuleId, table: &ModuleTable) {
        let Some(anchor) = Anchor::ALL.into_iter().find(|a| self.groups.get(*a).contains(id)) else {
            tracing::debug!("refresh for inactive module {:?}", id);
            return;
        };

        self.groups.get_mut(anchor).cache.insert(id, table.render(id));
        self.composite();
    }

    pub fn resize(&mut self, width: usize, table: &ModuleTable) {
        self.width = width;
        self.full_refresh(table);
    }

    /// Lay the cached content out again without re-rendering
    pub fn composite(&mut self) {
        let content = Groups::new(
            self.groups.start.flatten(),
            self.groups.center.flatten(),
            self.groups.end.flatten(),
        );
        self.line = compose(self.width, &content, &self.settings);
    }
}
