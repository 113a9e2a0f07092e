// Anchored single-row layout: places the three groups into a fixed-width line

use ratatui::style::Style;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, cells_from_str, total_width};
use super::truncate::{trim_keep_end, trim_keep_middle, trim_keep_start};

/// Horizontal placement bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[serde(rename = "left", alias = "start")]
    Start,
    #[serde(rename = "middle", alias = "center")]
    Center,
    #[serde(rename = "right", alias = "end")]
    End,
}

impl Anchor {
    pub const ALL: [Anchor; 3] = [Anchor::Start, Anchor::Center, Anchor::End];

    pub fn label(self) -> &'static str {
        match self {
            Anchor::Start => "left",
            Anchor::Center => "middle",
            Anchor::End => "right",
        }
    }
}

/// One value per anchor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups<T> {
    pub start: T,
    pub center: T,
    pub end: T,
}

impl<T> Groups<T> {
    pub fn new(start: T, center: T, end: T) -> Self {
        Self { start, center, end }
    }

    pub fn get(&self, anchor: Anchor) -> &T {
        match anchor {
            Anchor::Start => &self.start,
            Anchor::Center => &self.center,
            Anchor::End => &self.end,
        }
    }

    pub fn get_mut(&mut self, anchor: Anchor) -> &mut T {
        match anchor {
            Anchor::Start => &mut self.start,
            Anchor::Center => &mut self.center,
            Anchor::End => &mut self.end,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Anchor, T) -> U) -> Groups<U> {
        Groups {
            start: f(Anchor::Start, self.start),
            center: f(Anchor::Center, self.center),
            end: f(Anchor::End, self.end),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Anchor, &T)> {
        Anchor::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSettings {
    /// Order in which groups claim columns; earlier groups win collisions
    pub priority: [Anchor; 3],

    /// Marker replacing truncated content, `None` to clip plainly
    pub ellipsis: Option<Vec<Cell>>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            priority: [Anchor::End, Anchor::Start, Anchor::Center],
            ellipsis: Some(marker("…")),
        }
    }
}

/// Non-interactive cells for an ellipsis marker
pub fn marker(text: &str) -> Vec<Cell> {
    cells_from_str(text, Style::default())
        .into_iter()
        .map(Cell::inert)
        .collect()
}

/// Lay the flattened group contents out into exactly `width` slots.
///
/// Wide graphemes occupy their lead slot plus continuation slots that carry
/// the same owner, metadata and pointer hint.
pub fn compose(width: usize, content: &Groups<Vec<Cell>>, settings: &LayoutSettings) -> Vec<Cell> {
    let mut canvas = Canvas::new(width);
    let ellipsis = settings.ellipsis.as_deref();

    for anchor in settings.priority {
        let cells = content.get(anchor);
        if cells.is_empty() {
            continue;
        }
        match anchor {
            Anchor::Start => {
                let free = canvas.free_prefix();
                let visible = trim_keep_start(cells, free, ellipsis);
                canvas.draw(0, &visible);
            }
            Anchor::End => {
                let free = canvas.free_suffix();
                let visible = trim_keep_end(cells, free, ellipsis);
                let x = width - total_width(&visible);
                canvas.draw(x, &visible);
            }
            Anchor::Center => {
                if let Some((x, visible)) = place_center(&canvas, cells, ellipsis) {
                    canvas.draw(x, &visible);
                }
            }
        }
    }

    canvas.slots
}

/// Center the group on `width / 2`, ellipsizing whichever side(s) would
/// run into already claimed columns or the screen edge.
fn place_center(canvas: &Canvas, cells: &[Cell], ellipsis: Option<&[Cell]>) -> Option<(usize, Vec<Cell>)> {
    let width = canvas.width() as isize;
    let content = total_width(cells) as isize;

    let gap_start = canvas.claimed_prefix() as isize;
    let gap_end = width - canvas.claimed_suffix() as isize;
    if gap_start >= gap_end {
        return None;
    }

    let start = width / 2 - content / 2;
    let end = start + content;
    let overflow_left = start < gap_start;
    let overflow_right = end > gap_end;

    let placed = match (overflow_left, overflow_right) {
        (false, false) => (start as usize, cells.to_vec()),
        (true, true) => {
            let gap = (gap_end - gap_start) as usize;
            let visible = trim_keep_middle(cells, gap, ellipsis);
            let x = gap_start as usize + (gap - total_width(&visible)) / 2;
            (x, visible)
        }
        (true, false) => {
            let room = (end - gap_start).max(0) as usize;
            let visible = trim_keep_end(cells, room, ellipsis);
            (end as usize - total_width(&visible), visible)
        }
        (false, true) => {
            let room = (gap_end - start).max(0) as usize;
            let visible = trim_keep_start(cells, room, ellipsis);
            (start as usize, visible)
        }
    };

    (!placed.1.is_empty()).then_some(placed)
}

struct Canvas {
    slots: Vec<Cell>,
    occupied: Vec<bool>,
}

impl Canvas {
    fn new(width: usize) -> Self {
        Self {
            slots: vec![Cell::blank(); width],
            occupied: vec![false; width],
        }
    }

    fn width(&self) -> usize {
        self.slots.len()
    }

    /// Unclaimed columns counted from the left edge
    fn free_prefix(&self) -> usize {
        self.occupied.iter().take_while(|o| !**o).count()
    }

    /// Unclaimed columns counted from the right edge
    fn free_suffix(&self) -> usize {
        self.occupied.iter().rev().take_while(|o| !**o).count()
    }

    fn claimed_prefix(&self) -> usize {
        self.occupied.iter().take_while(|o| **o).count()
    }

    fn claimed_suffix(&self) -> usize {
        self.occupied.iter().rev().take_while(|o| **o).count()
    }

    fn draw(&mut self, mut x: usize, cells: &[Cell]) {
        for cell in cells {
            if x + cell.width > self.width() {
                break;
            }
            for k in 1..cell.width {
                self.slots[x + k] = cell.continuation();
                self.occupied[x + k] = true;
            }
            self.slots[x] = cell.clone();
            self.occupied[x] = true;
            x += cell.width;
        }
    }
}
