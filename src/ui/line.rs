// Widget drawing the composited line buffer into one terminal row

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::bar::Cell;

pub struct BarLine<'a> {
    cells: &'a [Cell],
}

impl<'a> BarLine<'a> {
    pub fn new(cells: &'a [Cell]) -> Self {
        Self { cells }
    }
}

impl Widget for BarLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        for offset in 0..area.width {
            let Some(slot) = buf.cell_mut((area.x + offset, area.y)) else {
                continue;
            };
            slot.reset();

            match self.cells.get(offset as usize) {
                // hidden behind the wide grapheme to its left
                Some(cell) if cell.is_continuation() => {
                    slot.set_style(cell.style);
                }
                Some(cell) => {
                    slot.set_symbol(&cell.grapheme).set_style(cell.style);
                }
                None => {}
            }
        }
    }
}
