// Width-aware truncation primitives shared by the three anchor groups
//
// All three take a target width in columns and an optional ellipsis marker.
// Cells are removed whole, so a wide grapheme is never split: a budget that
// ends inside one backs off to the previous grapheme boundary.

use super::cell::{Cell, total_width};

/// Keep the leading content, ellipsis suffix
pub fn trim_keep_start(cells: &[Cell], width: usize, ellipsis: Option<&[Cell]>) -> Vec<Cell> {
    if width == 0 {
        return Vec::new();
    }
    if total_width(cells) <= width {
        return cells.to_vec();
    }
    let Some(budget) = budget(width, ellipsis, 1) else {
        return Vec::new();
    };

    let mut out = take_leading(cells, budget);
    if let Some(marker) = ellipsis {
        out.extend_from_slice(marker);
    }
    out
}

/// Keep the trailing content, ellipsis prefix
pub fn trim_keep_end(cells: &[Cell], width: usize, ellipsis: Option<&[Cell]>) -> Vec<Cell> {
    if width == 0 {
        return Vec::new();
    }
    if total_width(cells) <= width {
        return cells.to_vec();
    }
    let Some(budget) = budget(width, ellipsis, 1) else {
        return Vec::new();
    };

    let kept = take_trailing(cells, budget);
    let mut out = ellipsis.map(<[Cell]>::to_vec).unwrap_or_default();
    out.extend(kept);
    out
}

/// Drop content from both ends alternately, ellipsis on both sides
pub fn trim_keep_middle(cells: &[Cell], width: usize, ellipsis: Option<&[Cell]>) -> Vec<Cell> {
    if width == 0 {
        return Vec::new();
    }
    if total_width(cells) <= width {
        return cells.to_vec();
    }
    let Some(budget) = budget(width, ellipsis, 2) else {
        return Vec::new();
    };

    let mut lo = 0;
    let mut hi = cells.len();
    let mut current = total_width(cells);
    while current > budget && lo < hi {
        current -= cells[lo].width;
        lo += 1;
        if current > budget && lo < hi {
            hi -= 1;
            current -= cells[hi].width;
        }
    }

    let mut out = ellipsis.map(<[Cell]>::to_vec).unwrap_or_default();
    out.extend_from_slice(&cells[lo..hi]);
    if let Some(marker) = ellipsis {
        out.extend_from_slice(marker);
    }
    out
}

/// Columns left for content once `markers` ellipses are reserved.
/// None when the markers alone would fill the width.
fn budget(width: usize, ellipsis: Option<&[Cell]>, markers: usize) -> Option<usize> {
    match ellipsis {
        Some(marker) => {
            let reserved = total_width(marker) * markers;
            (reserved < width).then(|| width - reserved)
        }
        None => Some(width),
    }
}

fn take_leading(cells: &[Cell], budget: usize) -> Vec<Cell> {
    let mut used = 0;
    cells
        .iter()
        .take_while(|c| {
            if used + c.width > budget {
                return false;
            }
            used += c.width;
            true
        })
        .cloned()
        .collect()
}

fn take_trailing(cells: &[Cell], budget: usize) -> Vec<Cell> {
    let mut used = 0;
    let count = cells
        .iter()
        .rev()
        .take_while(|c| {
            if used + c.width > budget {
                return false;
            }
            used += c.width;
            true
        })
        .count();
    cells[cells.len() - count..].to_vec()
}
