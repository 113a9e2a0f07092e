// Property tests for line composition
//
// Whatever the group contents and terminal width, the composited line must
// fill the width exactly and never split a wide grapheme.

use cellbar::bar::cell::{line_text, total_width};
use cellbar::bar::layout::compose;
use cellbar::bar::{Anchor, Cell, Groups, LayoutSettings, cells_from_str};
use proptest::prelude::*;
use ratatui::style::Style;

fn cells(text: &str) -> Vec<Cell> {
    cells_from_str(text, Style::default())
}

fn content() -> impl Strategy<Value = String> {
    "[a-z漢字 ]{0,16}"
}

fn priority() -> impl Strategy<Value = [Anchor; 3]> {
    prop_oneof![
        Just([Anchor::End, Anchor::Start, Anchor::Center]),
        Just([Anchor::Start, Anchor::End, Anchor::Center]),
        Just([Anchor::Center, Anchor::Start, Anchor::End]),
        Just([Anchor::Center, Anchor::End, Anchor::Start]),
    ]
}

fn settings(priority: [Anchor; 3], ellipsis: bool) -> LayoutSettings {
    LayoutSettings {
        priority,
        ellipsis: ellipsis.then(|| LayoutSettings::default().ellipsis).flatten(),
    }
}

proptest! {
    #[test]
    fn prop_line_fills_width_exactly(
        left in content(),
        middle in content(),
        right in content(),
        width in 0usize..40,
        priority in priority(),
        ellipsis in any::<bool>(),
    ) {
        let groups = Groups::new(cells(&left), cells(&middle), cells(&right));
        let line = compose(width, &groups, &settings(priority, ellipsis));

        prop_assert_eq!(line.len(), width);
        for cell in &line {
            prop_assert!(cell.width <= 2);
        }
    }

    #[test]
    fn prop_wide_graphemes_are_never_split(
        left in content(),
        middle in content(),
        right in content(),
        width in 0usize..40,
        priority in priority(),
    ) {
        let groups = Groups::new(cells(&left), cells(&middle), cells(&right));
        let line = compose(width, &groups, &settings(priority, true));

        for (i, cell) in line.iter().enumerate() {
            if cell.width == 2 {
                prop_assert!(i + 1 < line.len(), "wide grapheme cut at the edge");
                prop_assert!(line[i + 1].is_continuation());
                prop_assert_eq!(line[i + 1].owner, cell.owner);
            }
            if cell.is_continuation() {
                prop_assert!(i > 0 && line[i - 1].width == 2, "orphan continuation at {}", i);
            }
        }

        let covered: usize = line.iter().map(|c| c.width).sum();
        prop_assert_eq!(covered, width);
    }

    #[test]
    fn prop_composition_is_deterministic(
        left in content(),
        middle in content(),
        right in content(),
        width in 0usize..40,
        priority in priority(),
    ) {
        let groups = Groups::new(cells(&left), cells(&middle), cells(&right));
        let settings = settings(priority, true);
        prop_assert_eq!(compose(width, &groups, &settings), compose(width, &groups, &settings));
    }

    #[test]
    fn prop_lone_center_group_starts_at_midpoint(
        middle in "[a-z漢]{1,10}",
        width in 0usize..40,
    ) {
        let content = cells(&middle);
        let w = total_width(&content);
        prop_assume!(w <= width);

        let groups = Groups::new(Vec::new(), content.clone(), Vec::new());
        let line = compose(width, &groups, &LayoutSettings::default());

        let start = width / 2 - w / 2;
        prop_assert_eq!(&line[start].grapheme, &content[0].grapheme);
        prop_assert!(line_text(&line).contains(middle.as_str()));
    }

    #[test]
    fn prop_content_that_fits_is_untouched(
        left in "[a-z]{0,6}",
        right in "[a-z]{0,6}",
        width in 12usize..40,
    ) {
        let groups = Groups::new(cells(&left), Vec::new(), cells(&right));
        let text = line_text(&compose(width, &groups, &LayoutSettings::default()));

        prop_assert!(text.starts_with(left.as_str()));
        prop_assert!(text.ends_with(right.as_str()));
        prop_assert!(!text.contains('…'));
    }
}

#[test]
fn test_overflowing_left_group_is_ellipsized() {
    let groups = Groups::new(cells("HELLOTHERE"), Vec::new(), Vec::new());
    let line = compose(5, &groups, &LayoutSettings::default());
    assert_eq!(line_text(&line), "HELL…");
}

#[test]
fn test_overflow_without_ellipsis_clips() {
    let groups = Groups::new(cells("HELLOTHERE"), Vec::new(), Vec::new());
    let line = compose(5, &groups, &settings([Anchor::End, Anchor::Start, Anchor::Center], false));
    assert_eq!(line_text(&line), "HELLO");
}
