// Integration tests for hover and focus routing through a running panel

use cellbar::bar::cell::line_text;
use cellbar::bar::{Button, Groups, ModuleEvent, ModuleId, PointerEvent, PointerShape};
use std::sync::mpsc;

use crate::common::helpers::{Label, Feed, start_panel};

fn focus_events(events: &[ModuleEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|e| match e {
            ModuleEvent::FocusIn { .. } => "in",
            ModuleEvent::FocusOut { .. } => "out",
            ModuleEvent::Pointer { .. } => "pointer",
        })
        .collect()
}

#[test]
fn test_moving_between_modules_hands_over_focus() {
    let (tx, _rx) = mpsc::channel::<ModuleId>();
    let left = Feed::new("abc");
    let right = Feed::new("xyz");
    let mut panel = start_panel(
        Groups::new(vec![Label::boxed("left", &left)], vec![], vec![Label::boxed("right", &right)]),
        10,
        &tx,
    );
    assert_eq!(line_text(panel.line()), "abc    xyz");

    panel.pointer(PointerEvent::motion(0, 0));
    panel.pointer(PointerEvent::motion(2, 0));
    panel.pointer(PointerEvent::motion(8, 0));

    let left_events = left.events();
    assert_eq!(focus_events(&left_events), vec!["in", "pointer", "pointer", "out"]);
    let right_events = right.events();
    assert_eq!(focus_events(&right_events), vec!["in", "pointer"]);

    // both sides of the handover describe the same transition
    let ModuleEvent::FocusOut { change: out, .. } = &left_events[3] else {
        panic!("expected focus out, got {:?}", left_events[3]);
    };
    let ModuleEvent::FocusIn { change: into, cell } = &right_events[0] else {
        panic!("expected focus in, got {:?}", right_events[0]);
    };
    assert_eq!(out, into);
    assert_eq!(out.to, panel.hovered());
    assert_eq!(cell.grapheme, "y");
}

#[test]
fn test_background_and_other_rows_clear_hover() {
    let (tx, _rx) = mpsc::channel::<ModuleId>();
    let left = Feed::new("abc");
    let mut panel = start_panel(Groups::new(vec![Label::boxed("left", &left)], vec![], vec![]), 10, &tx);

    panel.pointer(PointerEvent::motion(1, 0));
    panel.pointer(PointerEvent::motion(6, 0));
    assert_eq!(panel.hovered(), None);

    panel.pointer(PointerEvent::motion(1, 0));
    panel.pointer(PointerEvent::motion(1, 3));
    assert_eq!(panel.hovered(), None);

    let events = left.events();
    assert_eq!(
        focus_events(&events),
        vec!["in", "pointer", "out", "in", "pointer", "out"]
    );
}

#[test]
fn test_click_carries_cell_under_pointer() {
    let (tx, _rx) = mpsc::channel::<ModuleId>();
    let right = Feed::new("xyz");
    let mut panel = start_panel(Groups::new(vec![], vec![], vec![Label::boxed("right", &right)]), 6, &tx);

    panel.pointer(PointerEvent::press(4, 0, Button::Middle));
    let events = right.events();
    let Some(ModuleEvent::Pointer { event, cell }) = events.last() else {
        panic!("no pointer event delivered: {:?}", events);
    };
    assert_eq!(event.button, Some(Button::Middle));
    assert_eq!(cell.grapheme, "y");
    assert_eq!(cell.owner, panel.hovered());
}

#[test]
fn test_pointer_shape_follows_hover() {
    let (tx, _rx) = mpsc::channel::<ModuleId>();
    let link = Feed::new("go");
    let plain = Feed::new("zz");
    let mut panel = start_panel(
        Groups::new(vec![Label::clickable("link", &link)], vec![], vec![Label::boxed("plain", &plain)]),
        8,
        &tx,
    );

    assert_eq!(panel.pointer(PointerEvent::motion(0, 0)), Some(PointerShape::Pointer));
    assert_eq!(panel.pointer(PointerEvent::motion(1, 0)), None);
    assert_eq!(panel.pointer(PointerEvent::motion(7, 0)), Some(PointerShape::Default));
    assert_eq!(panel.pointer(PointerEvent::motion(0, 0)), Some(PointerShape::Pointer));
    assert_eq!(panel.focus_lost(), Some(PointerShape::Default));
}

#[test]
fn test_content_change_under_still_pointer_retargets() {
    let (tx, rx) = mpsc::channel::<ModuleId>();
    let left = Feed::new("abcdef");
    let mut panel = start_panel(Groups::new(vec![Label::boxed("left", &left)], vec![], vec![]), 10, &tx);

    panel.pointer(PointerEvent::motion(4, 0));
    assert!(panel.hovered().is_some());
    left.events();

    // module shrinks, pointer now rests on background
    left.set_text("ab");
    assert!(left.notifier().unwrap().notify());
    let id = rx.recv().unwrap();
    panel.refresh(id);

    assert_eq!(panel.hovered(), None);
    assert_eq!(focus_events(&left.events()), vec!["out"]);
}
