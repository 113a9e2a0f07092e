// Integration tests for the bar loop against ratatui's test backend

use cellbar::bar::{Button, Groups, ModuleEvent, Panel};
use cellbar::ui::{BarEvent, run_loop};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::sync::mpsc::{self, Sender};

use crate::common::helpers::{Label, Feed, start_panel};

fn top_row(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let row: String = (0..buffer.area.width)
        .map(|x| buffer[(x, 0)].symbol().to_string())
        .collect();
    format!("|{}|", row)
}

fn mouse(kind: MouseEventKind, column: u16) -> BarEvent {
    BarEvent::Input(Event::Mouse(MouseEvent {
        kind,
        column,
        row: 0,
        modifiers: KeyModifiers::NONE,
    }))
}

/// "status" on the left (clickable), "12:00" on the right
struct Bar {
    terminal: Terminal<TestBackend>,
    panel: Panel,
    tx: Sender<BarEvent>,
    rx: mpsc::Receiver<BarEvent>,
    left: Feed,
    right: Feed,
}

fn bar(width: u16) -> Bar {
    let (tx, rx) = mpsc::channel();
    let left = Feed::new("status");
    let right = Feed::new("12:00");
    let panel = start_panel(
        Groups::new(vec![Label::clickable("left", &left)], vec![], vec![Label::boxed("right", &right)]),
        width as usize,
        &tx,
    );
    Bar {
        terminal: Terminal::new(TestBackend::new(width, 1)).unwrap(),
        panel,
        tx,
        rx,
        left,
        right,
    }
}

impl Bar {
    /// Queue `events`, hang up every producer and run until the queue closes.
    /// Returns what the loop wrote to the pointer-shape stream.
    fn drain(&mut self, events: Vec<BarEvent>) -> String {
        for event in events {
            self.tx.send(event).unwrap();
        }
        self.left.hang_up();
        self.right.hang_up();

        let (tx, rx) = mpsc::channel();
        drop(std::mem::replace(&mut self.tx, tx));
        let queue = std::mem::replace(&mut self.rx, rx);

        let mut out = Vec::new();
        run_loop(&mut self.terminal, &mut self.panel, queue, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Queue `events` followed by a quit request; module channels stay open
    fn until_quit(&mut self, mut events: Vec<BarEvent>) -> String {
        events.push(BarEvent::Quit("test"));
        for event in events {
            self.tx.send(event).unwrap();
        }

        let (tx, rx) = mpsc::channel();
        let queue = std::mem::replace(&mut self.rx, rx);
        drop(tx);

        let mut out = Vec::new();
        run_loop(&mut self.terminal, &mut self.panel, queue, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }
}

#[test]
fn test_initial_frame() {
    let mut bar = bar(20);
    bar.drain(vec![]);
    insta::assert_snapshot!(top_row(&bar.terminal), @"|status         12:00|");
}

#[test]
fn test_module_refresh_redraws_line() {
    let mut bar = bar(20);
    bar.right.set_text("12:01");
    assert!(bar.right.notifier().unwrap().notify());

    bar.drain(vec![]);
    insta::assert_snapshot!(top_row(&bar.terminal), @"|status         12:01|");
}

#[test]
fn test_resize_recomposites() {
    let mut bar = bar(20);
    bar.terminal.backend_mut().resize(9, 1);

    bar.drain(vec![BarEvent::Input(Event::Resize(9, 1))]);
    insta::assert_snapshot!(top_row(&bar.terminal), @"|sta…12:00|");
}

#[test]
fn test_redraw_request_keeps_content() {
    let mut bar = bar(12);
    bar.drain(vec![BarEvent::Redraw("SIGUSR1")]);
    insta::assert_snapshot!(top_row(&bar.terminal), @"|status 12:00|");
}

#[test]
fn test_hover_writes_pointer_shape() {
    let mut bar = bar(20);
    let out = bar.drain(vec![mouse(MouseEventKind::Moved, 2)]);
    assert_eq!(out, "\x1b]22;pointer\x1b\\");
}

#[test]
fn test_shape_changes_within_one_batch_cancel_out() {
    let mut bar = bar(20);
    let out = bar.drain(vec![mouse(MouseEventKind::Moved, 2), mouse(MouseEventKind::Moved, 10)]);
    assert_eq!(out, "");
    assert_eq!(bar.panel.hovered(), None);
}

#[test]
fn test_clicks_and_scrolls_reach_their_modules() {
    let mut bar = bar(20);
    bar.until_quit(vec![
        mouse(MouseEventKind::Down(MouseButton::Left), 1),
        mouse(MouseEventKind::ScrollUp, 17),
    ]);

    let pressed = |events: Vec<ModuleEvent>| -> Vec<Button> {
        events
            .into_iter()
            .filter_map(|e| match e {
                ModuleEvent::Pointer { event, .. } if event.is_press() => event.button,
                _ => None,
            })
            .collect()
    };
    assert_eq!(pressed(bar.left.events()), vec![Button::Left]);
    assert_eq!(pressed(bar.right.events()), vec![Button::WheelUp]);
}

#[test]
fn test_ctrl_c_stops_with_producers_alive() {
    let mut bar = bar(20);
    let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    bar.tx.send(BarEvent::Input(Event::Key(key))).unwrap();

    let queue = std::mem::replace(&mut bar.rx, mpsc::channel().1);
    run_loop(&mut bar.terminal, &mut bar.panel, queue, &mut Vec::new()).unwrap();
    assert!(bar.left.was_started());
}

#[test]
fn test_focus_lost_leaves_hovered_module() {
    let mut bar = bar(20);
    bar.until_quit(vec![mouse(MouseEventKind::Moved, 3), BarEvent::Input(Event::FocusLost)]);

    let kinds: Vec<&str> = bar
        .left
        .events()
        .iter()
        .map(|e| match e {
            ModuleEvent::FocusIn { .. } => "in",
            ModuleEvent::FocusOut { .. } => "out",
            ModuleEvent::Pointer { .. } => "pointer",
        })
        .collect();
    assert_eq!(kinds, vec!["in", "pointer", "out"]);
    assert_eq!(bar.panel.hovered(), None);
}
