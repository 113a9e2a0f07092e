// Integration tests for module startup, isolation and refresh plumbing

use cellbar::bar::cell::line_text;
use cellbar::bar::{Button, Groups, ModuleId, PointerEvent, runtime};
use cellbar::config::Config;
use cellbar::modules::{FactoryContext, ModuleRegistry};
use cellbar::services::{ServiceRegistry, SystemSnapshot, SystemStats};
use std::sync::mpsc;
use std::time::Duration;

use crate::common::helpers::{Label, Feed, start_panel};

#[test]
fn test_failed_module_is_absent_and_gets_no_input() {
    let (tx, _rx) = mpsc::channel::<ModuleId>();
    let ok = Feed::new("ok");
    let broken = Feed::new("BROKEN");
    let mut panel = start_panel(
        Groups::new(
            vec![Label::broken("broken", &broken), Label::boxed("ok", &ok)],
            vec![],
            vec![],
        ),
        6,
        &tx,
    );

    assert_eq!(panel.module_count(), 1);
    assert_eq!(line_text(panel.line()), "ok    ");
    assert!(!broken.was_started());

    for column in 0..6 {
        panel.pointer(PointerEvent::press(column, 0, Button::Left));
    }
    assert!(!ok.events().is_empty());
    assert!(broken.events().is_empty());
}

#[test]
fn test_each_signal_becomes_one_refresh() {
    let (tx, rx) = mpsc::channel::<ModuleId>();
    let feed = Feed::new("1");
    let mut panel = start_panel(Groups::new(vec![], vec![Label::boxed("count", &feed)], vec![]), 5, &tx);
    assert_eq!(line_text(panel.line()), "  1  ");

    let notifier = feed.notifier().unwrap();
    for text in ["2", "3"] {
        feed.set_text(text);
        assert!(notifier.notify());
        let id = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        panel.refresh(id);
        assert_eq!(line_text(panel.line()), format!("  {}  ", text));
    }

    // the adapter ends with the module's notifier
    drop(notifier);
    feed.hang_up();
    drop(tx);
    assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
}

#[test]
fn test_configured_click_cycles_text() {
    let config = Config::parse(
        r#"
        [[left]]
        module = "text"
        text = "one"

        [left.onmouse.left]
        config = [{ format = "two" }, { format = "three" }]

        [[right]]
        module = "nonexistent"
        "#,
    )
    .unwrap();

    let registry = ModuleRegistry::builtin(&FactoryContext::default());
    let configured = config.groups().map(|_, specs| registry.instantiate(specs));
    let (tx, rx) = mpsc::channel::<ModuleId>();
    let mut panel = start_panel(configured, 8, &tx);
    assert_eq!(panel.module_count(), 1);
    assert_eq!(line_text(panel.line()), "one     ");

    for expected in ["two     ", "three   ", "one     "] {
        panel.pointer(PointerEvent::press(0, 0, Button::Left));
        panel.pointer(PointerEvent::release(0, 0, Button::Left));
        let id = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        panel.refresh(id);
        assert_eq!(line_text(panel.line()), expected);
    }
}

#[test]
fn test_stat_modules_wait_for_their_service() {
    let stats = SystemStats::default();
    let registry = ModuleRegistry::builtin(&FactoryContext { stats: stats.clone() });
    let config = Config::parse(
        r#"
        [[right]]
        module = "cpu"
        format = "cpu {usage}%"
        "#,
    )
    .unwrap();

    // sysmon was never registered, so the cpu module cannot start
    let configured = config.groups().map(|_, specs| registry.instantiate(specs));
    let (tx, _rx) = mpsc::channel::<ModuleId>();
    let mut services = ServiceRegistry::new();
    let (table, groups) = runtime::start(configured, &mut services, &tx);
    assert!(table.is_empty());
    assert!(groups.end.is_empty());

    // with a published snapshot the module renders it
    stats.publish(SystemSnapshot {
        cpu_usage: 41.6,
        ..SystemSnapshot::default()
    });
    let module = registry.create(&config.right[0]).unwrap();
    assert_eq!(line_text(&module.render().unwrap()), "cpu 42%");
}
