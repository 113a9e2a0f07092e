// Integration tests for config files on disk and the modules they build

use cellbar::bar::Anchor;
use cellbar::config::Config;
use cellbar::modules::{FactoryContext, ModuleRegistry};
use std::fs;
use tempfile::tempdir;

const FULL_CONFIG: &str = r##"
[bar]
truncate_priority = ["middle", "right", "left"]
ellipsis = "~"

[[left]]
module = "text"
text = " main "
fg = "black"
bg = "#88c0d0"

[left.onmouse.left]
run = "notify-send hello"

[left.onmouse.hover]
config = { bg = "yellow", cursor = "pointer" }

[[left]]
module = "exec"
command = "echo 3 updates"
interval = "30s"

[[middle]]
module = "clock"
format = "%H:%M"
tick = 1

[[right]]
module = "cpu"
format = "{usage}%"

[[right.threshold]]
percent = 90
fg = "red"

[[right]]
module = "ram"
format = "{used} / {total}"
"##;

#[test]
fn test_full_config_builds_every_module() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.bar.truncate_priority, vec![Anchor::Center, Anchor::End, Anchor::Start]);

    let registry = ModuleRegistry::builtin(&FactoryContext::default());
    for (anchor, specs) in config.groups().iter() {
        for spec in specs.iter() {
            if let Err(e) = registry.create(spec) {
                panic!("{} module '{}' rejected: {}", anchor.label(), spec.module, e);
            }
        }
    }

    let settings = config.layout_settings();
    assert_eq!(settings.priority, [Anchor::Center, Anchor::End, Anchor::Start]);
    assert_eq!(settings.ellipsis.map(|m| m[0].grapheme.clone()).as_deref(), Some("~"));
}

#[test]
fn test_bad_module_options_only_skip_that_module() {
    let config = Config::parse(
        r#"
        [[left]]
        module = "clock"
        format = "%Q"

        [[left]]
        module = "text"
        text = "ok"
        colour = "red"

        [[left]]
        module = "text"
        text = "kept"
        "#,
    )
    .unwrap();

    let registry = ModuleRegistry::builtin(&FactoryContext::default());
    let modules = registry.instantiate(&config.left);
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].render().unwrap().len(), 4);
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cellbar").join("config.toml");

    let config = Config::load_from(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("module = \"clock\""));
    assert_eq!(Config::parse(&written).unwrap().right, config.right);
}

#[test]
fn test_invalid_priority_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[bar]\ntruncate_priority = [\"left\", \"middle\"]\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("truncate_priority"));
}
