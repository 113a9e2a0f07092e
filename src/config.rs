// Configuration file: bar settings and the three module groups

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bar::layout::marker;
use crate::bar::{Anchor, Groups, LayoutSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bar: BarSettings,

    #[serde(default)]
    pub left: Vec<ModuleSpec>,

    #[serde(default)]
    pub middle: Vec<ModuleSpec>,

    #[serde(default)]
    pub right: Vec<ModuleSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSettings {
    /// Order in which groups keep their content when they collide
    #[serde(default = "default_truncate_priority")]
    pub truncate_priority: Vec<Anchor>,

    /// Mark truncated content with `ellipsis`
    #[serde(default = "default_true")]
    pub enable_ellipsis: bool,

    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

/// One configured module: its registered name plus its own options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub module: String,

    #[serde(flatten)]
    pub options: toml::Table,
}

fn default_truncate_priority() -> Vec<Anchor> {
    vec![Anchor::End, Anchor::Start, Anchor::Center]
}

fn default_true() -> bool {
    true
}

fn default_ellipsis() -> String {
    "…".to_string()
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            truncate_priority: default_truncate_priority(),
            enable_ellipsis: true,
            ellipsis: default_ellipsis(),
        }
    }
}

impl ModuleSpec {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            options: toml::Table::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bar: BarSettings::default(),
            left: vec![ModuleSpec::new("text").with("text", " cellbar ")],
            middle: vec![ModuleSpec::new("clock").with("format", "%a %d %b  %H:%M")],
            right: vec![
                ModuleSpec::new("cpu").with("format", "cpu {usage}% "),
                ModuleSpec::new("ram").with("format", "mem {used}/{total} "),
            ],
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("cellbar");
        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or create a default one if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            return Self::parse(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        let config = Config::default();

        // A read-only config dir is not fatal
        if let Err(e) = config.save_to(path) {
            tracing::warn!("could not create default config file: {:#}", e);
        } else {
            tracing::info!("wrote default config to {}", path.display());
        }

        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let priority = &self.bar.truncate_priority;
        if priority.len() != 3 || Anchor::ALL.iter().any(|a| !priority.contains(a)) {
            bail!("bar.truncate_priority must name left, middle and right exactly once");
        }
        Ok(())
    }

    /// Layout settings for the compositor; call after `validate`
    pub fn layout_settings(&self) -> LayoutSettings {
        let mut priority = LayoutSettings::default().priority;
        for (slot, anchor) in priority.iter_mut().zip(&self.bar.truncate_priority) {
            *slot = *anchor;
        }

        let ellipsis = marker(&self.bar.ellipsis);
        LayoutSettings {
            priority,
            ellipsis: (self.bar.enable_ellipsis && !ellipsis.is_empty()).then_some(ellipsis),
        }
    }

    pub fn groups(&self) -> Groups<&[ModuleSpec]> {
        Groups::new(&self.left, &self.middle, &self.right)
    }
}
