// Module registry: maps configured names to factory closures

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::clock::{Clock, ClockOptions};
use super::cpu::{Cpu, CpuOptions};
use super::exec::{Exec, ExecOptions};
use super::ram::{Ram, RamOptions};
use super::text::{Text, TextOptions};
use crate::bar::Module;
use crate::config::ModuleSpec;
use crate::error::ModuleError;
use crate::services::SystemStats;

type Factory = Box<dyn Fn(toml::Table) -> Result<Box<dyn Module>, ModuleError>>;

/// Shared handles the built-in factories hand to their modules
#[derive(Debug, Clone, Default)]
pub struct FactoryContext {
    pub stats: SystemStats,
}

#[derive(Default)]
pub struct ModuleRegistry {
    factories: BTreeMap<String, Factory>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in module
    pub fn builtin(ctx: &FactoryContext) -> Self {
        let mut registry = Self::new();

        registry.register(Text::NAME, |o: TextOptions| Ok(Box::new(Text::new(o)?)));
        registry.register(Clock::NAME, |o: ClockOptions| Ok(Box::new(Clock::new(o)?)));
        registry.register(Exec::NAME, |o: ExecOptions| Ok(Box::new(Exec::new(o)?)));

        let stats = ctx.stats.clone();
        registry.register(Cpu::NAME, move |o: CpuOptions| Ok(Box::new(Cpu::new(o, stats.clone())?)));
        let stats = ctx.stats.clone();
        registry.register(Ram::NAME, move |o: RamOptions| Ok(Box::new(Ram::new(o, stats.clone())?)));

        registry
    }

    /// Register a factory taking typed options.
    ///
    /// Missing keys fall back to `T::default()`.
    pub fn register<T, F>(&mut self, name: &str, build: F)
    where
        T: DeserializeOwned + Default + 'static,
        F: Fn(T) -> Result<Box<dyn Module>, ModuleError> + 'static,
    {
        let module = name.to_string();
        let factory = move |options: toml::Table| {
            let options: T = if options.is_empty() {
                T::default()
            } else {
                toml::Value::Table(options)
                    .try_into()
                    .map_err(|source| ModuleError::Options {
                        module: module.clone(),
                        source,
                    })?
            };
            build(options)
        };
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn create(&self, spec: &ModuleSpec) -> Result<Box<dyn Module>, ModuleError> {
        let factory = self
            .factories
            .get(&spec.module)
            .ok_or_else(|| ModuleError::Unknown(spec.module.clone()))?;
        factory(spec.options.clone())
    }

    /// Build one anchor group, logging and skipping entries that fail
    pub fn instantiate(&self, specs: &[ModuleSpec]) -> Vec<Box<dyn Module>> {
        specs
            .iter()
            .filter_map(|spec| match self.create(spec) {
                Ok(module) => Some(module),
                Err(e) => {
                    tracing::warn!("skipping module '{}': {}", spec.module, e);
                    None
                }
            })
            .collect()
    }
}
