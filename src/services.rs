// Long-lived shared collaborators that modules can depend on

use std::collections::BTreeMap;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sysinfo::System;

use crate::error::ServiceError;

pub trait Service: Send {
    fn name(&self) -> &str;
    fn start(&mut self) -> Result<(), ServiceError>;
    fn stop(&mut self) -> Result<(), ServiceError>;
}

#[derive(Debug, Clone)]
enum ServiceState {
    Stopped,
    Running,
    Failed(ServiceError),
}

struct Entry {
    service: Box<dyn Service>,
    state: ServiceState,
}

/// Services by name, started on first demand
#[derive(Default)]
pub struct ServiceRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, service: Box<dyn Service>) {
        let name = service.name().to_string();
        self.entries.insert(
            name,
            Entry {
                service,
                state: ServiceState::Stopped,
            },
        );
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|e| matches!(e.state, ServiceState::Running))
    }

    /// Start the service unless it is already running.
    /// A failed start is remembered and returned again without retrying.
    pub fn ensure_running(&mut self, name: &str) -> Result<(), ServiceError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ServiceError::Unknown(name.to_string()))?;

        match &entry.state {
            ServiceState::Running => return Ok(()),
            ServiceState::Failed(e) => return Err(e.clone()),
            ServiceState::Stopped => {}
        }

        match entry.service.start() {
            Ok(()) => {
                tracing::info!("service '{}' started", name);
                entry.state = ServiceState::Running;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{}", e);
                entry.state = ServiceState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Stop every running service, logging failures
    pub fn stop_all(&mut self) {
        for (name, entry) in &mut self.entries {
            if !matches!(entry.state, ServiceState::Running) {
                continue;
            }
            if let Err(e) = entry.service.stop() {
                tracing::warn!("{}", e);
            }
            tracing::debug!("service '{}' stopped", name);
            entry.state = ServiceState::Stopped;
        }
    }
}

/// Latest CPU and memory figures
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemSnapshot {
    /// Global CPU usage (0-100)
    pub cpu_usage: f32,

    pub total_memory: u64,
    pub used_memory: u64,
    pub available_memory: u64,
}

impl SystemSnapshot {
    pub fn memory_used_percent(&self) -> u8 {
        if self.total_memory == 0 {
            return 0;
        }
        ((self.used_memory as f64 / self.total_memory as f64) * 100.0).round() as u8
    }
}

/// Read-only handle shared by the modules depending on `sysmon`
#[derive(Debug, Clone, Default)]
pub struct SystemStats {
    inner: Arc<RwLock<Option<SystemSnapshot>>>,
}

impl SystemStats {
    pub fn snapshot(&self) -> Option<SystemSnapshot> {
        self.inner.read().ok().and_then(|s| *s)
    }

    pub fn publish(&self, snapshot: SystemSnapshot) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(snapshot);
        }
    }
}

/// Samples the system in one background thread for every CPU/RAM module
pub struct SystemMonitor {
    interval: Duration,
    stats: SystemStats,
    /// Dropping the sender wakes the sampling thread and ends it
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl SystemMonitor {
    pub const NAME: &'static str = "sysmon";

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            stats: SystemStats::default(),
            stop_tx: None,
            worker: None,
        }
    }

    pub fn stats(&self) -> SystemStats {
        self.stats.clone()
    }
}

fn sample(system: &mut System) -> SystemSnapshot {
    system.refresh_cpu();
    system.refresh_memory();

    SystemSnapshot {
        cpu_usage: system.global_cpu_info().cpu_usage(),
        total_memory: system.total_memory(),
        used_memory: system.used_memory(),
        available_memory: system.available_memory(),
    }
}

impl Service for SystemMonitor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn start(&mut self) -> Result<(), ServiceError> {
        if self.worker.is_some() {
            return Ok(());
        }

        let mut system = System::new();
        self.stats.publish(sample(&mut system));

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let stats = self.stats.clone();
        let interval = self.interval;
        let worker = thread::Builder::new()
            .name(Self::NAME.to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => stats.publish(sample(&mut system)),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|e| ServiceError::Start {
                name: Self::NAME.to_string(),
                reason: e.to_string(),
            })?;

        self.stop_tx = Some(stop_tx);
        self.worker = Some(worker);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ServiceError> {
        self.stop_tx.take();
        if let Some(worker) = self.worker.take() {
            worker.join().map_err(|_| ServiceError::Stop {
                name: Self::NAME.to_string(),
                reason: "sampling thread panicked".to_string(),
            })?;
        }
        Ok(())
    }
}
