// Error types for modules and services

use thiserror::Error;

/// Failures local to one module. None of these abort the bar.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("module '{0}' is not registered")]
    Unknown(String),

    #[error("{module}: bad config: {source}")]
    Options {
        module: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{module}: {reason}")]
    Invalid { module: String, reason: String },

    #[error("{module}: required resource unavailable: {reason}")]
    Unavailable { module: String, reason: String },

    #[error("{module}: dependency '{service}' unavailable: {source}")]
    Dependency {
        module: String,
        service: String,
        #[source]
        source: ServiceError,
    },

    #[error("render failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("service '{0}' is not registered")]
    Unknown(String),

    #[error("service '{name}' failed to start: {reason}")]
    Start { name: String, reason: String },

    #[error("service '{name}' failed to stop: {reason}")]
    Stop { name: String, reason: String },
}
