// cellbar: a single-row terminal status bar

pub mod bar;
pub mod config;
pub mod error;
pub mod logging;
pub mod modules;
pub mod services;
pub mod ui;
