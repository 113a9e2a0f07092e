use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cellbar")]
#[command(about = "Single-row terminal status bar", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ~/.config/cellbar/config.toml)
    #[arg(long, short, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file (the terminal is taken by the bar)
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the config and print the resolved module layout
    CheckConfig,

    /// Write the default config file if it does not exist yet
    InitConfig,

    /// List the modules that can be used in the config
    ListModules,
}

pub fn parse() -> Cli {
    Cli::parse()
}
