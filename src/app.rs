use crate::cli::{Cli, Commands};
use cellbar::config::Config;
use cellbar::modules::{FactoryContext, ModuleRegistry};
use cellbar::{logging, ui};
use std::path::Path;
use std::process;

pub fn run(cli: Cli) {
    let level = match logging::parse_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path, level) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let config_path = match cli.config.clone().map_or_else(Config::config_path, Ok) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    // Handle subcommands first
    if let Some(command) = cli.command {
        match command {
            Commands::CheckConfig => handle_check_config(&config_path),
            Commands::InitConfig => handle_init_config(&config_path),
            Commands::ListModules => handle_list_modules(),
        }
        return;
    }

    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    // Run the bar (default behavior)
    if let Err(e) = ui::run_bar(&config) {
        tracing::error!("bar stopped: {:#}", e);
        eprintln!("Error running bar: {:#}", e);
        process::exit(1);
    }
}

fn handle_check_config(path: &Path) {
    let config = if path.exists() {
        match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|contents| Config::parse(&contents))
        {
            Ok(config) => {
                println!("Config parsed: {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Config invalid: {}: {:#}", path.display(), e);
                process::exit(1);
            }
        }
    } else {
        println!("No config at {}, built-in defaults would be used", path.display());
        Config::default()
    };

    let registry = ModuleRegistry::builtin(&FactoryContext::default());
    let mut failures = 0;
    for (anchor, specs) in config.groups().iter() {
        println!("{}:", anchor.label());
        for spec in specs.iter() {
            match registry.create(spec) {
                Ok(_) => println!("  {:<8} ok", spec.module),
                Err(e) => {
                    failures += 1;
                    println!("  {:<8} error: {}", spec.module, e);
                }
            }
        }
    }

    let priority: Vec<&str> = config.bar.truncate_priority.iter().map(|a| a.label()).collect();
    println!("truncate priority: {}", priority.join(", "));

    if failures > 0 {
        eprintln!("{} module(s) would be skipped", failures);
        process::exit(1);
    }
}

fn handle_init_config(path: &Path) {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }

    println!("Creating default config...");
    if let Err(e) = Config::default().save_to(path) {
        eprintln!("Failed to save default config: {:#}", e);
        process::exit(1);
    }
    println!("Default config saved to {}", path.display());
}

fn handle_list_modules() {
    let registry = ModuleRegistry::builtin(&FactoryContext::default());
    for name in registry.names() {
        println!("{}", name);
    }
}
