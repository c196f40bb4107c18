//! Configuration view and validation commands: `afn config`.

use anyhow::{Context, Result};

use afn::afn_config::{AfnConfig, AfnToml};

use super::super::ConfigCommands;

fn print_toml(toml: &AfnToml) {
    println!("[server]");
    println!("  base_url = \"{}\"", toml.server.base_url);
    println!("  timeout_secs = {}", toml.server.timeout_secs);
    println!();

    println!("[auth]");
    println!(
        "  api_token = {}",
        if toml.auth.api_token.is_some() { "(set)" } else { "(unset)" }
    );
    println!(
        "  csrf_token = {}",
        if toml.auth.csrf_token.is_some() { "(set)" } else { "(unset)" }
    );
    println!();

    println!("[endpoints]");
    println!("  request_get = \"{}\"", toml.endpoints.request_get);
    println!("  request_update = \"{}\"", toml.endpoints.request_update);
    println!("  request_create = \"{}\"", toml.endpoints.request_create);
    println!("  list_datatables = \"{}\"", toml.endpoints.list_datatables);
    println!("  transitions = \"{}\"", toml.endpoints.transitions);
    println!();

    println!("[display]");
    println!("  page_size = {}", toml.display.page_size);
    println!("  date_format = \"{}\"", toml.display.date_format);
    println!();

    println!("[logging]");
    println!("  level = \"{}\"", toml.logging.level);
    println!("  format = \"{}\"", toml.logging.format);
    println!();
}

pub fn cmd_config(config: &AfnConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.path.as_deref();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("afn Configuration");
            println!("=================");
            println!();

            match config_path {
                Some(path) if path.exists() => {
                    println!("Config file: {}", path.display());
                }
                Some(path) => {
                    println!("No afn.toml found at {}", path.display());
                    println!("Using default configuration.");
                }
                None => println!("No config directory; using default configuration."),
            }
            println!();
            print_toml(&config.toml);

            println!("Effective values (with env/CLI overrides):");
            println!("  base_url = \"{}\"", config.base_url());
            println!("  log_level = \"{}\"", config.log_level());
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.is_some_and(|p| p.exists()) {
                println!("No afn.toml found. Using defaults.");
            }

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            let path = config_path.context("Could not determine where to write afn.toml")?;
            if path.exists() {
                println!("afn.toml already exists at {}", path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if let Some(dir) = path.parent()
                && !dir.exists()
            {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }

            AfnToml::default().save(path)?;

            println!("Created afn.toml at {}", path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] base_url, timeout_secs");
            println!("  - [auth] api_token, csrf_token");
            println!("  - [display] page_size, date_format");
            println!();
        }
    }

    Ok(())
}
