//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use tracing::warn;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Write the configuration file with current values
    Init(ConfigInitArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write the configuration file
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Init(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            print_json(&config)?;
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigInitArgs {
    /// Execute init command
    pub fn execute(&self) -> CliResult<()> {
        let path = Config::config_file_path()?;
        if path.exists() && !self.force {
            return Err(CliError::validation(format!(
                "Configuration already exists at {} (use --force to overwrite)",
                path.display()
            )));
        }

        // Keep valid existing values when overwriting.
        let config = Config::load().unwrap_or_else(|err| {
            warn!("Ignoring unreadable configuration, writing defaults: {err:#}");
            Config::default()
        });
        config
            .save_to(&path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration written to {}", path.display());
        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("fbkeys Configuration");
    println!("====================");
    println!();

    println!("Devices:");
    println!("  Framebuffer: {}", config.devices.framebuffer.display());
    match &config.devices.touchscreen {
        Some(path) => println!("  Touchscreen: {}", path.display()),
        None => println!("  Touchscreen: (auto-detect)"),
    }
    println!();

    println!("Display:");
    match config.display.rotation() {
        Some(rotation) => println!("  Rotation: {rotation}"),
        None => println!("  Rotation: (from console)"),
    }
    println!("  Anchor: {}", config.display.anchor);
    println!("  Follow Rotation: {}", config.display.follow_rotation);
    println!();

    let theme = &config.theme;
    println!("Theme:");
    println!("  Background: {}", theme.background);
    println!("  Key: {}", theme.key);
    println!("  Key Pressed: {}", theme.key_pressed);
    println!("  Label: {}", theme.label);
    println!("  Divider: {}", theme.divider);
    println!("  Modifier Active: {}", theme.modifier_active);
    println!();
}
