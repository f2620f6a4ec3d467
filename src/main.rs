//! enodebd-acsd main application

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};

use enodebd_acs::{
    config::AcsConfig,
    core::registry::StateMachineManager,
    messages::{DeviceIdStruct, EventStruct, InboundMessage, ParameterValueStruct, EVENT_BOOTSTRAP},
    utils::setup_logging,
    Result,
};

#[derive(Parser)]
#[command(name = "enodebd-acsd")]
#[command(about = "TR-069 auto-configuration server core for LTE eNodeBs")]
#[command(version = enodebd_acs::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ACS core against a simulated transport feed
    Start,
    /// Validate configuration
    ValidateConfig,
    /// Generate default configuration
    GenerateConfig {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report whether the configured registry is well formed
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_configuration(&cli)?;
    setup_logging(&config.logging)?;

    info!("Starting {} v{}", enodebd_acs::NAME, enodebd_acs::VERSION);
    info!("Description: {}", enodebd_acs::DESCRIPTION);

    match &cli.command {
        Some(Commands::Start) | None => run(config).await,
        Some(Commands::ValidateConfig) => validate_configuration(&config),
        Some(Commands::GenerateConfig { output }) => generate_default_config(output.clone()),
        Some(Commands::Status) => show_status(&config),
    }
}

fn load_configuration(cli: &Cli) -> Result<AcsConfig> {
    let config = if let Some(path) = &cli.config {
        info!("Loading configuration from: {}", path.display());
        AcsConfig::load_from_file(path)?
    } else {
        info!("No configuration file specified, trying environment variables");
        match AcsConfig::load_from_env() {
            Ok(config) => config,
            Err(_) => {
                info!("No environment configuration found, using defaults");
                AcsConfig::default_config()
            }
        }
    };
    config.validate()?;
    info!("Configuration loaded and validated successfully");
    Ok(config)
}

/// Runs the provisioning core against a small built-in feed, standing in
/// for the real transport this crate does not implement (see the
/// out-of-scope list). Demonstrates a single device walking through its
/// first round trip before idling for shutdown.
async fn run(config: AcsConfig) -> Result<()> {
    let registry_entry = config.registry.entries[0].clone();
    let manager = Arc::new(StateMachineManager::new(config, None));

    let demo_manager = Arc::clone(&manager);
    let demo_task = tokio::spawn(async move {
        let serial = "DEMO000000001".to_string();
        let inform = InboundMessage::Inform {
            device_id: DeviceIdStruct {
                manufacturer: "Baicells".to_string(),
                oui: registry_entry.oui.clone(),
                product_class: "FAP".to_string(),
                serial_number: serial.clone(),
            },
            events: vec![EventStruct::new(EVENT_BOOTSTRAP)],
            parameters: vec![
                ParameterValueStruct { name: "Device.DeviceInfo.HardwareVersion".to_string(), value: registry_entry.hardware_version.clone() },
                ParameterValueStruct { name: "Device.DeviceInfo.SoftwareVersion".to_string(), value: registry_entry.software_version.clone() },
            ],
        };
        match demo_manager.dispatch(&serial, inform).await {
            Ok(out) => info!(?out, "demo device provisioned its first round trip"),
            Err(e) => warn!(error = %e, "demo device dispatch failed"),
        }
    });

    tokio::select! {
        _ = demo_task => {}
        _ = signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }

    info!("enodebd-acsd shutdown complete");
    Ok(())
}

fn validate_configuration(config: &AcsConfig) -> Result<()> {
    info!("Validating configuration...");
    config.validate()?;

    println!("Configuration is valid");
    println!("  Node ID: {}", config.general.node_id);
    println!("  Registered device models: {}", config.registry.entries.len());
    println!("  SAS enabled: {}", config.sas.enabled);
    Ok(())
}

fn generate_default_config(output_path: Option<PathBuf>) -> Result<()> {
    let config = AcsConfig::default_config();
    let toml_content = toml::to_string_pretty(&config)
        .map_err(|e| enodebd_acs::Error::internal(format!("failed to serialize config: {e}")))?;

    match output_path {
        Some(path) => {
            std::fs::write(&path, toml_content)?;
            println!("Default configuration written to: {}", path.display());
        }
        None => println!("{toml_content}"),
    }
    Ok(())
}

fn show_status(config: &AcsConfig) -> Result<()> {
    println!("Registry entries:");
    for entry in &config.registry.entries {
        println!("  {} / {} / {} -> {}", entry.oui, entry.hardware_version, entry.software_version, entry.model_key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_generation_round_trips() {
        let config = AcsConfig::default_config();
        let toml_content = toml::to_string_pretty(&config).unwrap();
        assert!(toml::from_str::<AcsConfig>(&toml_content).is_ok());
    }

    #[test]
    fn validate_configuration_accepts_default() {
        let config = AcsConfig::default_config();
        assert!(validate_configuration(&config).is_ok());
    }
}
