//! acsd-cli - demonstrates the control-RPC surface against an in-process
//! `StateMachineManager`. No network transport: each invocation bootstraps
//! one demo device via a synthetic Inform, then drives the requested
//! control command against it.

use clap::{Parser, Subcommand};
use colored::*;

use enodebd_acs::config::AcsConfig;
use enodebd_acs::core::registry::StateMachineManager;
use enodebd_acs::data_model::TrValue;
use enodebd_acs::messages::{DeviceIdStruct, EventStruct, InboundMessage, ParameterValueStruct, EVENT_BOOTSTRAP};
use enodebd_acs::services::ControlService;

const DEMO_SERIAL: &str = "DEMO000000001";

#[derive(Parser)]
#[command(name = "acsd-cli")]
#[command(about = "enodebd-acsd control surface demo")]
#[command(version = enodebd_acs::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service-wide status
    Status,
    /// Show status for every connected device
    AllStatus,
    /// Show status for the demo device
    EnodebStatus,
    /// Read a parameter by wire path
    GetParameter { path: String },
    /// Set a string parameter by wire path
    SetParameter { path: String, value: String },
    /// Reboot the demo device
    Reboot,
    /// Reboot every connected device
    RebootAll,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AcsConfig::default_config();
    let entry = config.registry.entries[0].clone();
    let manager = StateMachineManager::new(config, None);

    let bootstrap = InboundMessage::Inform {
        device_id: DeviceIdStruct {
            manufacturer: "Baicells".to_string(),
            oui: entry.oui.clone(),
            product_class: "FAP".to_string(),
            serial_number: DEMO_SERIAL.to_string(),
        },
        events: vec![EventStruct::new(EVENT_BOOTSTRAP)],
        parameters: vec![
            ParameterValueStruct { name: "Device.DeviceInfo.HardwareVersion".to_string(), value: entry.hardware_version },
            ParameterValueStruct { name: "Device.DeviceInfo.SoftwareVersion".to_string(), value: entry.software_version },
        ],
    };
    manager.dispatch(DEMO_SERIAL, bootstrap).await?;

    let control = ControlService::new(&manager);

    match cli.command {
        Commands::Status => show_status(&control),
        Commands::AllStatus => show_all_status(&control),
        Commands::EnodebStatus => show_enodeb_status(&control),
        Commands::GetParameter { path } => get_parameter(&control, &path),
        Commands::SetParameter { path, value } => set_parameter(&control, &path, &value),
        Commands::Reboot => reboot(&control),
        Commands::RebootAll => reboot_all(&control),
    }
}

fn show_status(control: &ControlService) -> Result<(), Box<dyn std::error::Error>> {
    let status = control.get_status();
    println!("{}", "enodebd-acsd status".bold().blue());
    println!("  Connected eNodeBs: {}", status.connected_enodebs.to_string().green());
    Ok(())
}

fn show_all_status(control: &ControlService) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Connected eNodeBs".bold().blue());
    for status in control.get_all_enodeb_status() {
        print_status(&status);
    }
    Ok(())
}

fn show_enodeb_status(control: &ControlService) -> Result<(), Box<dyn std::error::Error>> {
    let status = control.get_enodeb_status(DEMO_SERIAL)?;
    print_status(&status);
    Ok(())
}

fn print_status(status: &enodebd_acs::services::EnodebStatus) {
    println!("{}: {}", "Serial".bold(), status.device_serial);
    println!("  State:         {:?}", status.fsm_state);
    println!("  Configured:    {}", colorize_bool(status.configured));
    println!("  OpState:       {}", colorize_bool(status.opstate_enabled));
    println!("  RF Tx on:      {}", colorize_bool(status.rf_tx_on));
    println!("  GPS connected: {}", colorize_bool(status.gps_connected));
    println!("  PTP connected: {}", colorize_bool(status.ptp_connected));
    println!("  MME connected: {}", colorize_bool(status.mme_connected));
}

fn colorize_bool(value: bool) -> ColoredString {
    if value { "true".green() } else { "false".red() }
}

fn get_parameter(control: &ControlService, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let value = control.get_parameter(DEMO_SERIAL, path)?;
    println!("{} = {}", path, value.green());
    Ok(())
}

fn set_parameter(control: &ControlService, path: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    control.set_parameter(DEMO_SERIAL, path, TrValue::Str(value.to_string()))?;
    println!("{}", format!("{path} queued for set to {value}").green());
    Ok(())
}

fn reboot(control: &ControlService) -> Result<(), Box<dyn std::error::Error>> {
    control.reboot(DEMO_SERIAL)?;
    println!("{}", "reboot queued".green());
    Ok(())
}

fn reboot_all(control: &ControlService) -> Result<(), Box<dyn std::error::Error>> {
    control.reboot_all();
    println!("{}", "reboot queued for all connected devices".green());
    Ok(())
}
