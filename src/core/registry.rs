//! Device-model dispatch and the per-serial session manager.
//!
//! Grounded on `devices/device_utils.py` (OUI/HW/SW registry matching) and
//! `state_machines/enb_acs_manager.py` (`StateMachineManager`).

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use crate::config::{AcsConfig, RegistryConfig};
use crate::config_store::EnodebConfiguration;
use crate::data_model::{qafa, qrtb, DataModel, ParameterName, TrValue};
use crate::dp_client::DomainProxyClient;
use crate::error::{Error, Result};
use crate::messages::{InboundMessage, OutboundMessage, ParameterValueStruct};
use crate::session::states::InvasiveApplyPolicy;
use crate::session::{states::StateLabel, DeviceHandler};

/// Resolves a declared registry entry's OUI/hardware/software triple to its
/// data model and returns the matching model key.
fn resolve_model_key(registry: &RegistryConfig, oui: &str, hw: &str, sw: &str) -> Result<String> {
    registry
        .entries
        .iter()
        .find(|entry| entry.oui == oui && entry.hardware_version == hw && entry.software_version == sw)
        .map(|entry| entry.model_key.clone())
        .ok_or_else(|| Error::unknown_device(oui.to_string(), hw.to_string(), sw.to_string()))
}

fn extract_reported_version(parameters: &[ParameterValueStruct], suffix: &str) -> String {
    parameters
        .iter()
        .find(|p| p.name.ends_with(suffix))
        .map(|p| p.value.clone())
        .unwrap_or_default()
}

fn data_model_for(model_key: &str) -> Result<DataModel> {
    match model_key {
        "baicells_qafa" | "baicells_qafb" => Ok(qafa::data_model()),
        "baicells_qrtb" => Ok(qrtb::data_model()),
        other => Err(Error::configuration_error(format!("no data model registered for key {other}"))),
    }
}

fn postprocess_for(model_key: &str, desired_cfg: &mut EnodebConfiguration) {
    match model_key {
        "baicells_qrtb" => qrtb::postprocess(desired_cfg),
        _ => qafa::postprocess(desired_cfg),
    }
}

/// QRTB devices only apply invasive parameters across a reboot; QAFA/QAFB
/// apply them in place and re-verify on the next `check_get_params` hop.
fn policy_for(model_key: &str) -> InvasiveApplyPolicy {
    if model_key == "baicells_qrtb" {
        InvasiveApplyPolicy::ApplyViaReboot
    } else {
        InvasiveApplyPolicy::ApplyInPlace
    }
}

fn seed_desired_cfg(config: &AcsConfig, model: &DataModel, model_key: &str) -> EnodebConfiguration {
    let mut desired_cfg = EnodebConfiguration::new();
    if model.get(ParameterName::PeriodicInformInterval).is_some() {
        desired_cfg.set_parameter(
            ParameterName::PeriodicInformInterval,
            TrValue::Int(config.general.periodic_inform_interval as i64),
            None,
        );
    }
    postprocess_for(model_key, &mut desired_cfg);
    desired_cfg
}

struct ManagedHandler {
    handler: DeviceHandler,
    model_key: String,
}

/// Owns every connected device's [`DeviceHandler`], keyed by serial number.
/// Per-serial access is serialized by `DashMap`'s internal sharded locking,
/// satisfying the "mutex or single-writer queue" requirement for control-RPC
/// delivery without a separate lock layer.
pub struct StateMachineManager {
    config: AcsConfig,
    dp_client: Option<Arc<dyn DomainProxyClient>>,
    handlers: DashMap<String, ManagedHandler>,
}

impl StateMachineManager {
    pub fn new(config: AcsConfig, dp_client: Option<Arc<dyn DomainProxyClient>>) -> Self {
        Self {
            config,
            dp_client,
            handlers: DashMap::new(),
        }
    }

    fn build_handler(&self, serial: &str, model_key: &str) -> Result<DeviceHandler> {
        let model = Arc::new(data_model_for(model_key)?);
        let desired_cfg = seed_desired_cfg(&self.config, &model, model_key);
        let policy = policy_for(model_key);
        let dp_client = if model_key == "baicells_qrtb" && self.config.sas.enabled {
            self.dp_client.clone()
        } else {
            None
        };
        Ok(DeviceHandler::new(serial, model, desired_cfg, policy, dp_client, self.config.sas.clone()))
    }

    /// Routes one inbound message to the handler for `serial`, creating or
    /// re-classifying it first if the message is an `Inform`. `serial`
    /// identifies the transport-level session; the caller (out of scope
    /// here) is responsible for keeping it stable across one device's
    /// connection.
    pub async fn dispatch(&self, serial: &str, msg: InboundMessage) -> Result<OutboundMessage> {
        if let InboundMessage::Inform { device_id, parameters, .. } = &msg {
            let hw = extract_reported_version(parameters, "HardwareVersion");
            let sw = extract_reported_version(parameters, "SoftwareVersion");
            let model_key = resolve_model_key(&self.config.registry, &device_id.oui, &hw, &sw)?;

            let needs_build = match self.handlers.get(serial) {
                Some(existing) => existing.model_key != model_key,
                None => true,
            };
            if needs_build {
                info!(serial, model_key = %model_key, "registering device handler");
                let handler = self.build_handler(serial, &model_key)?;
                self.handlers.insert(serial.to_string(), ManagedHandler { handler, model_key });
            }
        }

        let mut entry = self
            .handlers
            .get_mut(serial)
            .ok_or_else(|| Error::UnknownSerial(serial.to_string()))?;

        match entry.handler.step(msg).await {
            Ok(out) => Ok(out),
            Err(e) if !e.is_fatal() => {
                warn!(serial, error = %e, "recoverable session fault, idling until next inform");
                entry.handler.recover();
                Err(e)
            }
            Err(e) => {
                drop(entry);
                self.handlers.remove(serial);
                Err(e)
            }
        }
    }

    /// Runs `f` against the handler for `serial` under its per-serial lock.
    /// Used by the control-RPC surface to mutate `desired_cfg` or force a
    /// manual-branch transition without touching the session loop directly.
    pub fn control<F, R>(&self, serial: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut DeviceHandler) -> Result<R>,
    {
        let mut entry = self
            .handlers
            .get_mut(serial)
            .ok_or_else(|| Error::UnknownSerial(serial.to_string()))?;
        f(&mut entry.handler)
    }

    pub fn state_of(&self, serial: &str) -> Option<StateLabel> {
        self.handlers.get(serial).map(|h| h.handler.state())
    }

    pub fn serials(&self) -> Vec<String> {
        self.handlers.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{DeviceIdStruct, EventStruct, EVENT_BOOTSTRAP};

    fn config() -> AcsConfig {
        AcsConfig::default_config()
    }

    fn inform(oui: &str, hw: &str, sw: &str, serial: &str) -> InboundMessage {
        InboundMessage::Inform {
            device_id: DeviceIdStruct {
                manufacturer: "Baicells".to_string(),
                oui: oui.to_string(),
                product_class: "FAP".to_string(),
                serial_number: serial.to_string(),
            },
            events: vec![EventStruct::new(EVENT_BOOTSTRAP)],
            parameters: vec![
                ParameterValueStruct { name: "Device.DeviceInfo.HardwareVersion".to_string(), value: hw.to_string() },
                ParameterValueStruct { name: "Device.DeviceInfo.SoftwareVersion".to_string(), value: sw.to_string() },
            ],
        }
    }

    #[tokio::test]
    async fn unknown_triple_is_rejected_without_creating_a_handler() {
        let manager = StateMachineManager::new(config(), None);
        let result = manager.dispatch("serial-1", inform("FFFFFF", "X", "Y", "serial-1")).await;
        assert!(result.is_err());
        assert_eq!(manager.len(), 0);
    }

    #[tokio::test]
    async fn known_triple_creates_and_advances_a_handler() {
        let manager = StateMachineManager::new(config(), None);
        let out = manager
            .dispatch("serial-1", inform("34ED0B", "A01", "BaiBS_QRTB_2.6.4", "serial-1"))
            .await
            .unwrap();
        assert_eq!(out, OutboundMessage::DummyInput);
        assert_eq!(manager.state_of("serial-1"), Some(StateLabel::WaitEmpty));
    }

    #[tokio::test]
    async fn control_path_forces_reboot_branch() {
        let manager = StateMachineManager::new(config(), None);
        manager
            .dispatch("serial-1", inform("48BF74", "A01", "BaiBS_RTS_3.1.6", "serial-1"))
            .await
            .unwrap();
        manager.control("serial-1", |h| { h.reboot_asap(); Ok(()) }).unwrap();
        assert_eq!(manager.state_of("serial-1"), Some(StateLabel::Reboot));
    }
}
