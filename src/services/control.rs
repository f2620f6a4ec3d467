//! Control-RPC surface: the out-of-band entry points an operator tool uses
//! to inspect or force actions on a connected eNodeB, independent of the
//! TR-069 session loop.
//!
//! Grounded on `rpc_servicer.py` (`EnodebdRpcServicer`).

use crate::core::registry::StateMachineManager;
use crate::data_model::{ParameterName, TrValue};
use crate::error::{Error, Result};
use crate::session::states::StateLabel;

/// Snapshot of one device's provisioning status, assembled from its
/// `DeviceHandler`'s reported configuration and current state label.
/// `ip_address`/`connected` reflect transport-layer facts this crate does
/// not track on its own and are left for the transport integration to fill
/// in.
#[derive(Debug, Clone, PartialEq)]
pub struct EnodebStatus {
    pub device_serial: String,
    pub ip_address: Option<String>,
    pub connected: bool,
    pub configured: bool,
    pub opstate_enabled: bool,
    pub rf_tx_on: bool,
    pub rf_tx_desired: bool,
    pub gps_connected: bool,
    pub ptp_connected: bool,
    pub mme_connected: bool,
    pub gps_longitude: Option<i64>,
    pub gps_latitude: Option<i64>,
    pub fsm_state: StateLabel,
}

fn bool_param(device_cfg: &crate::config_store::EnodebConfiguration, name: ParameterName) -> bool {
    matches!(device_cfg.get_parameter(name, None), Some(TrValue::Bool(true)))
}

fn int_param(device_cfg: &crate::config_store::EnodebConfiguration, name: ParameterName) -> Option<i64> {
    match device_cfg.get_parameter(name, None) {
        Some(TrValue::Int(v)) => Some(*v),
        _ => None,
    }
}

/// Adapter wrapping a [`StateMachineManager`] with the gRPC-shaped control
/// methods from the original RPC servicer, minus the transport framing.
pub struct ControlService<'a> {
    manager: &'a StateMachineManager,
}

impl<'a> ControlService<'a> {
    pub fn new(manager: &'a StateMachineManager) -> Self {
        Self { manager }
    }

    /// Reads a single reported parameter by its wire path. Intended for
    /// diagnostics, not the provisioning hot path.
    pub fn get_parameter(&self, serial: &str, parameter_path: &str) -> Result<String> {
        self.manager.control(serial, |handler| {
            let data_model = handler.model();
            let name = data_model
                .get_parameter_name_from_path(parameter_path)
                .ok_or_else(|| Error::configuration_error(format!("unknown parameter path {parameter_path}")))?;
            handler
                .device_cfg()
                .get_parameter(name, None)
                .map(|v| v.to_string())
                .ok_or_else(|| Error::configuration_error(format!("no reported value for {parameter_path}")))
        })
    }

    pub fn set_parameter(&self, serial: &str, parameter_path: &str, value: TrValue) -> Result<()> {
        self.manager.control(serial, |handler| {
            let name = handler
                .model()
                .get_parameter_name_from_path(parameter_path)
                .ok_or_else(|| Error::configuration_error(format!("unknown parameter path {parameter_path}")))?;
            handler.set_parameter_asap(name, value)
        })
    }

    pub fn reboot(&self, serial: &str) -> Result<()> {
        self.manager.control(serial, |handler| {
            handler.reboot_asap();
            Ok(())
        })
    }

    pub fn reboot_all(&self) {
        for serial in self.manager.serials() {
            let _ = self.manager.control(&serial, |handler| {
                handler.reboot_asap();
                Ok(())
            });
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn download(&self, serial: &str, url: String, user_name: String, password: String, target_file_name: String, file_size: u64, md5: String) -> Result<()> {
        self.manager.control(serial, |handler| {
            handler.download_asap(url, user_name, password, target_file_name, file_size, md5);
            Ok(())
        })
    }

    pub fn get_status(&self) -> ServiceStatus {
        ServiceStatus {
            connected_enodebs: self.manager.len(),
        }
    }

    pub fn get_all_enodeb_status(&self) -> Vec<EnodebStatus> {
        self.manager
            .serials()
            .into_iter()
            .filter_map(|serial| self.get_enodeb_status(&serial).ok())
            .collect()
    }

    pub fn get_enodeb_status(&self, serial: &str) -> Result<EnodebStatus> {
        self.manager.control(serial, |handler| {
            let device_cfg = handler.device_cfg();
            Ok(EnodebStatus {
                device_serial: handler.serial.clone(),
                ip_address: None,
                connected: true,
                configured: handler.state() != StateLabel::WaitInform,
                opstate_enabled: bool_param(device_cfg, ParameterName::OpState),
                rf_tx_on: bool_param(device_cfg, ParameterName::RfTxStatus),
                rf_tx_desired: matches!(handler.desired_cfg().get_parameter(ParameterName::RfTxStatus, None), Some(TrValue::Bool(true))),
                gps_connected: bool_param(device_cfg, ParameterName::GpsConnected),
                ptp_connected: bool_param(device_cfg, ParameterName::PtpConnected),
                mme_connected: bool_param(device_cfg, ParameterName::MmeConnected),
                gps_longitude: int_param(device_cfg, ParameterName::GpsLong),
                gps_latitude: int_param(device_cfg, ParameterName::GpsLat),
                fsm_state: handler.state(),
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub connected_enodebs: usize,
}
