//! Per-device session state machine: one `DeviceHandler` per connected
//! eNodeB, driving a single TR-069 round trip to completion at a time.
//!
//! Grounded on `state_machines/enb_acs_impl.py` (`BasicEnodebAcsStateMachine`)
//! and `state_machines/enb_acs_states.py`.

pub mod states;
pub mod timer;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::SasConfig;
use crate::config_store::{EnodebConfiguration, ObjectId};
use crate::data_model::{DataModel, ParameterName, TrValue};
use crate::diff;
use crate::dp_client::{self, DomainProxyClient};
use crate::error::{Error, Result};
use crate::messages::{
    EventStruct, InboundMessage, OutboundMessage, ParameterValueStruct, EVENT_BOOT, EVENT_TRANSFER_COMPLETE,
};
use states::{transient_param_names, InvasiveApplyPolicy, StateLabel};
use timer::StateMachineTimer;

pub struct DeviceHandler {
    pub serial: String,
    model: Arc<DataModel>,
    policy: InvasiveApplyPolicy,
    dp_client: Option<Arc<dyn DomainProxyClient>>,
    sas: SasConfig,

    device_cfg: EnodebConfiguration,
    desired_cfg: EnodebConfiguration,
    state: StateLabel,

    request_all_params: bool,
    pending_set: Vec<(ParameterName, ObjectId, TrValue)>,
    pending_deletes: Vec<ParameterName>,
    pending_adds: Vec<ParameterName>,
    adding: Option<ParameterName>,
    reboot_timer: Option<StateMachineTimer>,
}

impl DeviceHandler {
    pub fn new(
        serial: impl Into<String>,
        model: Arc<DataModel>,
        desired_cfg: EnodebConfiguration,
        policy: InvasiveApplyPolicy,
        dp_client: Option<Arc<dyn DomainProxyClient>>,
        sas: SasConfig,
    ) -> Self {
        Self {
            serial: serial.into(),
            model,
            policy,
            dp_client,
            sas,
            device_cfg: EnodebConfiguration::new(),
            desired_cfg,
            state: StateLabel::WaitInform,
            request_all_params: false,
            pending_set: Vec::new(),
            pending_deletes: Vec::new(),
            pending_adds: Vec::new(),
            adding: None,
            reboot_timer: None,
        }
    }

    pub fn state(&self) -> StateLabel {
        self.state
    }

    pub fn desired_cfg(&self) -> &EnodebConfiguration {
        &self.desired_cfg
    }

    pub fn device_cfg(&self) -> &EnodebConfiguration {
        &self.device_cfg
    }

    pub fn model(&self) -> &DataModel {
        &self.model
    }

    // -- control-RPC entry points, callable from outside the session loop --

    pub fn reboot_asap(&mut self) {
        self.state = StateLabel::Reboot;
    }

    pub fn factory_reset_asap(&mut self) {
        self.state = StateLabel::FactoryReset;
    }

    pub fn download_asap(&mut self, url: String, user: String, password: String, filename: String, filesize: u64, md5: String) {
        self.desired_cfg.set_parameter(ParameterName::DownloadUrl, TrValue::Str(url), None);
        self.desired_cfg.set_parameter(ParameterName::DownloadUser, TrValue::Str(user), None);
        self.desired_cfg.set_parameter(ParameterName::DownloadPassword, TrValue::Str(password), None);
        self.desired_cfg.set_parameter(ParameterName::DownloadFilename, TrValue::Str(filename), None);
        self.desired_cfg.set_parameter(ParameterName::DownloadFilesize, TrValue::Int(filesize as i64), None);
        self.desired_cfg.set_parameter(ParameterName::DownloadMd5, TrValue::Str(md5), None);
        self.state = StateLabel::Download;
    }

    pub fn set_parameter_asap(&mut self, name: ParameterName, value: TrValue) -> Result<()> {
        if self.model.get(name).is_none() {
            return Err(Error::configuration_error(format!("unknown parameter {name:?} for model {}", self.model.name)));
        }
        self.desired_cfg.set_parameter(name, value, None);
        Ok(())
    }

    /// Drops any in-flight diff bookkeeping and idles the handler until the
    /// next Inform. Called by the registry after a non-fatal error leaves
    /// the session in an indeterminate spot mid-round-trip.
    pub fn recover(&mut self) {
        self.state = StateLabel::WaitInform;
        self.request_all_params = false;
        self.pending_set.clear();
        self.pending_deletes.clear();
        self.pending_adds.clear();
        self.adding = None;
        self.reboot_timer = None;
    }

    /// Advances the handler by exactly one TR-069 message, producing the
    /// outbound envelope to send back. Not re-entrant: callers must
    /// serialize calls per handler (see the registry's per-serial locking).
    pub async fn step(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match self.state {
            StateLabel::WaitInform => self.on_wait_inform(msg),
            StateLabel::WaitEmpty => self.on_wait_empty(msg),
            StateLabel::GetTransientParams => self.on_get_transient_params(msg),
            StateLabel::WaitGetTransientParams => self.on_wait_get_transient_params(msg),
            StateLabel::GetParams => self.on_get_params(msg),
            StateLabel::WaitGetParams => self.on_wait_get_params(msg),
            StateLabel::GetObjParams => self.on_get_obj_params(msg),
            StateLabel::WaitGetObjParams => self.on_wait_get_obj_params(msg),
            StateLabel::DeleteObjs => self.on_delete_objs(msg),
            StateLabel::WaitDeleteObjs => self.on_wait_delete_objs(msg),
            StateLabel::AddObjs => self.on_add_objs(msg),
            StateLabel::WaitAddObjs => self.on_wait_add_objs(msg),
            StateLabel::SetParams => self.on_set_params(msg),
            StateLabel::WaitSetParams => self.on_wait_set_params(msg),
            StateLabel::CheckGetParams => self.on_check_get_params(msg),
            StateLabel::CheckWaitGetParams => self.on_check_wait_get_params(msg),
            StateLabel::EndSession => self.on_end_session(msg),
            StateLabel::NotifyDp => self.on_notify_dp().await,
            StateLabel::Reboot => self.on_reboot(msg),
            StateLabel::WaitReboot => self.on_wait_reboot(msg),
            StateLabel::WaitPostRebootInform => self.on_wait_post_reboot_inform(msg),
            StateLabel::WaitQueuedEventsPostReboot => self.on_wait_queued_events_post_reboot(msg),
            StateLabel::WaitInformPostReboot => self.on_wait_inform_post_reboot(msg),
            StateLabel::WaitEmptyPostReboot => self.on_wait_empty_post_reboot(msg),
            StateLabel::Download => self.on_download(msg),
            StateLabel::WaitDownload => self.on_wait_download(msg),
            StateLabel::WaitInformPostDownload => self.on_wait_inform_post_download(msg),
            StateLabel::WaitEmptyPostDownload => self.on_wait_empty_post_download(msg),
            StateLabel::FactoryReset => self.on_factory_reset(msg),
            StateLabel::WaitFactoryReset => self.on_wait_factory_reset(msg),
            StateLabel::UnexpectedFault => self.on_unexpected_fault(msg),
        }
    }

    fn fault(&mut self, detail: impl Into<String>) -> Result<OutboundMessage> {
        warn!(serial = %self.serial, detail = %detail.into(), "unexpected message, entering unexpected_fault");
        self.state = StateLabel::UnexpectedFault;
        Ok(OutboundMessage::DummyInput)
    }

    fn on_wait_inform(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::Inform { events, .. } => {
                self.request_all_params = states::inform_has_event(&events, crate::messages::EVENT_BOOTSTRAP)
                    || states::inform_has_event(&events, crate::messages::EVENT_BOOT);
                self.state = StateLabel::WaitEmpty;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected Inform"),
        }
    }

    fn on_wait_empty(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::DummyInput => {
                self.state = StateLabel::GetTransientParams;
                self.emit_get_transient_params()
            }
            _ => self.fault("expected empty envelope"),
        }
    }

    fn on_get_transient_params(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        self.emit_get_transient_params()
    }

    fn emit_get_transient_params(&mut self) -> Result<OutboundMessage> {
        let paths: Vec<String> = transient_param_names()
            .iter()
            .filter_map(|n| self.model.resolve_path(*n).map(str::to_string))
            .collect();
        self.state = StateLabel::WaitGetTransientParams;
        Ok(OutboundMessage::GetParameterValues(paths))
    }

    fn ingest_values(&mut self, values: &[ParameterValueStruct]) {
        for pv in values {
            let Some(name) = self.model.get_parameter_name_from_path(&pv.name) else {
                continue;
            };
            let Some(param) = self.model.get(name) else { continue };
            let raw = match param.param_type {
                crate::data_model::TrParameterType::Boolean => TrValue::Bool(pv.value == "1" || pv.value.eq_ignore_ascii_case("true")),
                crate::data_model::TrParameterType::Int | crate::data_model::TrParameterType::UnsignedInt => {
                    TrValue::Int(pv.value.parse().unwrap_or_default())
                }
                _ => TrValue::Str(pv.value.clone()),
            };
            let canonical = self.model.transform_for_magma(name, &raw);
            self.device_cfg.set_parameter(name, canonical, None);
        }
    }

    fn on_wait_get_transient_params(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::GetParameterValuesResponse(values) => {
                self.ingest_values(&values);
                self.branch_from_hub()
            }
            _ => self.fault("expected GetParameterValuesResponse"),
        }
    }

    /// Implements the `wait_get_transient_params` branching hub.
    fn branch_from_hub(&mut self) -> Result<OutboundMessage> {
        let missing = diff::params_to_get(&self.model, &self.device_cfg, self.request_all_params);
        if !missing.is_empty() {
            self.state = StateLabel::GetParams;
            return self.on_get_params(InboundMessage::DummyInput);
        }
        if !self.model.numbered_param_names.is_empty() {
            self.state = StateLabel::GetObjParams;
            return self.on_get_obj_params(InboundMessage::DummyInput);
        }
        self.branch_from_diff()
    }

    fn branch_from_diff(&mut self) -> Result<OutboundMessage> {
        let to_delete = diff::objects_to_delete(&self.model, &self.desired_cfg, &self.device_cfg);
        if !to_delete.is_empty() {
            self.pending_deletes = to_delete;
            self.state = StateLabel::DeleteObjs;
            return self.on_delete_objs(InboundMessage::DummyInput);
        }
        let to_add = diff::objects_to_add(&self.desired_cfg, &self.device_cfg);
        if !to_add.is_empty() {
            self.pending_adds = to_add;
            self.state = StateLabel::AddObjs;
            return self.on_add_objs(InboundMessage::DummyInput);
        }
        let to_set = diff::values_to_set(&self.model, &self.desired_cfg, &self.device_cfg);
        if !to_set.is_empty() {
            self.pending_set = to_set;
            self.state = StateLabel::SetParams;
            return self.on_set_params(InboundMessage::DummyInput);
        }
        self.state = StateLabel::EndSession;
        self.on_end_session(InboundMessage::DummyInput)
    }

    fn on_get_params(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let names = diff::params_to_get(&self.model, &self.device_cfg, self.request_all_params);
        let paths: Vec<String> = names.iter().filter_map(|n| self.model.resolve_path(*n).map(str::to_string)).collect();
        self.state = StateLabel::WaitGetParams;
        Ok(OutboundMessage::GetParameterValues(paths))
    }

    fn on_wait_get_params(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::GetParameterValuesResponse(values) => {
                self.ingest_values(&values);
                self.state = StateLabel::GetObjParams;
                self.on_get_obj_params(InboundMessage::DummyInput)
            }
            _ => self.fault("expected GetParameterValuesResponse"),
        }
    }

    fn on_get_obj_params(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let names = diff::object_params_to_get(&self.model, &mut self.device_cfg, self.request_all_params);
        let paths: Vec<String> = names.iter().filter_map(|n| self.model.resolve_path(*n).map(str::to_string)).collect();
        self.state = StateLabel::WaitGetObjParams;
        Ok(OutboundMessage::GetParameterValues(paths))
    }

    /// Re-counts each indexed family by probing for its primary child path
    /// and overwrites a misreported `NUM_*` parameter.
    fn reconcile_object_count(&mut self, root_of: impl Fn(u8) -> ParameterName, primary_child_of: impl Fn(u8) -> ParameterName, num_param: ParameterName) {
        let mut actual = 0u8;
        loop {
            let candidate = actual + 1;
            let root = root_of(candidate);
            if self.model.get(root).is_none() {
                break;
            }
            let child = primary_child_of(candidate);
            if !self.device_cfg.has_parameter(child, Some(root)) {
                break;
            }
            actual = candidate;
        }
        let reported = self.device_cfg.get_parameter(num_param, None).and_then(TrValue::as_int).unwrap_or(-1);
        if reported != actual as i64 {
            warn!(serial = %self.serial, reported, actual, "device misreported object count, correcting");
            self.device_cfg.set_parameter(num_param, TrValue::Int(actual as i64), None);
        }
    }

    fn on_wait_get_obj_params(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::GetParameterValuesResponse(values) => {
                self.ingest_values(&values);
                self.reconcile_object_count(ParameterName::PlmnN, ParameterName::PlmnNCellReserved, ParameterName::NumPlmns);
                self.reconcile_object_count(ParameterName::NeighborFreqListN, ParameterName::NeighborFreqListNEarfcn, ParameterName::NumLteNeighborFreq);
                self.reconcile_object_count(ParameterName::NeighborCellListN, ParameterName::NeighborCellListNCid, ParameterName::NumLteNeighborCell);
                self.branch_from_diff()
            }
            _ => self.fault("expected GetParameterValuesResponse"),
        }
    }

    fn on_delete_objs(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let Some(obj) = self.pending_deletes.first().copied() else {
            return self.branch_from_diff();
        };
        let Some(path) = self.model.resolve_path(obj) else {
            self.pending_deletes.remove(0);
            return self.on_delete_objs(InboundMessage::DummyInput);
        };
        self.state = StateLabel::WaitDeleteObjs;
        Ok(OutboundMessage::DeleteObject(path.to_string()))
    }

    fn on_wait_delete_objs(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::DeleteObjectResponse { status } => {
                if status != 0 {
                    return Err(Error::protocol_fault(&self.serial, format!("DeleteObject returned status {status}")));
                }
                if let Some(obj) = self.pending_deletes.first().copied() {
                    self.device_cfg.delete_object(obj);
                    self.pending_deletes.remove(0);
                }
                self.on_delete_objs(InboundMessage::DummyInput)
            }
            InboundMessage::Fault { code, detail } => Err(Error::protocol_fault(&self.serial, format!("{code:?}: {detail}"))),
            _ => self.fault("expected DeleteObjectResponse"),
        }
    }

    fn on_add_objs(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let Some(obj) = self.pending_adds.first().copied() else {
            return self.branch_from_diff();
        };
        let Some(path) = self.model.resolve_path(obj) else {
            self.pending_adds.remove(0);
            return self.on_add_objs(InboundMessage::DummyInput);
        };
        let parent = truncate_instance_segment(path);
        self.adding = Some(obj);
        self.state = StateLabel::WaitAddObjs;
        Ok(OutboundMessage::AddObject(parent))
    }

    fn on_wait_add_objs(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::AddObjectResponse { status, instance_number } => {
                if status != 0 {
                    return Err(Error::protocol_fault(&self.serial, format!("AddObject returned status {status}")));
                }
                if let Some(template) = self.adding.take() {
                    let actual = template.renumbered(instance_number as u8);
                    self.device_cfg.add_object(actual);
                    self.pending_adds.retain(|p| *p != template);
                }
                self.on_add_objs(InboundMessage::DummyInput)
            }
            InboundMessage::Fault { code, detail } => Err(Error::protocol_fault(&self.serial, format!("{code:?}: {detail}"))),
            _ => self.fault("expected AddObjectResponse"),
        }
    }

    fn on_set_params(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let values: Vec<ParameterValueStruct> = self
            .pending_set
            .iter()
            .filter_map(|(name, _, value)| {
                self.model.resolve_path(*name).map(|path| ParameterValueStruct {
                    name: path.to_string(),
                    value: value.to_string(),
                })
            })
            .collect();
        self.state = StateLabel::WaitSetParams;
        Ok(OutboundMessage::SetParameterValues(values))
    }

    fn on_wait_set_params(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::SetParameterValuesResponse { status } => {
                if status != 0 {
                    return Err(Error::protocol_fault(&self.serial, format!("SetParameterValues returned status {status}")));
                }
                let applied = std::mem::take(&mut self.pending_set);
                let has_invasive = applied.iter().any(|(name, _, _)| {
                    self.model.get(*name).map(|p| p.is_invasive).unwrap_or(false)
                });
                for (name, obj, value) in applied {
                    self.device_cfg.set_parameter(name, value, obj);
                }
                if has_invasive && self.policy == InvasiveApplyPolicy::ApplyViaReboot {
                    self.state = StateLabel::Reboot;
                    self.on_reboot(InboundMessage::DummyInput)
                } else {
                    self.state = StateLabel::CheckGetParams;
                    self.on_check_get_params(InboundMessage::DummyInput)
                }
            }
            InboundMessage::Fault { code, detail } => Err(Error::protocol_fault(&self.serial, format!("{code:?}: {detail}"))),
            _ => self.fault("expected SetParameterValuesResponse"),
        }
    }

    fn on_check_get_params(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        self.state = StateLabel::CheckWaitGetParams;
        Ok(OutboundMessage::DummyInput)
    }

    fn on_check_wait_get_params(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        self.state = StateLabel::EndSession;
        self.on_end_session(InboundMessage::DummyInput)
    }

    fn on_end_session(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        self.state = if self.dp_client.is_some() { StateLabel::NotifyDp } else { StateLabel::WaitInform };
        Ok(OutboundMessage::DummyInput)
    }

    async fn on_notify_dp(&mut self) -> Result<OutboundMessage> {
        if let Some(client) = self.dp_client.clone() {
            match client.fetch_cbsd_state(&self.serial).await {
                Ok(cbsd_state) => {
                    if let Err(e) = dp_client::update_desired_config_from_cbsd_state(&cbsd_state, &mut self.desired_cfg, &self.sas) {
                        warn!(serial = %self.serial, error = %e, "domain proxy state rejected");
                    }
                }
                Err(e) => warn!(serial = %self.serial, error = %e, "domain proxy unreachable, keeping previous desired config"),
            }
        }
        self.state = StateLabel::WaitInform;
        Ok(OutboundMessage::DummyInput)
    }

    fn on_reboot(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        self.state = StateLabel::WaitReboot;
        Ok(OutboundMessage::Reboot)
    }

    fn on_wait_reboot(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::RebootResponse => {
                self.state = StateLabel::WaitPostRebootInform;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected RebootResponse"),
        }
    }

    fn on_wait_post_reboot_inform(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::Inform { events, .. } if states::inform_has_event(&events, EVENT_BOOT) => {
                self.reboot_timer = Some(StateMachineTimer::new(Duration::from_secs(self.sas.post_reboot_holdoff_secs)));
                self.state = StateLabel::WaitQueuedEventsPostReboot;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected post-reboot Inform with BOOT event"),
        }
    }

    fn on_wait_queued_events_post_reboot(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let done = self.reboot_timer.map(|t| t.is_done()).unwrap_or(true);
        if done {
            self.reboot_timer = None;
            self.state = StateLabel::WaitInformPostReboot;
        }
        Ok(OutboundMessage::DummyInput)
    }

    fn on_wait_inform_post_reboot(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::Inform { .. } => {
                self.state = StateLabel::WaitEmptyPostReboot;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected Inform"),
        }
    }

    fn on_wait_empty_post_reboot(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::DummyInput => {
                self.state = StateLabel::GetTransientParams;
                self.emit_get_transient_params()
            }
            _ => self.fault("expected empty envelope"),
        }
    }

    fn on_download(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        let url = self.desired_cfg.get_parameter(ParameterName::DownloadUrl, None).and_then(TrValue::as_str).unwrap_or_default();
        let user = self.desired_cfg.get_parameter(ParameterName::DownloadUser, None).and_then(TrValue::as_str).unwrap_or_default();
        let password = self.desired_cfg.get_parameter(ParameterName::DownloadPassword, None).and_then(TrValue::as_str).unwrap_or_default();
        let target_file_name = self.desired_cfg.get_parameter(ParameterName::DownloadFilename, None).and_then(TrValue::as_str).unwrap_or_default();
        let file_size = self.desired_cfg.get_parameter(ParameterName::DownloadFilesize, None).and_then(TrValue::as_int).unwrap_or(0) as u64;
        let md5 = self.desired_cfg.get_parameter(ParameterName::DownloadMd5, None).and_then(TrValue::as_str).unwrap_or_default();
        self.state = StateLabel::WaitDownload;
        Ok(OutboundMessage::Download { url, user_name: user, password, file_type: "1 Firmware Upgrade Image".to_string(), file_size, target_file_name, md5 })
    }

    fn on_wait_download(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::DownloadResponse => {
                self.state = StateLabel::WaitInformPostDownload;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected DownloadResponse"),
        }
    }

    fn on_wait_inform_post_download(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::Inform { events, .. } => {
                if !states::inform_has_event(&events, EVENT_TRANSFER_COMPLETE) {
                    warn!(serial = %self.serial, "post-download Inform missing TRANSFER COMPLETE event");
                }
                self.state = StateLabel::WaitEmptyPostDownload;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected post-download Inform"),
        }
    }

    fn on_wait_empty_post_download(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::DummyInput => {
                self.state = StateLabel::GetTransientParams;
                self.emit_get_transient_params()
            }
            _ => self.fault("expected empty envelope"),
        }
    }

    fn on_factory_reset(&mut self, _msg: InboundMessage) -> Result<OutboundMessage> {
        self.state = StateLabel::WaitFactoryReset;
        Ok(OutboundMessage::FactoryReset)
    }

    fn on_wait_factory_reset(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::FactoryResetResponse => {
                self.state = StateLabel::WaitInform;
                Ok(OutboundMessage::DummyInput)
            }
            _ => self.fault("expected FactoryResetResponse"),
        }
    }

    fn on_unexpected_fault(&mut self, msg: InboundMessage) -> Result<OutboundMessage> {
        match msg {
            InboundMessage::Inform { .. } => {
                info!(serial = %self.serial, "recovered from unexpected_fault on new Inform");
                self.state = StateLabel::WaitEmpty;
                Ok(OutboundMessage::DummyInput)
            }
            _ => Ok(OutboundMessage::DummyInput),
        }
    }
}

/// Strips the trailing instance-number segment from an object template
/// path, e.g. `"...PLMNList.3."` -> `"...PLMNList."`, as AddObject is
/// always issued against the parent collection.
fn truncate_instance_segment(path: &str) -> String {
    let mut parts: Vec<&str> = path.split('.').collect();
    if parts.len() >= 2 {
        let idx = parts.len() - 2;
        parts.remove(idx);
    }
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::qafa;

    fn handler() -> DeviceHandler {
        let model = Arc::new(qafa::data_model());
        let mut desired = EnodebConfiguration::new();
        desired.set_parameter(ParameterName::SwVersion, TrValue::Str("1.0".into()), None);
        DeviceHandler::new("SN1", model, desired, InvasiveApplyPolicy::ApplyInPlace, None, SasConfig::default())
    }

    #[tokio::test]
    async fn wait_inform_transitions_to_wait_empty() {
        let mut h = handler();
        let out = h.step(InboundMessage::Inform {
            device_id: Default::default(),
            events: vec![EventStruct::new(crate::messages::EVENT_PERIODIC)],
            parameters: vec![],
        }).await.unwrap();
        assert_eq!(out, OutboundMessage::DummyInput);
        assert_eq!(h.state(), StateLabel::WaitEmpty);
    }

    #[tokio::test]
    async fn unexpected_message_enters_fault_state() {
        let mut h = handler();
        let _ = h.step(InboundMessage::DummyInput).await.unwrap();
        assert_eq!(h.state(), StateLabel::UnexpectedFault);
    }

    #[tokio::test]
    async fn reboot_asap_forces_manual_branch() {
        let mut h = handler();
        h.reboot_asap();
        assert_eq!(h.state(), StateLabel::Reboot);
        let out = h.step(InboundMessage::DummyInput).await.unwrap();
        assert_eq!(out, OutboundMessage::Reboot);
        assert_eq!(h.state(), StateLabel::WaitReboot);
    }

    #[test]
    fn set_parameter_asap_rejects_unknown_parameter() {
        let mut h = handler();
        let err = h.set_parameter_asap(ParameterName::SasEnabled, TrValue::Int(1)).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}
