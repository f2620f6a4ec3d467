//! Data model for Baicells QAFA/QAFB eNodeBs (TR-098 rooted under
//! `InternetGatewayDevice.`), apply-in-place invasive-change policy.
//!
//! Grounded on `devices/baicells_qafa.py` (`BaicellsQAFATrDataModel`,
//! `BaicellsQAFATrConfigurationInitializer`).

use std::collections::HashMap;

use crate::data_model::parameter::{ParamPath, ParameterName, TrParam, TrParameterType};
use crate::data_model::transforms;
use crate::data_model::DataModel;

const DEVICE_PATH: &str = "InternetGatewayDevice.";

fn fap_service_path() -> String {
    format!("{DEVICE_PATH}Services.FAPService.1.")
}

pub const NUM_PLMNS_IN_CONFIG: u8 = 6;

pub fn data_model() -> DataModel {
    let fap = fap_service_path();
    let eeprom = "boardconf.status.eepromInfo.";
    let mut parameters = HashMap::new();

    parameters.insert(
        ParameterName::Device,
        TrParam::new(DEVICE_PATH, true, TrParameterType::Object, false),
    );
    parameters.insert(
        ParameterName::FapService,
        TrParam::new(&fap, true, TrParameterType::Object, false),
    );
    parameters.insert(
        ParameterName::MmeStatus,
        TrParam::new(format!("{fap}FAPControl.LTE.OpState"), true, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::GpsLat,
        TrParam::new(format!("{DEVICE_PATH}FAP.GPS.latitude"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::GpsLong,
        TrParam::new(format!("{DEVICE_PATH}FAP.GPS.longitude"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::SwVersion,
        TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SoftwareVersion"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::SerialNumber,
        TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SerialNumber"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::DuplexModeCapability,
        TrParam::new(format!("{eeprom}div_multiple"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::BandCapability,
        TrParam::new(format!("{eeprom}work_mode"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::Earfcndl,
        TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.EARFCNDL"), true, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::Pci,
        TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.PhyCellID"), true, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::DlBandwidth,
        TrParam::new(format!("{DEVICE_PATH}Services.RfConfig.1.RfCarrierCommon.carrierBwMhz"), true, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::SubframeAssignment,
        TrParam::new(format!("{fap}CellConfig.LTE.RAN.PHY.TDDFrame.SubFrameAssignment"), true, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::SpecialSubframePattern,
        TrParam::new(format!("{fap}CellConfig.LTE.RAN.PHY.TDDFrame.SpecialSubframePatterns"), true, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::CellId,
        TrParam::new(format!("{fap}CellConfig.LTE.RAN.Common.CellIdentity"), true, TrParameterType::UnsignedInt, false),
    );
    parameters.insert(
        ParameterName::AdminState,
        TrParam::new(format!("{fap}FAPControl.LTE.AdminState"), false, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::OpState,
        TrParam::new(format!("{fap}FAPControl.LTE.OpState"), true, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::RfTxStatus,
        TrParam::new(format!("{fap}FAPControl.LTE.OpState"), true, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::MmeIp,
        TrParam::new(format!("{fap}FAPControl.LTE.Gateway.S1SigLinkServerList"), true, TrParameterType::String, false),
    );
    parameters.insert(
        ParameterName::MmePort,
        TrParam::new(format!("{fap}FAPControl.LTE.Gateway.S1SigLinkPort"), true, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::Tac,
        TrParam::new(format!("{fap}CellConfig.LTE.EPC.TAC"), true, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::IpSecEnable,
        TrParam::new("boardconf.ipsec.ipsecConfig.onBoot", false, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::PeriodicInformEnable,
        TrParam::new(format!("{DEVICE_PATH}ManagementServer.PeriodicInformEnable"), false, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::PeriodicInformInterval,
        TrParam::new(format!("{DEVICE_PATH}ManagementServer.PeriodicInformInterval"), false, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::PerfMgmtEnable,
        TrParam::new(format!("{DEVICE_PATH}FAP.PerfMgmt.Config.Enable"), false, TrParameterType::Boolean, false),
    );
    parameters.insert(
        ParameterName::PerfMgmtUploadInterval,
        TrParam::new(format!("{DEVICE_PATH}FAP.PerfMgmt.Config.PeriodicUploadInterval"), false, TrParameterType::Int, false),
    );
    parameters.insert(
        ParameterName::PerfMgmtUploadUrl,
        TrParam::new(format!("{DEVICE_PATH}FAP.PerfMgmt.Config.URL"), false, TrParameterType::String, false),
    );

    for synthetic in [
        (ParameterName::DownloadUrl, TrParameterType::String),
        (ParameterName::DownloadUser, TrParameterType::String),
        (ParameterName::DownloadPassword, TrParameterType::String),
        (ParameterName::DownloadFilename, TrParameterType::String),
        (ParameterName::DownloadFilesize, TrParameterType::UnsignedInt),
        (ParameterName::DownloadMd5, TrParameterType::String),
    ] {
        parameters.insert(synthetic.0, TrParam::synthetic(synthetic.1));
    }

    let mut numbered_param_names = HashMap::new();
    let mut transforms_for_enb: HashMap<ParameterName, transforms::Transform> = HashMap::new();
    for i in 1..=NUM_PLMNS_IN_CONFIG {
        parameters.insert(
            ParameterName::PlmnN(i),
            TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}."), true, TrParameterType::String, false),
        );
        parameters.insert(
            ParameterName::PlmnNCellReserved(i),
            TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.CellReservedForOperatorUse"), true, TrParameterType::String, false),
        );
        transforms_for_enb.insert(ParameterName::PlmnNCellReserved(i), transforms::cell_reserved_for_enb);
        parameters.insert(
            ParameterName::PlmnNEnable(i),
            TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.Enable"), true, TrParameterType::Boolean, false),
        );
        parameters.insert(
            ParameterName::PlmnNPrimary(i),
            TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.IsPrimary"), true, TrParameterType::Boolean, false),
        );
        parameters.insert(
            ParameterName::PlmnNPlmnid(i),
            TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.PLMNID"), true, TrParameterType::String, false),
        );
        numbered_param_names.insert(
            ParameterName::PlmnN(i),
            vec![
                ParameterName::PlmnNCellReserved(i),
                ParameterName::PlmnNEnable(i),
                ParameterName::PlmnNPrimary(i),
                ParameterName::PlmnNPlmnid(i),
            ],
        );
    }

    transforms_for_enb.insert(ParameterName::AdminState, transforms::admin_state_for_enb);

    let mut transforms_for_magma: HashMap<ParameterName, transforms::Transform> = HashMap::new();
    transforms_for_magma.insert(ParameterName::BandCapability, transforms::band_capability_for_magma);
    transforms_for_magma.insert(ParameterName::DuplexModeCapability, transforms::duplex_mode_for_magma);

    DataModel {
        name: "baicells_qafa",
        parameters,
        numbered_param_names,
        load_parameters: vec![ParameterName::Device],
        num_plmns: NUM_PLMNS_IN_CONFIG,
        num_neighbor_cell: 0,
        num_neighbor_freq: 0,
        transforms_for_enb,
        transforms_for_magma,
    }
}

/// Apply operator/mconfig-derived overrides after projection into
/// `desired_cfg`. QAFA devices apply `AdminState` locally and need a fixed
/// performance-upload cadence.
pub fn postprocess(desired_cfg: &mut crate::config_store::EnodebConfiguration) {
    desired_cfg.delete_parameter(ParameterName::AdminState, None);
    desired_cfg.set_parameter(ParameterName::PerfMgmtUploadInterval, crate::data_model::value::TrValue::Int(900), None);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_path_uses_fap_gps_variant() {
        let dm = data_model();
        assert_eq!(
            dm.resolve_path(ParameterName::GpsLat),
            Some("InternetGatewayDevice.FAP.GPS.latitude")
        );
    }

    #[test]
    fn download_params_are_synthetic() {
        let dm = data_model();
        assert_eq!(dm.get(ParameterName::DownloadUrl).unwrap().path, ParamPath::Invalid);
    }

    #[test]
    fn plmn_family_has_six_instances() {
        let dm = data_model();
        for i in 1..=NUM_PLMNS_IN_CONFIG {
            assert!(dm.get(ParameterName::PlmnN(i)).is_some());
        }
        assert!(dm.get(ParameterName::PlmnN(NUM_PLMNS_IN_CONFIG + 1)).is_none());
    }
}
