//! Data model for Baicells QRTB eNodeBs (rooted under `Device.`),
//! apply-via-reboot invasive-change policy, CBRS/SAS coupled.
//!
//! Grounded on `devices/baicells_qrtb.py` (`BaicellsQRTBTrDataModel`,
//! `BaicellsQRTBTrConfigurationInitializer`).

use std::collections::HashMap;

use crate::data_model::parameter::{ParameterName, TrParam, TrParameterType};
use crate::data_model::transforms;
use crate::data_model::DataModel;

const DEVICE_PATH: &str = "Device.";

fn fap_service_path() -> String {
    format!("{DEVICE_PATH}Services.FAPService.1.")
}

pub const NUM_PLMNS_IN_CONFIG: u8 = 6;
pub const NUM_NEIGHBOR_CELL_CONFIG: u8 = 16;
pub const NUM_NEIGHBOR_FREQ_CONFIG: u8 = 8;

pub fn data_model() -> DataModel {
    let fap = fap_service_path();
    let mut parameters = HashMap::new();

    parameters.insert(ParameterName::Device, TrParam::new(DEVICE_PATH, true, TrParameterType::Object, false));
    parameters.insert(ParameterName::FapService, TrParam::new(&fap, true, TrParameterType::Object, false));

    parameters.insert(ParameterName::GpsConnected, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.X_COM_GPS_Status"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::PtpConnected, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.X_COM_1588_Status"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::MmeConnected, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.X_COM_MME_Status"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::RemStatus, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.X_COM_REM_Status"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::GpsLat, TrParam::new(format!("{DEVICE_PATH}FAP.GPS.LockedLatitude"), true, TrParameterType::Int, false));
    parameters.insert(ParameterName::GpsLong, TrParam::new(format!("{DEVICE_PATH}FAP.GPS.LockedLongitude"), true, TrParameterType::Int, false));
    parameters.insert(ParameterName::SwVersion, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SoftwareVersion"), true, TrParameterType::String, false));
    parameters.insert(ParameterName::SerialNumber, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SerialNumber"), true, TrParameterType::String, false));
    parameters.insert(ParameterName::DuplexModeCapability, TrParam::new(format!("{fap}Capabilities.LTE.DuplexMode"), true, TrParameterType::String, false));
    parameters.insert(ParameterName::BandCapability, TrParam::new(format!("{fap}Capabilities.LTE.BandsSupported"), true, TrParameterType::String, false));

    parameters.insert(ParameterName::Earfcndl, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.EARFCNDL"), true, TrParameterType::UnsignedInt, false));
    parameters.insert(ParameterName::Earfcnul, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.EARFCNUL"), true, TrParameterType::UnsignedInt, false));
    parameters.insert(ParameterName::Band, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.FreqBandIndicator"), true, TrParameterType::UnsignedInt, false));
    parameters.insert(ParameterName::Pci, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.PhyCellID"), false, TrParameterType::String, false));
    parameters.insert(ParameterName::DlBandwidth, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.DLBandwidth"), true, TrParameterType::String, false));
    parameters.insert(ParameterName::UlBandwidth, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.ULBandwidth"), true, TrParameterType::String, false));
    parameters.insert(ParameterName::SasRadioEnable, TrParam::new(format!("{fap}CellConfig.LTE.RAN.RF.X_COM_RadioEnable"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::SubframeAssignment, TrParam::new(format!("{fap}CellConfig.LTE.RAN.PHY.TDDFrame.SubFrameAssignment"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::SpecialSubframePattern, TrParam::new(format!("{fap}CellConfig.LTE.RAN.PHY.TDDFrame.SpecialSubframePatterns"), true, TrParameterType::Int, false));
    parameters.insert(ParameterName::CellId, TrParam::new(format!("{fap}CellConfig.LTE.RAN.Common.CellIdentity"), true, TrParameterType::UnsignedInt, false));
    parameters.insert(ParameterName::PowerSpectralDensity, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.PowerSpectralDensity"), false, TrParameterType::UnsignedInt, false));

    parameters.insert(ParameterName::AdminState, TrParam::new(format!("{fap}FAPControl.LTE.AdminState"), false, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::OpState, TrParam::new(format!("{fap}FAPControl.LTE.OpState"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::RfTxStatus, TrParam::new(format!("{fap}FAPControl.LTE.RFTxStatus"), true, TrParameterType::Boolean, false));

    parameters.insert(ParameterName::MmeIp, TrParam::new(format!("{fap}FAPControl.LTE.Gateway.S1SigLinkServerList"), true, TrParameterType::String, false));
    parameters.insert(ParameterName::MmePort, TrParam::new(format!("{fap}FAPControl.LTE.Gateway.S1SigLinkPort"), true, TrParameterType::Int, false));
    parameters.insert(ParameterName::NumPlmns, TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNListNumberOfEntries"), true, TrParameterType::Int, false));
    parameters.insert(ParameterName::NumLteNeighborFreq, TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.CarrierNumberOfEntries"), false, TrParameterType::Int, false));
    parameters.insert(ParameterName::NumLteNeighborCell, TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECellNumberOfEntries"), false, TrParameterType::Int, false));
    parameters.insert(ParameterName::Tac, TrParam::new(format!("{fap}CellConfig.LTE.EPC.TAC"), true, TrParameterType::Int, false));
    parameters.insert(ParameterName::IpSecEnable, TrParam::new(format!("{DEVICE_PATH}Services.FAPService.Ipsec.IPSEC_ENABLE"), false, TrParameterType::Boolean, false));

    parameters.insert(ParameterName::PeriodicInformEnable, TrParam::new(format!("{DEVICE_PATH}ManagementServer.PeriodicInformEnable"), true, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::PeriodicInformInterval, TrParam::new(format!("{DEVICE_PATH}ManagementServer.PeriodicInformInterval"), true, TrParameterType::UnsignedInt, false));

    parameters.insert(ParameterName::PerfMgmtEnable, TrParam::new(format!("{DEVICE_PATH}FAP.PerfMgmt.Config.1.Enable"), false, TrParameterType::Boolean, false));
    parameters.insert(ParameterName::PerfMgmtUploadInterval, TrParam::new(format!("{DEVICE_PATH}FAP.PerfMgmt.Config.1.PeriodicUploadInterval"), false, TrParameterType::Int, false));
    parameters.insert(ParameterName::PerfMgmtUploadUrl, TrParam::new(format!("{DEVICE_PATH}FAP.PerfMgmt.Config.1.URL"), false, TrParameterType::String, false));

    parameters.insert(ParameterName::SasFccId, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SAS.FccId"), false, TrParameterType::String, false));
    parameters.insert(ParameterName::SasUserId, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SAS.UserId"), false, TrParameterType::String, false));
    parameters.insert(ParameterName::SasEnabled, TrParam::new(format!("{DEVICE_PATH}DeviceInfo.SAS.enableMode"), false, TrParameterType::Int, false));

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

    for i in 1..=NUM_PLMNS_IN_CONFIG {
        parameters.insert(ParameterName::PlmnN(i), TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}."), true, TrParameterType::String, false));
        parameters.insert(ParameterName::PlmnNCellReserved(i), TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.CellReservedForOperatorUse"), true, TrParameterType::Boolean, false));
        parameters.insert(ParameterName::PlmnNEnable(i), TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.Enable"), true, TrParameterType::Boolean, false));
        parameters.insert(ParameterName::PlmnNPrimary(i), TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.IsPrimary"), true, TrParameterType::Boolean, false));
        parameters.insert(ParameterName::PlmnNPlmnid(i), TrParam::new(format!("{fap}CellConfig.LTE.EPC.PLMNList.{i}.PLMNID"), true, TrParameterType::String, false));
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

    for i in 1..=NUM_NEIGHBOR_CELL_CONFIG {
        parameters.insert(ParameterName::NeighborCellListN(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}."), true, TrParameterType::Int, false));
        parameters.insert(ParameterName::NeighborCellListNCid(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.CID"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborCellListNPlmnid(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.PLMNID"), true, TrParameterType::String, false));
        parameters.insert(ParameterName::NeighborCellListNEutraCarrierArfcn(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.EUTRACarrierARFCN"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborCellListNPhyCellId(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.PhyCellID"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborCellListNTac(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.X_COM_TAC"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborCellListNQOffset(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.QOffset"), true, TrParameterType::Int, false));
        parameters.insert(ParameterName::NeighborCellListNCio(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.CIO"), true, TrParameterType::Int, false));
        parameters.insert(ParameterName::NeighborCellListNEnable(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.NeighborList.LTECell.{i}.Enable"), true, TrParameterType::Boolean, false));
        numbered_param_names.insert(
            ParameterName::NeighborCellListN(i),
            vec![
                ParameterName::NeighborCellListNEnable(i),
                ParameterName::NeighborCellListNPlmnid(i),
                ParameterName::NeighborCellListNCid(i),
                ParameterName::NeighborCellListNEutraCarrierArfcn(i),
                ParameterName::NeighborCellListNPhyCellId(i),
                ParameterName::NeighborCellListNTac(i),
                ParameterName::NeighborCellListNQOffset(i),
                ParameterName::NeighborCellListNCio(i),
            ],
        );
    }

    for i in 1..=NUM_NEIGHBOR_FREQ_CONFIG {
        parameters.insert(ParameterName::NeighborFreqListN(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}."), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNEarfcn(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.EUTRACarrierARFCN"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNQRxLevMinSib5(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.QRxLevMinSIB5"), true, TrParameterType::Int, false));
        parameters.insert(ParameterName::NeighborFreqListNQOffsetFreq(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.QOffsetFreq"), true, TrParameterType::Int, false));
        parameters.insert(ParameterName::NeighborFreqListNTReselectionEutra(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.TReselectionEUTRA"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNCellReselectionPriority(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.CellReselectionPriority"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNThreshXHigh(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.ThreshXHigh"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNThreshXLow(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.ThreshXLow"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNPMax(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.PMax"), true, TrParameterType::Int, false));
        parameters.insert(ParameterName::NeighborFreqListNTReselectionEutraSfMedium(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.TReselectionEUTRASFMedium"), true, TrParameterType::UnsignedInt, false));
        parameters.insert(ParameterName::NeighborFreqListNEnable(i), TrParam::new(format!("{fap}CellConfig.LTE.RAN.Mobility.IdleMode.InterFreq.Carrier.{i}.Enable"), true, TrParameterType::Boolean, false));
        numbered_param_names.insert(
            ParameterName::NeighborFreqListN(i),
            vec![
                ParameterName::NeighborFreqListNEnable(i),
                ParameterName::NeighborFreqListNEarfcn(i),
                ParameterName::NeighborFreqListNPMax(i),
                ParameterName::NeighborFreqListNQOffsetFreq(i),
                ParameterName::NeighborFreqListNThreshXLow(i),
                ParameterName::NeighborFreqListNThreshXHigh(i),
                ParameterName::NeighborFreqListNCellReselectionPriority(i),
                ParameterName::NeighborFreqListNQRxLevMinSib5(i),
                ParameterName::NeighborFreqListNTReselectionEutra(i),
            ],
        );
    }

    // QRTB never sets GPS from the ACS side, so it registers no enb-direction
    // transform at all; the magma-direction transform converts the TR-181
    // fixed-point reading into a canonical decimal-degree string.
    let transforms_for_enb: HashMap<ParameterName, transforms::Transform> = HashMap::new();
    let mut transforms_for_magma: HashMap<ParameterName, transforms::Transform> = HashMap::new();
    transforms_for_magma.insert(ParameterName::GpsLat, transforms::gps_tr181_for_magma);
    transforms_for_magma.insert(ParameterName::GpsLong, transforms::gps_tr181_for_magma);

    DataModel {
        name: "baicells_qrtb",
        parameters,
        numbered_param_names,
        load_parameters: vec![ParameterName::Device],
        num_plmns: NUM_PLMNS_IN_CONFIG,
        num_neighbor_cell: NUM_NEIGHBOR_CELL_CONFIG,
        num_neighbor_freq: NUM_NEIGHBOR_FREQ_CONFIG,
        transforms_for_enb,
        transforms_for_magma,
    }
}

/// QRTB relies on the domain proxy for radio configuration; operator-set
/// RF parameters would conflict with the SAS grant, so they are stripped
/// after projection. PLMN 1 is always marked cell-reserved.
pub fn postprocess(desired_cfg: &mut crate::config_store::EnodebConfiguration) {
    use crate::data_model::value::TrValue;

    desired_cfg.set_parameter(ParameterName::SasEnabled, TrValue::Int(1), None);
    desired_cfg.add_object(ParameterName::PlmnN(1));
    let _ = desired_cfg.set_parameter_for_object(
        ParameterName::PlmnNCellReserved(1),
        TrValue::Bool(true),
        ParameterName::PlmnN(1),
    );

    for p in [
        ParameterName::SasRadioEnable,
        ParameterName::PowerSpectralDensity,
        ParameterName::Earfcndl,
        ParameterName::Earfcnul,
        ParameterName::Band,
        ParameterName::DlBandwidth,
        ParameterName::UlBandwidth,
    ] {
        if desired_cfg.has_parameter(p, None) {
            desired_cfg.delete_parameter(p, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_path_uses_locked_variant() {
        let dm = data_model();
        assert_eq!(dm.resolve_path(ParameterName::GpsLat), Some("Device.FAP.GPS.LockedLatitude"));
    }

    #[test]
    fn neighbor_families_are_fully_populated() {
        let dm = data_model();
        for i in 1..=NUM_NEIGHBOR_CELL_CONFIG {
            assert!(dm.get(ParameterName::NeighborCellListN(i)).is_some());
        }
        for i in 1..=NUM_NEIGHBOR_FREQ_CONFIG {
            assert!(dm.get(ParameterName::NeighborFreqListN(i)).is_some());
        }
    }

    #[test]
    fn postprocess_strips_sas_derived_rf_params() {
        let mut cfg = crate::config_store::EnodebConfiguration::new();
        cfg.set_parameter(ParameterName::Earfcndl, crate::data_model::value::TrValue::Int(55240), None);
        postprocess(&mut cfg);
        assert!(!cfg.has_parameter(ParameterName::Earfcndl, None));
        assert!(cfg.has_object(ParameterName::PlmnN(1)));
    }
}
