//! Domain proxy client: feeds SAS-granted radio parameters (CBRS band 48)
//! into the QRTB desired configuration.
//!
//! Grounded on `dp_client.py` / `device_config/configuration_util.py` /
//! `device_config/cbrs_consts.py` (`fetch_cbsd_state`, `calc_earfcn`,
//! `calc_bandwidth_mhz`, `calc_bandwidth_rbs`, `BaicellsQRTBHandler`'s
//! `_calc_psd`).

use async_trait::async_trait;

use crate::config::SasConfig;
use crate::config_store::EnodebConfiguration;
use crate::data_model::value::TrValue;
use crate::data_model::ParameterName;
use crate::error::{Error, Result};

/// CBRS band 48 downlink EARFCN offset and low-edge frequency, per 3GPP
/// TS 36.101 table 5.7.3-1.
const BAND_48_EARFCN_OFFSET: i64 = 55240;
const BAND_48_LOW_EDGE_HZ: i64 = 3_550_000_000;
const BAND: i64 = 48;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CbsdChannel {
    pub low_hz: i64,
    pub high_hz: i64,
    pub max_eirp_dbm_mhz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CbsdStateResult {
    pub radio_enabled: bool,
    pub channel: Option<CbsdChannel>,
}

#[async_trait]
pub trait DomainProxyClient: Send + Sync {
    async fn fetch_cbsd_state(&self, serial_number: &str) -> Result<CbsdStateResult>;
}

/// In-memory stand-in used when no domain proxy is reachable in this
/// deployment (tests, and CBRS-disabled sites).
pub struct StubDomainProxyClient {
    pub fixed: CbsdStateResult,
}

#[async_trait]
impl DomainProxyClient for StubDomainProxyClient {
    async fn fetch_cbsd_state(&self, _serial_number: &str) -> Result<CbsdStateResult> {
        Ok(self.fixed)
    }
}

/// EARFCN for the center of a granted channel, per the band 48 mapping:
/// 10 EARFCN units per MHz above the band's low edge.
pub fn calc_earfcn(low_hz: i64, high_hz: i64) -> i64 {
    let center_hz = (low_hz + high_hz) / 2;
    let offset_mhz = (center_hz - BAND_48_LOW_EDGE_HZ) as f64 / 1_000_000.0;
    BAND_48_EARFCN_OFFSET + (offset_mhz * 10.0).round() as i64
}

pub fn calc_bandwidth_mhz(low_hz: i64, high_hz: i64) -> f64 {
    (high_hz - low_hz) as f64 / 1_000_000.0
}

/// Nearest LTE channel bandwidth (in resource blocks) at or below the
/// granted spectrum width.
pub fn calc_bandwidth_rbs(bandwidth_mhz: f64) -> Result<i64> {
    let table: &[(f64, i64)] = &[(20.0, 100), (15.0, 75), (10.0, 50), (5.0, 25), (3.0, 15), (1.4, 6)];
    table
        .iter()
        .find(|(mhz, _)| bandwidth_mhz + 0.01 >= *mhz)
        .map(|(_, rbs)| *rbs)
        .ok_or_else(|| Error::configuration_error(format!("no LTE bandwidth fits granted width {bandwidth_mhz}MHz")))
}

/// Power spectral density in dBm/MHz, truncated to an integer and
/// range-checked against the SAS grant bounds.
pub fn calc_psd(eirp_dbm_mhz: f64, sas: &SasConfig) -> Result<i64> {
    let psd = eirp_dbm_mhz as i64;
    if (psd as f64) < sas.min_psd_dbm_per_mhz || (psd as f64) > sas.max_psd_dbm_per_mhz {
        return Err(Error::configuration_error(format!(
            "power spectral density {psd} dBm/MHz out of SAS range [{}, {}]",
            sas.min_psd_dbm_per_mhz, sas.max_psd_dbm_per_mhz
        )));
    }
    Ok(psd)
}

/// Projects a CBSD state result from the domain proxy into the QRTB
/// desired configuration. If the radio is disabled, every other SAS-derived
/// parameter is left untouched; enodebd must not transmit without a grant.
pub fn update_desired_config_from_cbsd_state(
    state: &CbsdStateResult,
    desired_cfg: &mut EnodebConfiguration,
    sas: &SasConfig,
) -> Result<()> {
    desired_cfg.set_parameter(ParameterName::SasRadioEnable, TrValue::Bool(state.radio_enabled), None);
    if !state.radio_enabled {
        return Ok(());
    }
    let channel = state
        .channel
        .ok_or_else(|| Error::configuration_error("radio enabled but domain proxy granted no channel"))?;

    let earfcn = calc_earfcn(channel.low_hz, channel.high_hz);
    let bandwidth_mhz = calc_bandwidth_mhz(channel.low_hz, channel.high_hz);
    let bandwidth_rbs = calc_bandwidth_rbs(bandwidth_mhz)?;
    let psd = calc_psd(channel.max_eirp_dbm_mhz, sas)?;

    desired_cfg.set_parameter(ParameterName::Band, TrValue::Int(BAND), None);
    desired_cfg.set_parameter(ParameterName::DlBandwidth, TrValue::Int(bandwidth_rbs), None);
    desired_cfg.set_parameter(ParameterName::UlBandwidth, TrValue::Int(bandwidth_rbs), None);
    desired_cfg.set_parameter(ParameterName::Earfcndl, TrValue::Int(earfcn), None);
    desired_cfg.set_parameter(ParameterName::Earfcnul, TrValue::Int(earfcn), None);
    desired_cfg.set_parameter(ParameterName::PowerSpectralDensity, TrValue::Int(psd), None);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earfcn_matches_band_48_low_edge() {
        assert_eq!(calc_earfcn(3_550_000_000, 3_550_000_000), BAND_48_EARFCN_OFFSET);
    }

    #[test]
    fn bandwidth_rbs_rounds_down_to_nearest_channel() {
        assert_eq!(calc_bandwidth_rbs(10.0).unwrap(), 50);
        assert_eq!(calc_bandwidth_rbs(9.9).unwrap(), 25);
    }

    #[test]
    fn psd_out_of_range_is_configuration_error() {
        let sas = SasConfig::default();
        let err = calc_psd(50.0, &sas).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[tokio::test]
    async fn disabled_radio_only_sets_radio_enable() {
        let mut cfg = EnodebConfiguration::new();
        let sas = SasConfig::default();
        let state = CbsdStateResult { radio_enabled: false, channel: None };
        update_desired_config_from_cbsd_state(&state, &mut cfg, &sas).unwrap();
        assert_eq!(cfg.get_parameter(ParameterName::SasRadioEnable, None), Some(&TrValue::Bool(false)));
        assert!(cfg.get_parameter(ParameterName::Earfcndl, None).is_none());
    }

    #[tokio::test]
    async fn enabled_radio_projects_full_channel() {
        let mut cfg = EnodebConfiguration::new();
        let sas = SasConfig::default();
        let state = CbsdStateResult {
            radio_enabled: true,
            channel: Some(CbsdChannel { low_hz: 3_560_000_000, high_hz: 3_570_000_000, max_eirp_dbm_mhz: 20.0 }),
        };
        update_desired_config_from_cbsd_state(&state, &mut cfg, &sas).unwrap();
        assert_eq!(cfg.get_parameter(ParameterName::DlBandwidth, None), Some(&TrValue::Int(50)));
        assert_eq!(cfg.get_parameter(ParameterName::PowerSpectralDensity, None), Some(&TrValue::Int(20)));
    }
}
