//! Per-parameter value transforms applied at the device/canonical boundary.
//!
//! `transform_for_enb` runs when a canonical value is about to be written to
//! the wire (SetParameterValues); `transform_for_magma` runs when a
//! device-reported value is read into the configuration store. The two
//! directions are inverses of each other for every parameter that has both.

use crate::data_model::parameter::ParameterName;
use crate::data_model::value::TrValue;

pub type Transform = fn(&TrValue) -> TrValue;

/// `CELL_BARRED` is stored canonically as "cell is usable" (`true` = not
/// barred); the wire parameter is the inverse sense.
pub fn invert_cell_barred_for_enb(v: &TrValue) -> TrValue {
    TrValue::Bool(!v.as_bool().unwrap_or(false))
}

pub fn invert_cell_barred_for_magma(v: &TrValue) -> TrValue {
    invert_cell_barred_for_enb(v)
}

/// `ADMIN_STATE` is canonically a bool (`true` = enabled); QAFA/QAFB report
/// and expect the string "1"/"0".
pub fn admin_state_for_enb(v: &TrValue) -> TrValue {
    let enabled = v.as_bool().unwrap_or(false);
    TrValue::Str(if enabled { "1".to_string() } else { "0".to_string() })
}

pub fn admin_state_for_magma(v: &TrValue) -> TrValue {
    TrValue::Bool(v.as_str().map(|s| s == "1").unwrap_or(false))
}

/// `PLMN_N_CELL_RESERVED` is canonically a bool; the wire parameter is the
/// string "1"/"0".
pub fn cell_reserved_for_enb(v: &TrValue) -> TrValue {
    let reserved = v.as_bool().unwrap_or(false);
    TrValue::Str(if reserved { "1".to_string() } else { "0".to_string() })
}

pub fn cell_reserved_for_magma(v: &TrValue) -> TrValue {
    TrValue::Bool(v.as_str().map(|s| s == "1").unwrap_or(false))
}

/// `BAND_CAPABILITY`/`DUPLEX_MODE_CAPABILITY` are read-only vendor strings;
/// no write-direction transform is registered for them (QAFA/QAFB never set
/// these), only the read-direction normalization into a canonical token.
pub fn band_capability_for_magma(v: &TrValue) -> TrValue {
    TrValue::Str(v.as_str().unwrap_or_default().trim().to_uppercase())
}

pub fn duplex_mode_for_magma(v: &TrValue) -> TrValue {
    TrValue::Str(v.as_str().unwrap_or_default().trim().to_uppercase())
}

/// `GPS_LAT`/`GPS_LONG` on QRTB are reported as TR-181 fixed-point integers
/// (degrees * 1e-6); canonical form is a decimal-degree string.
pub fn gps_tr181_for_enb(v: &TrValue) -> TrValue {
    let degrees: f64 = v.as_str().and_then(|s| s.parse().ok()).unwrap_or(0.0);
    TrValue::Int((degrees * 1_000_000.0).round() as i64)
}

pub fn gps_tr181_for_magma(v: &TrValue) -> TrValue {
    let fixed = v.as_int().unwrap_or(0);
    TrValue::Str(format!("{:.6}", fixed as f64 / 1_000_000.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_barred_round_trips() {
        let canonical = TrValue::Bool(true);
        let wire = invert_cell_barred_for_enb(&canonical);
        let back = invert_cell_barred_for_magma(&wire);
        assert_eq!(back, canonical);
    }

    #[test]
    fn admin_state_round_trips() {
        let canonical = TrValue::Bool(true);
        let wire = admin_state_for_enb(&canonical);
        assert_eq!(wire, TrValue::Str("1".to_string()));
        let back = admin_state_for_magma(&wire);
        assert_eq!(back, canonical);
    }

    #[test]
    fn gps_round_trips_within_rounding() {
        let canonical = TrValue::Str("37.422000".to_string());
        let wire = gps_tr181_for_enb(&canonical);
        let back = gps_tr181_for_magma(&wire);
        assert_eq!(back, canonical);
    }
}
