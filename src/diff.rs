//! Pure diff engine: compares desired and device configuration snapshots
//! against a data model to produce the next wire operation.
//!
//! Grounded on `state_machines/acs_state_utils.py`
//! (`get_params_to_get`, `get_object_params_to_get`,
//! `get_all_objects_to_add`, `get_all_objects_to_delete`,
//! `get_all_param_values_to_set`).

use std::collections::HashSet;

use crate::config_store::EnodebConfiguration;
use crate::data_model::{DataModel, ParamPath, ParameterName, TrValue};

/// Parameters present in the data model but absent from `device`, skipping
/// synthetic (non-wire) parameters. If `request_all_params`, every
/// non-synthetic parameter in the model is returned regardless of presence.
pub fn params_to_get(model: &DataModel, device: &EnodebConfiguration, request_all_params: bool) -> Vec<ParameterName> {
    model
        .parameters
        .iter()
        .filter(|(_, param)| !matches!(param.path, ParamPath::Invalid))
        .filter(|(name, _)| request_all_params || !device.has_parameter(**name, None))
        .map(|(name, _)| *name)
        .collect()
}

/// For each indexed family root present in `model.numbered_param_names`,
/// ensures the object exists in `device` and collects any child parameter
/// that is missing (or all children, if `request_all_params`).
pub fn object_params_to_get(
    model: &DataModel,
    device: &mut EnodebConfiguration,
    request_all_params: bool,
) -> Vec<ParameterName> {
    let mut out = Vec::new();
    for (root, children) in &model.numbered_param_names {
        if !device.has_object(*root) {
            device.add_object(*root);
        }
        for child in children {
            if request_all_params || !device.has_parameter(*child, Some(*root)) {
                out.push(*child);
            }
        }
    }
    out
}

/// Objects tracked by `device` but not by `desired`, restricted to indexed
/// families (i.e. those with an entry in `numbered_param_names`).
pub fn objects_to_delete(model: &DataModel, desired: &EnodebConfiguration, device: &EnodebConfiguration) -> Vec<ParameterName> {
    let indexed: HashSet<_> = model.numbered_param_names.keys().copied().collect();
    device
        .objects()
        .filter(|o| indexed.contains(*o) && !desired.has_object(**o))
        .copied()
        .collect()
}

/// Objects desired but not yet present on the device.
pub fn objects_to_add(desired: &EnodebConfiguration, device: &EnodebConfiguration) -> Vec<ParameterName> {
    desired.objects().filter(|o| !device.has_object(**o)).copied().collect()
}

/// `(name, obj, value)` triples where the device-transform of the desired
/// value differs from what the device currently reports, skipping
/// synthetic parameters (they never cross the wire).
pub fn values_to_set(
    model: &DataModel,
    desired: &EnodebConfiguration,
    device: &EnodebConfiguration,
) -> Vec<(ParameterName, crate::config_store::ObjectId, TrValue)> {
    let mut out = Vec::new();
    for root in desired.objects() {
        for name in desired.get_parameter_names_for_object(*root) {
            let Some(param) = model.get(name) else { continue };
            if matches!(param.path, ParamPath::Invalid) {
                continue;
            }
            let Some(desired_val) = desired.get_parameter(name, Some(*root)) else { continue };
            let wire_val = model.transform_for_enb(name, desired_val);
            let current = device.get_parameter(name, Some(*root));
            if current != Some(&wire_val) {
                out.push((name, Some(*root), wire_val));
            }
        }
    }
    for (name, param) in &model.parameters {
        if matches!(param.path, ParamPath::Invalid) {
            continue;
        }
        let Some(desired_val) = desired.get_parameter(*name, None) else { continue };
        let wire_val = model.transform_for_enb(*name, desired_val);
        let current = device.get_parameter(*name, None);
        if current != Some(&wire_val) {
            out.push((*name, None, wire_val));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::qafa;

    #[test]
    fn params_to_get_skips_synthetic_and_present() {
        let model = qafa::data_model();
        let mut device = EnodebConfiguration::new();
        device.set_parameter(ParameterName::SerialNumber, TrValue::Str("x".into()), None);
        let missing = params_to_get(&model, &device, false);
        assert!(!missing.contains(&ParameterName::SerialNumber));
        assert!(!missing.contains(&ParameterName::DownloadUrl));
        assert!(missing.contains(&ParameterName::SwVersion));
    }

    #[test]
    fn objects_to_add_and_delete_are_disjoint_from_each_other() {
        let mut desired = EnodebConfiguration::new();
        let mut device = EnodebConfiguration::new();
        desired.add_object(ParameterName::PlmnN(1));
        device.add_object(ParameterName::PlmnN(2));
        let model = qafa::data_model();
        assert_eq!(objects_to_add(&desired, &device), vec![ParameterName::PlmnN(1)]);
        assert_eq!(objects_to_delete(&model, &desired, &device), vec![ParameterName::PlmnN(2)]);
    }

    #[test]
    fn values_to_set_applies_enb_transform_before_compare() {
        let model = qafa::data_model();
        let mut desired = EnodebConfiguration::new();
        let mut device = EnodebConfiguration::new();
        desired.set_parameter(ParameterName::AdminState, TrValue::Bool(true), None);
        device.set_parameter(ParameterName::AdminState, TrValue::Str("0".to_string()), None);
        let diffs = values_to_set(&model, &desired, &device);
        assert!(diffs
            .iter()
            .any(|(n, _, v)| *n == ParameterName::AdminState && *v == TrValue::Str("1".to_string())));
    }

    #[test]
    fn values_to_set_converges_to_empty_once_applied() {
        let model = qafa::data_model();
        let mut desired = EnodebConfiguration::new();
        desired.set_parameter(ParameterName::SwVersion, TrValue::Str("1.2.3".into()), None);
        let mut device = EnodebConfiguration::new();
        let diffs = values_to_set(&model, &desired, &device);
        for (name, obj, val) in diffs {
            device.set_parameter(name, val, obj);
        }
        assert!(values_to_set(&model, &desired, &device).is_empty());
    }
}
