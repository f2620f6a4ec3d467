//! Mutable configuration snapshot: the flat parameter/object store shared
//! by both `device_cfg` (reported) and `desired_cfg` (target).

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::data_model::value::TrValue;
use crate::data_model::ParameterName;
use crate::error::{Error, Result};

/// An object instance is identified by the canonical `ParameterName` of its
/// template root (e.g. `PlmnN(3)`). `None` denotes root-scoped parameters
/// that do not belong to any indexed object.
pub type ObjectId = Option<ParameterName>;

#[derive(Debug, Clone, Default)]
pub struct EnodebConfiguration {
    values: HashMap<(ObjectId, ParameterName), TrValue>,
    objects: HashSet<ParameterName>,
}

impl EnodebConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_object(&self, obj: ParameterName) -> bool {
        self.objects.contains(&obj)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ParameterName> {
        self.objects.iter()
    }

    pub fn add_object(&mut self, obj: ParameterName) {
        self.objects.insert(obj);
    }

    pub fn delete_object(&mut self, obj: ParameterName) {
        if !self.objects.remove(&obj) {
            warn!(?obj, "delete_object: object not present, no-op");
            return;
        }
        self.values.retain(|(o, _), _| *o != Some(obj));
    }

    /// Renames an object instance in place, used by AddObject index
    /// remapping: the device assigns an instance number that may differ
    /// from the template-bound index the engine originally requested.
    pub fn rename_object(&mut self, from: ParameterName, to: ParameterName) {
        if self.objects.remove(&from) {
            self.objects.insert(to);
        }
        let moved: Vec<_> = self
            .values
            .keys()
            .filter(|(o, _)| *o == Some(from))
            .cloned()
            .collect();
        for key in moved {
            if let Some(v) = self.values.remove(&key) {
                self.values.insert((Some(to), key.1), v);
            }
        }
    }

    pub fn set_parameter(&mut self, name: ParameterName, value: TrValue, obj: ObjectId) {
        self.values.insert((obj, name), value);
    }

    pub fn set_parameter_for_object(
        &mut self,
        name: ParameterName,
        value: TrValue,
        obj: ParameterName,
    ) -> Result<()> {
        if !self.has_object(obj) {
            return Err(Error::configuration_error(format!(
                "set_parameter_for_object: object {obj:?} does not exist"
            )));
        }
        self.set_parameter(name, value, Some(obj));
        Ok(())
    }

    pub fn get_parameter(&self, name: ParameterName, obj: ObjectId) -> Option<&TrValue> {
        self.values.get(&(obj, name))
    }

    pub fn has_parameter(&self, name: ParameterName, obj: ObjectId) -> bool {
        self.values.contains_key(&(obj, name))
    }

    pub fn delete_parameter(&mut self, name: ParameterName, obj: ObjectId) {
        if self.values.remove(&(obj, name)).is_none() {
            warn!(?name, ?obj, "delete_parameter: parameter not present, no-op");
        }
    }

    pub fn get_parameter_names_for_object(&self, obj: ParameterName) -> Vec<ParameterName> {
        self.values
            .keys()
            .filter(|(o, _)| *o == Some(obj))
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn all_object_ids(&self) -> HashSet<ParameterName> {
        self.objects.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parameter_for_object_requires_existing_object() {
        let mut cfg = EnodebConfiguration::new();
        let err = cfg
            .set_parameter_for_object(ParameterName::PlmnNEnable(1), TrValue::Bool(true), ParameterName::PlmnN(1))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn delete_object_removes_scoped_parameters() {
        let mut cfg = EnodebConfiguration::new();
        cfg.add_object(ParameterName::PlmnN(1));
        cfg.set_parameter_for_object(ParameterName::PlmnNEnable(1), TrValue::Bool(true), ParameterName::PlmnN(1)).unwrap();
        cfg.delete_object(ParameterName::PlmnN(1));
        assert!(!cfg.has_object(ParameterName::PlmnN(1)));
        assert!(cfg.get_parameter(ParameterName::PlmnNEnable(1), Some(ParameterName::PlmnN(1))).is_none());
    }

    #[test]
    fn rename_object_moves_scoped_parameters() {
        let mut cfg = EnodebConfiguration::new();
        cfg.add_object(ParameterName::PlmnN(1));
        cfg.set_parameter_for_object(ParameterName::PlmnNEnable(1), TrValue::Bool(true), ParameterName::PlmnN(1)).unwrap();
        cfg.rename_object(ParameterName::PlmnN(1), ParameterName::PlmnN(3));
        assert!(cfg.has_object(ParameterName::PlmnN(3)));
        assert_eq!(
            cfg.get_parameter(ParameterName::PlmnNEnable(3), Some(ParameterName::PlmnN(3))),
            Some(&TrValue::Bool(true))
        );
    }
}
