//! Declarative per-device-model data model: parameter metadata, object
//! templates, and value transforms.

pub mod parameter;
pub mod qafa;
pub mod qrtb;
pub mod transforms;
pub mod value;

use std::collections::HashMap;

pub use parameter::{ParamPath, ParameterName, TrParam, TrParameterType};
pub use transforms::Transform;
pub use value::TrValue;

/// A read-only, process-wide table of parameter metadata plus the object
/// templates and transforms a single firmware family needs.
///
/// `transforms_for_enb`/`transforms_for_magma` are per-model: each firmware
/// family registers only the conversions its own wire encoding needs, the
/// same way each device class owns its own `TRANSFORMS_FOR_ENB`/
/// `TRANSFORMS_FOR_MAGMA` table rather than sharing one across families.
pub struct DataModel {
    pub name: &'static str,
    pub parameters: HashMap<ParameterName, TrParam>,
    /// For each object-template parameter, the ordered list of its child
    /// parameters (used when iterating an indexed family during object
    /// reconciliation).
    pub numbered_param_names: HashMap<ParameterName, Vec<ParameterName>>,
    pub load_parameters: Vec<ParameterName>,
    pub num_plmns: u8,
    pub num_neighbor_cell: u8,
    pub num_neighbor_freq: u8,
    pub transforms_for_enb: HashMap<ParameterName, Transform>,
    pub transforms_for_magma: HashMap<ParameterName, Transform>,
}

impl DataModel {
    pub fn get(&self, name: ParameterName) -> Option<&TrParam> {
        self.parameters.get(&name)
    }

    /// Render a parameter's canonical name to its TR-069 wire path, or
    /// `None` if the parameter is synthetic (sentinel path) or unknown to
    /// this model.
    pub fn resolve_path(&self, name: ParameterName) -> Option<&str> {
        self.parameters.get(&name)?.path.as_wire_path()
    }

    pub fn get_parameter_name_from_path(&self, path: &str) -> Option<ParameterName> {
        self.parameters.iter().find_map(|(name, param)| {
            match &param.path {
                ParamPath::Path(p) if p == path => Some(*name),
                _ => None,
            }
        })
    }

    pub fn transform_for_enb(&self, name: ParameterName, value: &TrValue) -> TrValue {
        match self.transforms_for_enb.get(&name) {
            Some(f) => f(value),
            None => value.clone(),
        }
    }

    pub fn transform_for_magma(&self, name: ParameterName, value: &TrValue) -> TrValue {
        match self.transforms_for_magma.get(&name) {
            Some(f) => f(value),
            None => value.clone(),
        }
    }
}
