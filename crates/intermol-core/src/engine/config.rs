use crate::core::chemistry::valence::{AssignPolicy, ValenceParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Parameter '{name}' must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

/// Distance (Å) and angle (degrees) thresholds of every contact family, plus
/// the sub-type toggles and perception policies.
///
/// Values are validated once through [`ContactParams::validate`]; detectors
/// assume they are finite and inside their documented ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactParams {
    pub max_hydrophobic_distance: f64,

    pub max_hydrogen_bond_distance: f64,
    pub max_hydrogen_bond_sulfur_distance: f64,
    pub max_hydrogen_bond_angle: f64,
    pub backbone_hydrogen_bond: bool,
    pub water_hydrogen_bond: bool,
    pub weak_hydrogen_bond: bool,

    pub max_pi_stacking_distance: f64,
    pub max_pi_stacking_offset: f64,
    pub max_pi_stacking_angle: f64,
    pub max_cation_pi_distance: f64,
    pub max_cation_pi_offset: f64,
    pub max_saltbridge_distance: f64,

    pub max_halogen_bond_distance: f64,
    pub max_halogen_bond_angle: f64,
    /// Enables the C-X...A and X...A-Y angle checks; off means distance only.
    pub halogen_bond_geometry: bool,

    pub max_metal_distance: f64,

    pub line_of_sight_dist_factor: f64,
    /// Runs the refinement passes after detection.
    pub refine: bool,
    /// Pairs with exactly one atom in this model bypass the cross-model filter.
    pub master_model_index: Option<usize>,

    pub assign_charge: AssignPolicy,
    pub assign_h: AssignPolicy,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            max_hydrophobic_distance: 4.0,
            max_hydrogen_bond_distance: 3.5,
            max_hydrogen_bond_sulfur_distance: 4.1,
            max_hydrogen_bond_angle: 40.0,
            backbone_hydrogen_bond: true,
            water_hydrogen_bond: true,
            weak_hydrogen_bond: true,
            max_pi_stacking_distance: 5.5,
            max_pi_stacking_offset: 2.0,
            max_pi_stacking_angle: 30.0,
            max_cation_pi_distance: 6.0,
            max_cation_pi_offset: 1.5,
            max_saltbridge_distance: 4.0,
            max_halogen_bond_distance: 3.5,
            max_halogen_bond_angle: 30.0,
            halogen_bond_geometry: false,
            max_metal_distance: 3.0,
            line_of_sight_dist_factor: 1.0,
            refine: true,
            master_model_index: None,
            assign_charge: AssignPolicy::Auto,
            assign_h: AssignPolicy::Auto,
        }
    }
}

fn checked(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(
            parameter = name,
            value,
            clamped,
            "Parameter out of range; clamping."
        );
    }
    Ok(clamped)
}

impl ContactParams {
    pub fn builder() -> ContactParamsBuilder {
        ContactParamsBuilder::new()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        params.validate()
    }

    /// Rejects non-finite values and clamps the rest into range.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.max_hydrophobic_distance =
            checked("max_hydrophobic_distance", self.max_hydrophobic_distance, 0.0, 10.0)?;
        self.max_hydrogen_bond_distance =
            checked("max_hydrogen_bond_distance", self.max_hydrogen_bond_distance, 0.0, 10.0)?;
        self.max_hydrogen_bond_sulfur_distance = checked(
            "max_hydrogen_bond_sulfur_distance",
            self.max_hydrogen_bond_sulfur_distance,
            0.0,
            10.0,
        )?;
        self.max_hydrogen_bond_angle =
            checked("max_hydrogen_bond_angle", self.max_hydrogen_bond_angle, 0.0, 180.0)?;
        self.max_pi_stacking_distance =
            checked("max_pi_stacking_distance", self.max_pi_stacking_distance, 0.0, 10.0)?;
        self.max_pi_stacking_offset =
            checked("max_pi_stacking_offset", self.max_pi_stacking_offset, 0.0, 10.0)?;
        self.max_pi_stacking_angle =
            checked("max_pi_stacking_angle", self.max_pi_stacking_angle, 0.0, 90.0)?;
        self.max_cation_pi_distance =
            checked("max_cation_pi_distance", self.max_cation_pi_distance, 0.0, 10.0)?;
        self.max_cation_pi_offset =
            checked("max_cation_pi_offset", self.max_cation_pi_offset, 0.0, 10.0)?;
        self.max_saltbridge_distance =
            checked("max_saltbridge_distance", self.max_saltbridge_distance, 0.0, 10.0)?;
        self.max_halogen_bond_distance =
            checked("max_halogen_bond_distance", self.max_halogen_bond_distance, 0.0, 10.0)?;
        self.max_halogen_bond_angle =
            checked("max_halogen_bond_angle", self.max_halogen_bond_angle, 0.0, 180.0)?;
        self.max_metal_distance = checked("max_metal_distance", self.max_metal_distance, 0.0, 10.0)?;
        self.line_of_sight_dist_factor =
            checked("line_of_sight_dist_factor", self.line_of_sight_dist_factor, 0.0, 5.0)?;
        Ok(self)
    }

    pub fn valence_params(&self) -> ValenceParams {
        ValenceParams {
            assign_charge: self.assign_charge,
            assign_h: self.assign_h,
        }
    }

    /// Largest search radius any hydrogen-bond sub-type can use.
    pub fn hydrogen_bond_search_radius(&self) -> f64 {
        self.max_hydrogen_bond_distance
            .max(self.max_hydrogen_bond_sulfur_distance)
    }

    /// Largest search radius of the ionic family (salt bridges, cation-pi, pi-stacking).
    pub fn charged_search_radius(&self) -> f64 {
        self.max_saltbridge_distance
            .max(self.max_pi_stacking_distance)
            .max(self.max_cation_pi_distance)
    }
}

/// Overrides on top of [`ContactParams::default`].
#[derive(Debug, Clone, Default)]
pub struct ContactParamsBuilder {
    params: ContactParams,
}

impl ContactParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: ContactParams) -> Self {
        Self { params }
    }

    pub fn max_hydrophobic_distance(mut self, value: f64) -> Self {
        self.params.max_hydrophobic_distance = value;
        self
    }
    pub fn max_hydrogen_bond_distance(mut self, value: f64) -> Self {
        self.params.max_hydrogen_bond_distance = value;
        self
    }
    pub fn max_hydrogen_bond_sulfur_distance(mut self, value: f64) -> Self {
        self.params.max_hydrogen_bond_sulfur_distance = value;
        self
    }
    pub fn max_hydrogen_bond_angle(mut self, value: f64) -> Self {
        self.params.max_hydrogen_bond_angle = value;
        self
    }
    pub fn backbone_hydrogen_bond(mut self, enabled: bool) -> Self {
        self.params.backbone_hydrogen_bond = enabled;
        self
    }
    pub fn water_hydrogen_bond(mut self, enabled: bool) -> Self {
        self.params.water_hydrogen_bond = enabled;
        self
    }
    pub fn weak_hydrogen_bond(mut self, enabled: bool) -> Self {
        self.params.weak_hydrogen_bond = enabled;
        self
    }
    pub fn max_pi_stacking_distance(mut self, value: f64) -> Self {
        self.params.max_pi_stacking_distance = value;
        self
    }
    pub fn max_pi_stacking_offset(mut self, value: f64) -> Self {
        self.params.max_pi_stacking_offset = value;
        self
    }
    pub fn max_pi_stacking_angle(mut self, value: f64) -> Self {
        self.params.max_pi_stacking_angle = value;
        self
    }
    pub fn max_cation_pi_distance(mut self, value: f64) -> Self {
        self.params.max_cation_pi_distance = value;
        self
    }
    pub fn max_cation_pi_offset(mut self, value: f64) -> Self {
        self.params.max_cation_pi_offset = value;
        self
    }
    pub fn max_saltbridge_distance(mut self, value: f64) -> Self {
        self.params.max_saltbridge_distance = value;
        self
    }
    pub fn max_halogen_bond_distance(mut self, value: f64) -> Self {
        self.params.max_halogen_bond_distance = value;
        self
    }
    pub fn max_halogen_bond_angle(mut self, value: f64) -> Self {
        self.params.max_halogen_bond_angle = value;
        self
    }
    pub fn halogen_bond_geometry(mut self, enabled: bool) -> Self {
        self.params.halogen_bond_geometry = enabled;
        self
    }
    pub fn max_metal_distance(mut self, value: f64) -> Self {
        self.params.max_metal_distance = value;
        self
    }
    pub fn line_of_sight_dist_factor(mut self, value: f64) -> Self {
        self.params.line_of_sight_dist_factor = value;
        self
    }
    pub fn refine(mut self, enabled: bool) -> Self {
        self.params.refine = enabled;
        self
    }
    pub fn master_model_index(mut self, model: Option<usize>) -> Self {
        self.params.master_model_index = model;
        self
    }
    pub fn assign_charge(mut self, policy: AssignPolicy) -> Self {
        self.params.assign_charge = policy;
        self
    }
    pub fn assign_h(mut self, policy: AssignPolicy) -> Self {
        self.params.assign_h = policy;
        self
    }

    pub fn build(self) -> Result<ContactParams, ConfigError> {
        self.params.validate()
    }
}
