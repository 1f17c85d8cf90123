use crate::engine::contacts::{ContactType, FrozenContacts};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Which contact types a consumer wants, and the cylinder radius to draw them with.
///
/// The water and backbone hydrogen-bond sub-types follow `hydrogen_bond`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactDataParams {
    pub hydrogen_bond: bool,
    pub hydrophobic: bool,
    pub halogen_bond: bool,
    pub salt_bridge: bool,
    pub metal_coordination: bool,
    pub cation_pi: bool,
    pub pi_stacking: bool,
    pub weak_hydrogen_bond: bool,
    pub radius: f64,
}

impl Default for ContactDataParams {
    fn default() -> Self {
        Self {
            hydrogen_bond: true,
            hydrophobic: true,
            halogen_bond: true,
            salt_bridge: true,
            metal_coordination: true,
            cation_pi: true,
            pi_stacking: true,
            weak_hydrogen_bond: true,
            radius: 1.0,
        }
    }
}

impl ContactDataParams {
    pub fn includes(&self, contact_type: ContactType) -> bool {
        match contact_type {
            ContactType::HydrogenBond
            | ContactType::WaterHydrogenBond
            | ContactType::BackboneHydrogenBond => self.hydrogen_bond,
            ContactType::WeakHydrogenBond => self.weak_hydrogen_bond,
            ContactType::Hydrophobic => self.hydrophobic,
            ContactType::HalogenBond => self.halogen_bond,
            ContactType::IonicInteraction => self.salt_bridge,
            ContactType::MetalCoordination => self.metal_coordination,
            ContactType::CationPi => self.cation_pi,
            ContactType::PiStacking => self.pi_stacking,
        }
    }
}

/// Splits a `0xRRGGBB` colour into normalised channels.
pub fn color_components(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

/// Parallel per-contact arrays for drawing the surviving contacts as cylinders.
///
/// `picking[k]` is the contact index of entry `k`, for mapping a picked
/// cylinder back to [`FrozenContacts::contact`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactData {
    pub position1: Vec<Point3<f64>>,
    pub position2: Vec<Point3<f64>>,
    pub color: Vec<[f32; 3]>,
    pub radius: Vec<f64>,
    pub picking: Vec<usize>,
}

impl ContactData {
    pub fn collect(contacts: &FrozenContacts, params: &ContactDataParams) -> Self {
        let mut data = Self::default();
        for view in contacts
            .surviving()
            .filter(|v| params.includes(v.contact_type))
        {
            data.position1.push(view.center1);
            data.position2.push(view.center2);
            data.color.push(color_components(view.contact_type.color()));
            data.radius.push(params.radius);
            data.picking.push(view.index);
        }
        data
    }

    pub fn len(&self) -> usize {
        self.picking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picking.is_empty()
    }
}
