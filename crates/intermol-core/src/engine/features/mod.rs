//! Chemical features: charged groups, aromatic rings, hydrogen-bond donors and
//! acceptors, hydrophobic atoms, halogen-bond partners, metals and metal ligands.
//!
//! Each detector appends to a shared [`FeatureSet`]; a feature is one or more
//! atoms plus its type, an informational group and the centroid taken when
//! the feature was created.

mod aromatic;
mod charged;
mod halogen;
mod hydrogen;
mod hydrophobic;
mod metal;

use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::system::MolecularSystem;
use crate::core::spatial::SpatialIndex;
use crate::core::utils::geometry::centroid;
use nalgebra::Point3;
use std::fmt;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub use aromatic::add_aromatic_rings;
pub use charged::{add_negative_charges, add_positive_charges};
pub use halogen::{add_halogen_acceptors, add_halogen_donors};
pub use hydrogen::{add_hydrogen_acceptors, add_hydrogen_donors, add_weak_hydrogen_donors};
pub use hydrophobic::add_hydrophobic_atoms;
pub use metal::{add_metal_binding, add_metals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FeatureType {
    PositiveCharge,
    NegativeCharge,
    AromaticRing,
    HydrogenDonor,
    HydrogenAcceptor,
    WeakHydrogenDonor,
    HalogenDonor,
    HalogenAcceptor,
    Hydrophobic,
    MetalBinding,
    Metal,
}

impl FeatureType {
    pub const ALL: [FeatureType; 11] = [
        Self::PositiveCharge,
        Self::NegativeCharge,
        Self::AromaticRing,
        Self::HydrogenDonor,
        Self::HydrogenAcceptor,
        Self::WeakHydrogenDonor,
        Self::HalogenDonor,
        Self::HalogenAcceptor,
        Self::Hydrophobic,
        Self::MetalBinding,
        Self::Metal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PositiveCharge => "positive charge",
            Self::NegativeCharge => "negative charge",
            Self::AromaticRing => "aromatic ring",
            Self::HydrogenDonor => "hydrogen donor",
            Self::HydrogenAcceptor => "hydrogen acceptor",
            Self::WeakHydrogenDonor => "weak hydrogen donor",
            Self::HalogenDonor => "halogen donor",
            Self::HalogenAcceptor => "halogen acceptor",
            Self::Hydrophobic => "hydrophobic",
            Self::MetalBinding => "metal binding",
            Self::Metal => "metal",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chemical group a feature was derived from. Informational, except for metal
/// features and metal ligands, where it decides which pairs may coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FeatureGroup {
    #[default]
    None,
    QuaternaryAmine,
    TertiaryAmine,
    Sulfonium,
    SulfonicAcid,
    Sulfate,
    Phosphate,
    Halocarbon,
    Guanidine,
    Acetamidine,
    Carboxylate,
    Imidazole,
    Thiolate,
    Water,
    Backbone,
    TransitionMetal,
    IonicTypeMetal,
    /// Ligand atom able to donate a lone pair to a transition metal.
    DativeBondPartner,
    /// Ligand atom able to pair with an ionic-type metal.
    IonicTypePartner,
    Unknown,
}

/// Features stored as parallel arrays, indexed by feature index.
///
/// Member atoms are kept in one flat array with per-feature offsets.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    types: Vec<FeatureType>,
    groups: Vec<FeatureGroup>,
    centers: Vec<Point3<f64>>,
    offsets: Vec<usize>,
    members: Vec<usize>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Adds a feature over `atoms`; returns its index, or `None` if `atoms` is empty.
    pub fn add(
        &mut self,
        system: &MolecularSystem,
        feature_type: FeatureType,
        group: FeatureGroup,
        atoms: &[usize],
    ) -> Option<usize> {
        let center = centroid(atoms.iter().map(|&a| *system.position(a)))?;
        if self.offsets.is_empty() {
            self.offsets.push(0);
        }
        self.types.push(feature_type);
        self.groups.push(group);
        self.centers.push(center);
        self.members.extend_from_slice(atoms);
        self.offsets.push(self.members.len());
        Some(self.types.len() - 1)
    }

    /// Appends all features of `other`, preserving their order.
    pub fn append(&mut self, other: FeatureSet) {
        for i in 0..other.len() {
            if self.offsets.is_empty() {
                self.offsets.push(0);
            }
            self.types.push(other.types[i]);
            self.groups.push(other.groups[i]);
            self.centers.push(other.centers[i]);
            self.members.extend_from_slice(other.atoms(i));
            self.offsets.push(self.members.len());
        }
    }

    pub fn feature_type(&self, feature: usize) -> FeatureType {
        self.types[feature]
    }

    pub fn group(&self, feature: usize) -> FeatureGroup {
        self.groups[feature]
    }

    pub fn center(&self, feature: usize) -> &Point3<f64> {
        &self.centers[feature]
    }

    pub fn atoms(&self, feature: usize) -> &[usize] {
        &self.members[self.offsets[feature]..self.offsets[feature + 1]]
    }

    /// The atom that stands in for the feature in per-atom checks.
    pub fn first_atom(&self, feature: usize) -> usize {
        self.members[self.offsets[feature]]
    }

    pub fn types(&self) -> &[FeatureType] {
        &self.types
    }

    pub fn centers(&self) -> &[Point3<f64>] {
        &self.centers
    }

    pub fn count_of(&self, feature_type: FeatureType) -> usize {
        self.types.iter().filter(|&&t| t == feature_type).count()
    }

    /// Grid index over the feature centroids.
    pub fn spatial_index(&self) -> SpatialIndex {
        SpatialIndex::new(self.centers.clone())
    }

    /// For every atom, the features it belongs to.
    pub fn atom_feature_map(&self, atom_count: usize) -> Vec<Vec<usize>> {
        let mut map = vec![Vec::new(); atom_count];
        for feature in 0..self.len() {
            for &atom in self.atoms(feature) {
                if let Some(slot) = map.get_mut(atom) {
                    slot.push(feature);
                }
            }
        }
        map
    }

    /// Whether two features share at least one atom.
    pub fn overlaps(&self, a: usize, b: usize) -> bool {
        let other = self.atoms(b);
        self.atoms(a).iter().any(|x| other.contains(x))
    }
}

type Detector = fn(&MolecularSystem, &ValenceModel, &mut FeatureSet);

const DETECTORS: [(&str, Detector); 11] = [
    ("positive_charges", add_positive_charges),
    ("negative_charges", add_negative_charges),
    ("aromatic_rings", add_aromatic_rings),
    ("hydrogen_acceptors", add_hydrogen_acceptors),
    ("hydrogen_donors", add_hydrogen_donors),
    ("weak_hydrogen_donors", add_weak_hydrogen_donors),
    ("metal_binding", add_metal_binding),
    ("metals", add_metals),
    ("hydrophobic", add_hydrophobic_atoms),
    ("halogen_acceptors", add_halogen_acceptors),
    ("halogen_donors", add_halogen_donors),
];

/// Runs every detector in the fixed order and returns the combined features.
#[instrument(skip_all, name = "feature_detection")]
pub fn detect_features(system: &MolecularSystem, valence: &ValenceModel) -> FeatureSet {
    #[cfg(not(feature = "parallel"))]
    let partials: Vec<FeatureSet> = DETECTORS
        .iter()
        .map(|(name, detector)| run_detector(name, *detector, system, valence))
        .collect();

    #[cfg(feature = "parallel")]
    let partials: Vec<FeatureSet> = DETECTORS
        .par_iter()
        .map(|(name, detector)| run_detector(name, *detector, system, valence))
        .collect();

    let mut features = FeatureSet::new();
    for partial in partials {
        features.append(partial);
    }
    info!(features = features.len(), "Feature detection finished.");
    features
}

fn run_detector(
    name: &str,
    detector: Detector,
    system: &MolecularSystem,
    valence: &ValenceModel,
) -> FeatureSet {
    let mut partial = FeatureSet::new();
    detector(system, valence, &mut partial);
    debug!(detector = name, features = partial.len(), "Detector finished.");
    partial
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chemistry::valence::ValenceParams;
    use crate::core::models::chain::ChainType;
    use crate::core::models::element::Element;
    use crate::core::models::topology::BondOrder;
    use crate::testing::SystemBuilder;

    #[test]
    fn empty_atom_sets_are_discarded() {
        let system = MolecularSystem::new();
        let mut set = FeatureSet::new();
        assert_eq!(
            set.add(&system, FeatureType::Metal, FeatureGroup::None, &[]),
            None
        );
        assert!(set.is_empty());
    }

    #[test]
    fn centroid_and_members_are_recorded() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("LIG");
        let a = b.atom(r, "C1", Element::C, [0.0, 0.0, 0.0]);
        let c = b.atom(r, "C2", Element::C, [2.0, 4.0, 0.0]);
        let system = b.build();

        let mut set = FeatureSet::new();
        let f = set
            .add(&system, FeatureType::Hydrophobic, FeatureGroup::None, &[a, c])
            .unwrap();
        assert_eq!(set.center(f), &Point3::new(1.0, 2.0, 0.0));
        assert_eq!(set.atoms(f), &[a, c]);
        assert_eq!(set.first_atom(f), a);
        assert_eq!(set.feature_type(f), FeatureType::Hydrophobic);
    }

    #[test]
    fn append_preserves_order_and_offsets() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("LIG");
        let atoms: Vec<_> = (0..4)
            .map(|i| b.atom(r, &format!("C{i}"), Element::C, [i as f64, 0.0, 0.0]))
            .collect();
        let system = b.build();

        let mut first = FeatureSet::new();
        first.add(&system, FeatureType::Metal, FeatureGroup::None, &atoms[..1]);
        let mut second = FeatureSet::new();
        second.add(&system, FeatureType::AromaticRing, FeatureGroup::None, &atoms[1..]);
        second.add(&system, FeatureType::Hydrophobic, FeatureGroup::None, &atoms[3..]);

        first.append(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.atoms(1), &atoms[1..]);
        assert_eq!(first.atoms(2), &atoms[3..]);
        assert!(first.overlaps(1, 2));
        assert!(!first.overlaps(0, 1));

        let map = first.atom_feature_map(system.atom_count());
        assert_eq!(map[atoms[3]], vec![1, 2]);
    }

    #[test]
    fn detect_features_runs_detectors_in_order() {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let lys = b.residue(chain, 1, "LYS");
        let nz = b.atom(lys, "NZ", Element::N, [0.0, 0.0, 0.0]);
        let ce = b.atom(lys, "CE", Element::C, [1.5, 0.0, 0.0]);
        let cd = b.atom(lys, "CD", Element::C, [2.5, 1.0, 0.0]);
        b.bond(nz, ce, BondOrder::Single);
        b.bond(ce, cd, BondOrder::Single);
        let system = b.build();
        let valence = ValenceModel::compute(&system, &ValenceParams::default());

        let features = detect_features(&system, &valence);
        let types = features.types();
        assert_eq!(types.first(), Some(&FeatureType::PositiveCharge));
        let donor = types
            .iter()
            .position(|&t| t == FeatureType::HydrogenDonor)
            .unwrap();
        let hydrophobic = types
            .iter()
            .position(|&t| t == FeatureType::Hydrophobic)
            .unwrap();
        assert!(donor < hydrophobic);
        assert_eq!(features.count_of(FeatureType::PositiveCharge), 1);
    }
}
