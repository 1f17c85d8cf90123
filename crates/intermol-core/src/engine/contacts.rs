use super::features::{FeatureSet, FeatureType};
use crate::core::models::system::MolecularSystem;
use crate::core::spatial::SpatialIndex;
use crate::core::utils::adjacency::AdjacencyList;
use crate::core::utils::bitset::BitSet;
use nalgebra::Point3;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum ContactType {
    /// Salt bridge between opposite charges.
    IonicInteraction,
    CationPi,
    PiStacking,
    HydrogenBond,
    WeakHydrogenBond,
    WaterHydrogenBond,
    BackboneHydrogenBond,
    HalogenBond,
    Hydrophobic,
    MetalCoordination,
}

impl ContactType {
    pub const ALL: [ContactType; 10] = [
        Self::IonicInteraction,
        Self::CationPi,
        Self::PiStacking,
        Self::HydrogenBond,
        Self::WeakHydrogenBond,
        Self::WaterHydrogenBond,
        Self::BackboneHydrogenBond,
        Self::HalogenBond,
        Self::Hydrophobic,
        Self::MetalCoordination,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::IonicInteraction => "salt bridge",
            Self::CationPi => "cation-pi interaction",
            Self::PiStacking => "pi-pi stacking",
            Self::HydrogenBond => "hydrogen bond",
            Self::WeakHydrogenBond => "weak hydrogen bond",
            Self::WaterHydrogenBond => "water hydrogen bond",
            Self::BackboneHydrogenBond => "backbone hydrogen bond",
            Self::HalogenBond => "halogen bond",
            Self::Hydrophobic => "hydrophobic contact",
            Self::MetalCoordination => "metal complexation",
        }
    }

    /// Display colour as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        match self {
            Self::HydrogenBond | Self::WaterHydrogenBond | Self::BackboneHydrogenBond => 0x2B83BA,
            Self::Hydrophobic => 0x808080,
            Self::HalogenBond => 0x40FFBF,
            Self::IonicInteraction => 0xF0C814,
            Self::MetalCoordination => 0x8C4099,
            Self::CationPi => 0xFF8000,
            Self::PiStacking => 0x8CB366,
            Self::WeakHydrogenBond => 0xC5DDEC,
        }
    }

    pub fn is_hydrogen_bond(self) -> bool {
        matches!(
            self,
            Self::HydrogenBond
                | Self::WeakHydrogenBond
                | Self::WaterHydrogenBond
                | Self::BackboneHydrogenBond
        )
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Append-only columnar store of detected contacts.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    index1: Vec<usize>,
    index2: Vec<usize>,
    types: Vec<ContactType>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, feature1: usize, feature2: usize, contact_type: ContactType) -> usize {
        self.index1.push(feature1);
        self.index2.push(feature2);
        self.types.push(contact_type);
        self.types.len() - 1
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn index1(&self) -> &[usize] {
        &self.index1
    }

    pub fn index2(&self) -> &[usize] {
        &self.index2
    }

    pub fn types(&self) -> &[ContactType] {
        &self.types
    }

    pub fn get(&self, contact: usize) -> (usize, usize, ContactType) {
        (self.index1[contact], self.index2[contact], self.types[contact])
    }
}

/// Whether two atoms must not form a contact: different models, the same
/// residue, or conflicting alternate locations.
///
/// A pair where exactly one atom belongs to `master_model` is always allowed,
/// so a reference model can be compared against the others.
pub fn invalid_atom_contact(
    system: &MolecularSystem,
    atom1: usize,
    atom2: usize,
    master_model: Option<usize>,
) -> bool {
    let model1 = system.model_of(atom1);
    let model2 = system.model_of(atom2);
    if let Some(master) = master_model {
        if (model1 == master) != (model2 == master) {
            return false;
        }
    }
    let a1 = &system.atoms()[atom1];
    let a2 = &system.atoms()[atom2];
    model1 != model2
        || a1.residue_index == a2.residue_index
        || matches!((a1.altloc, a2.altloc), (Some(x), Some(y)) if x != y)
}

/// Detection state: features, the grid over their centroids, the contacts
/// found so far and the features that take part in at least one contact.
#[derive(Debug, Clone)]
pub struct Contacts {
    pub features: FeatureSet,
    pub spatial_index: SpatialIndex,
    pub store: ContactStore,
    pub feature_set: BitSet,
}

impl Contacts {
    pub fn new(features: FeatureSet) -> Self {
        let spatial_index = features.spatial_index();
        let feature_set = BitSet::new(features.len(), false);
        Self {
            features,
            spatial_index,
            store: ContactStore::new(),
            feature_set,
        }
    }

    pub fn add(&mut self, feature1: usize, feature2: usize, contact_type: ContactType) {
        self.feature_set.set(feature1);
        self.feature_set.set(feature2);
        self.store.add(feature1, feature2, contact_type);
    }

    /// Visits every unordered pair `(i, j)`, `j > i`, whose centroids lie
    /// within `radius` and whose types satisfy `pairs_with` (checked in pair
    /// order, so it should accept both orientations). `visit` gets the squared
    /// distance and may add contacts.
    ///
    /// Only the neighbours of one feature are buffered at a time, and features
    /// whose type never pairs are not queried at all.
    pub fn each_pair(
        &mut self,
        radius: f64,
        pairs_with: impl Fn(FeatureType, FeatureType) -> bool,
        mut visit: impl FnMut(&mut Self, usize, usize, f64),
    ) {
        let active = FeatureType::ALL.map(|t| FeatureType::ALL.iter().any(|&u| pairs_with(t, u)));
        let mut neighbors: Vec<(usize, f64)> = Vec::new();

        for i in 0..self.features.len() {
            let ti = self.features.feature_type(i);
            if !active[ti as usize] {
                continue;
            }
            let features = &self.features;
            self.spatial_index
                .each_within(features.center(i), radius, |j, d_sq| {
                    if j > i && pairs_with(ti, features.feature_type(j)) {
                        neighbors.push((j, d_sq));
                    }
                });
            for (j, d_sq) in neighbors.drain(..) {
                visit(self, i, j, d_sq);
            }
        }
    }

    pub fn freeze(self) -> FrozenContacts {
        let adjacency = AdjacencyList::new(
            self.features.len(),
            self.store.index1(),
            self.store.index2(),
        );
        let contact_set = BitSet::new(self.store.len(), true);
        FrozenContacts {
            features: self.features,
            spatial_index: self.spatial_index,
            store: self.store,
            feature_set: self.feature_set,
            contact_set,
            adjacency,
        }
    }
}

/// Final result: the contact store plus the survival mask left by refinement.
#[derive(Debug, Clone)]
pub struct FrozenContacts {
    pub features: FeatureSet,
    pub spatial_index: SpatialIndex,
    pub store: ContactStore,
    pub feature_set: BitSet,
    pub contact_set: BitSet,
    pub adjacency: AdjacencyList,
}

/// Read-only view of one contact.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactView<'a> {
    pub index: usize,
    pub contact_type: ContactType,
    pub feature1: usize,
    pub feature2: usize,
    pub type1: FeatureType,
    pub type2: FeatureType,
    pub center1: Point3<f64>,
    pub center2: Point3<f64>,
    pub atoms1: &'a [usize],
    pub atoms2: &'a [usize],
}

impl ContactView<'_> {
    pub fn distance(&self) -> f64 {
        (self.center1 - self.center2).norm()
    }
}

impl FrozenContacts {
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contact(&self, index: usize) -> ContactView<'_> {
        let (feature1, feature2, contact_type) = self.store.get(index);
        ContactView {
            index,
            contact_type,
            feature1,
            feature2,
            type1: self.features.feature_type(feature1),
            type2: self.features.feature_type(feature2),
            center1: *self.features.center(feature1),
            center2: *self.features.center(feature2),
            atoms1: self.features.atoms(feature1),
            atoms2: self.features.atoms(feature2),
        }
    }

    /// Contacts still set in the survival mask, in store order.
    pub fn surviving(&self) -> impl Iterator<Item = ContactView<'_>> + '_ {
        self.contact_set.iter().map(|i| self.contact(i))
    }

    pub fn surviving_count(&self) -> usize {
        self.contact_set.size()
    }

    pub fn count_of(&self, contact_type: ContactType) -> usize {
        self.contact_set
            .iter()
            .filter(|&i| self.store.types()[i] == contact_type)
            .count()
    }

    /// Rebuilds `feature_set` from the surviving contacts.
    pub fn recompute_feature_set(&mut self) {
        let mut feature_set = BitSet::new(self.features.len(), false);
        for i in self.contact_set.iter() {
            let (f1, f2, _) = self.store.get(i);
            feature_set.set(f1);
            feature_set.set(f2);
        }
        self.feature_set = feature_set;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::element::Element;
    use crate::engine::features::FeatureGroup;
    use crate::testing::SystemBuilder;

    #[test]
    fn same_residue_and_cross_model_pairs_are_invalid() {
        let mut b = SystemBuilder::new();
        let a = b.chain('A', ChainType::Protein);
        let r1 = b.residue(a, 1, "ALA");
        let r2 = b.residue(a, 2, "ALA");
        let x = b.atom(r1, "CB", Element::C, [0.0; 3]);
        let y = b.atom(r1, "CA", Element::C, [1.0, 0.0, 0.0]);
        let z = b.atom(r2, "CB", Element::C, [2.0, 0.0, 0.0]);
        let m1 = b.chain_in_model(1, 'A', ChainType::Protein);
        let r3 = b.residue(m1, 1, "ALA");
        let w = b.atom(r3, "CB", Element::C, [3.0, 0.0, 0.0]);
        let system = b.build();

        assert!(invalid_atom_contact(&system, x, y, None));
        assert!(!invalid_atom_contact(&system, x, z, None));
        assert!(invalid_atom_contact(&system, x, w, None));
        // Exactly one atom in the master model: allowed.
        assert!(!invalid_atom_contact(&system, x, w, Some(0)));
        assert!(!invalid_atom_contact(&system, x, w, Some(1)));
        // Neither in the master model: regular rules apply.
        assert!(invalid_atom_contact(&system, x, w, Some(5)));
        // Both in the master model, same residue: still invalid.
        assert!(invalid_atom_contact(&system, x, y, Some(0)));
    }

    #[test]
    fn conflicting_altlocs_are_invalid() {
        let mut b = SystemBuilder::new();
        let a = b.chain('A', ChainType::Protein);
        let r1 = b.residue(a, 1, "SER");
        let r2 = b.residue(a, 2, "SER");
        let p = b.push(r1, Atom::new("OG", Element::O, Point3::origin()).with_altloc('A'));
        let q = b.push(r2, Atom::new("OG", Element::O, Point3::origin()).with_altloc('B'));
        let s = b.push(r2, Atom::new("OG", Element::O, Point3::origin()).with_altloc('A'));
        let t = b.atom(r2, "CB", Element::C, [0.0; 3]);
        let system = b.build();

        assert!(invalid_atom_contact(&system, p, q, None));
        assert!(!invalid_atom_contact(&system, p, s, None));
        assert!(!invalid_atom_contact(&system, p, t, None));
    }

    #[test]
    fn each_pair_only_visits_accepted_type_pairs() {
        let mut b = SystemBuilder::new();
        let atoms: Vec<_> = (0..4)
            .map(|i| {
                let r = b.ligand(&format!("L{i}"));
                b.atom(r, "X", Element::C, [i as f64, 0.0, 0.0])
            })
            .collect();
        let system = b.build();
        let mut features = FeatureSet::new();
        let kinds = [
            FeatureType::Metal,
            FeatureType::Hydrophobic,
            FeatureType::Metal,
            FeatureType::MetalBinding,
        ];
        for (&a, &kind) in atoms.iter().zip(&kinds) {
            features.add(&system, kind, FeatureGroup::None, &[a]);
        }

        let mut contacts = Contacts::new(features);
        let mut pairs = Vec::new();
        contacts.each_pair(
            10.0,
            |ti, tj| {
                matches!(
                    (ti, tj),
                    (FeatureType::Metal, FeatureType::MetalBinding)
                        | (FeatureType::MetalBinding, FeatureType::Metal)
                )
            },
            |_, i, j, d_sq| pairs.push((i, j, d_sq)),
        );
        assert_eq!(pairs, vec![(0, 3, 9.0), (2, 3, 1.0)]);
    }

    #[test]
    fn freeze_builds_adjacency_and_full_mask() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("LIG");
        let atoms: Vec<_> = (0..3)
            .map(|i| b.atom(r, &format!("C{i}"), Element::C, [i as f64 * 3.0, 0.0, 0.0]))
            .collect();
        let system = b.build();
        let mut features = FeatureSet::new();
        for &a in &atoms {
            features.add(&system, FeatureType::Hydrophobic, FeatureGroup::None, &[a]);
        }

        let mut contacts = Contacts::new(features);
        let mut pairs = Vec::new();
        contacts.each_pair(
            3.5,
            |_, _| true,
            |contacts, i, j, d_sq| {
                pairs.push((i, j, d_sq));
                contacts.add(i, j, ContactType::Hydrophobic);
            },
        );
        assert_eq!(pairs, vec![(0, 1, 9.0), (1, 2, 9.0)]);
        assert_eq!(contacts.feature_set.to_vec(), vec![0, 1, 2]);

        let mut frozen = contacts.freeze();
        assert_eq!(frozen.surviving_count(), 2);
        assert_eq!(frozen.adjacency.degree(1), 2);
        let view = frozen.contact(1);
        assert_eq!((view.feature1, view.feature2), (1, 2));
        assert!((view.distance() - 3.0).abs() < 1e-12);

        frozen.contact_set.clear(0);
        frozen.recompute_feature_set();
        assert_eq!(frozen.feature_set.to_vec(), vec![1, 2]);
        assert_eq!(frozen.count_of(ContactType::Hydrophobic), 1);
    }

    #[test]
    fn names_and_colors_match_the_palette() {
        assert_eq!(ContactType::IonicInteraction.name(), "salt bridge");
        assert_eq!(ContactType::IonicInteraction.color(), 0xF0C814);
        assert_eq!(ContactType::WaterHydrogenBond.color(), ContactType::HydrogenBond.color());
        assert!(ContactType::BackboneHydrogenBond.is_hydrogen_bond());
        assert!(!ContactType::HalogenBond.is_hydrogen_bond());
        assert_eq!(ContactType::ALL.len(), 10);
    }
}
