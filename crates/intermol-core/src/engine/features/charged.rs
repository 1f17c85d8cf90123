use super::{FeatureGroup, FeatureSet, FeatureType};
use crate::core::chemistry::functional_groups::{FunctionalGroupKind, find_functional_groups};
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::identifiers;
use std::collections::HashSet;

fn group_of(kind: FunctionalGroupKind) -> FeatureGroup {
    match kind {
        FunctionalGroupKind::Guanidine => FeatureGroup::Guanidine,
        FunctionalGroupKind::Acetamidine => FeatureGroup::Acetamidine,
        FunctionalGroupKind::Carboxylate => FeatureGroup::Carboxylate,
        FunctionalGroupKind::Phosphate => FeatureGroup::Phosphate,
        FunctionalGroupKind::Sulfate => FeatureGroup::Sulfate,
        FunctionalGroupKind::SulfonicAcid => FeatureGroup::SulfonicAcid,
    }
}

fn is_small_molecule(system: &MolecularSystem, residue_index: usize) -> bool {
    !system.is_amino_acid_residue(residue_index) && !system.is_nucleic_residue(residue_index)
}

/// Adds the charged groups of one small-molecule residue with the requested
/// sign, then every remaining atom whose valence charge has that sign.
fn add_small_molecule_charges(
    system: &MolecularSystem,
    valence: &ValenceModel,
    features: &mut FeatureSet,
    residue_index: usize,
    positive: bool,
) {
    let feature_type = if positive {
        FeatureType::PositiveCharge
    } else {
        FeatureType::NegativeCharge
    };

    let mut consumed: HashSet<usize> = HashSet::new();
    for group in find_functional_groups(system, residue_index) {
        if group.kind.is_positive() != positive {
            continue;
        }
        if group.atoms.iter().any(|a| consumed.contains(a)) {
            continue;
        }
        consumed.insert(group.center);
        consumed.extend(group.atoms.iter().copied());
        features.add(system, feature_type, group_of(group.kind), &group.atoms);
    }

    let Some(residue) = system.residue(residue_index) else {
        return;
    };
    for &atom in residue.atoms() {
        if consumed.contains(&atom) {
            continue;
        }
        let charge = valence.charge[atom];
        let matches_sign = if positive { charge > 0 } else { charge < 0 };
        if !matches_sign {
            continue;
        }
        let group = match system.element(atom) {
            Element::N if positive && system.bond_count(atom) == 4 => FeatureGroup::QuaternaryAmine,
            Element::N if positive => FeatureGroup::TertiaryAmine,
            Element::S if positive => FeatureGroup::Sulfonium,
            Element::S => FeatureGroup::Thiolate,
            _ => FeatureGroup::Unknown,
        };
        features.add(system, feature_type, group, &[atom]);
    }
}

/// ARG, HIS and LYS contribute one feature over their sidechain nitrogens;
/// small molecules contribute cationic groups and positively charged atoms.
pub fn add_positive_charges(system: &MolecularSystem, valence: &ValenceModel, features: &mut FeatureSet) {
    for (residue_index, residue) in system.residues().iter().enumerate() {
        if identifiers::is_positive_residue(&residue.name) {
            let atoms: Vec<usize> = residue
                .atoms()
                .iter()
                .copied()
                .filter(|&a| system.element(a) == Element::N && system.is_sidechain(a))
                .collect();
            let group = match residue.name.as_str() {
                "ARG" => FeatureGroup::Guanidine,
                "HIS" => FeatureGroup::Imidazole,
                _ => FeatureGroup::None,
            };
            features.add(system, FeatureType::PositiveCharge, group, &atoms);
        } else if is_small_molecule(system, residue_index) {
            add_small_molecule_charges(system, valence, features, residue_index, true);
        }
    }
}

/// GLU and ASP contribute one feature over their sidechain oxygens; small
/// molecules contribute anionic groups and negatively charged atoms.
pub fn add_negative_charges(system: &MolecularSystem, valence: &ValenceModel, features: &mut FeatureSet) {
    for (residue_index, residue) in system.residues().iter().enumerate() {
        if identifiers::is_negative_residue(&residue.name) {
            let atoms: Vec<usize> = residue
                .atoms()
                .iter()
                .copied()
                .filter(|&a| system.element(a) == Element::O && system.is_sidechain(a))
                .collect();
            features.add(
                system,
                FeatureType::NegativeCharge,
                FeatureGroup::Carboxylate,
                &atoms,
            );
        } else if is_small_molecule(system, residue_index) {
            add_small_molecule_charges(system, valence, features, residue_index, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chemistry::valence::ValenceParams;
    use crate::core::models::chain::ChainType;
    use crate::core::models::topology::BondOrder;
    use crate::testing::SystemBuilder;

    fn detect(system: &MolecularSystem) -> (FeatureSet, FeatureSet) {
        let valence = ValenceModel::compute(system, &ValenceParams::default());
        let mut positive = FeatureSet::new();
        add_positive_charges(system, &valence, &mut positive);
        let mut negative = FeatureSet::new();
        add_negative_charges(system, &valence, &mut negative);
        (positive, negative)
    }

    #[test]
    fn lysine_and_glutamate_give_one_feature_each() {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let lys = b.residue(chain, 1, "LYS");
        b.atom(lys, "CA", Element::C, [0.0, 0.0, 0.0]);
        let nz = b.atom(lys, "NZ", Element::N, [5.0, 0.0, 0.0]);
        let glu = b.residue(chain, 2, "GLU");
        b.atom(glu, "O", Element::O, [0.0, 3.0, 0.0]);
        let oe1 = b.atom(glu, "OE1", Element::O, [8.0, 0.0, 0.0]);
        let oe2 = b.atom(glu, "OE2", Element::O, [8.0, 2.0, 0.0]);
        let system = b.build();

        let (positive, negative) = detect(&system);
        assert_eq!(positive.len(), 1);
        assert_eq!(positive.atoms(0), &[nz]);
        assert_eq!(negative.len(), 1);
        assert_eq!(negative.atoms(0), &[oe1, oe2]);
        assert_eq!(negative.group(0), FeatureGroup::Carboxylate);
    }

    #[test]
    fn neutral_amino_acids_and_nucleotides_are_skipped() {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let ser = b.residue(chain, 1, "SER");
        b.atom(ser, "OG", Element::O, [0.0, 0.0, 0.0]);
        let dna = b.chain('B', ChainType::DNA);
        let da = b.residue(dna, 1, "DA");
        let p = b.atom(da, "P", Element::P, [3.0, 0.0, 0.0]);
        let op1 = b.atom(da, "OP1", Element::O, [4.0, 0.0, 0.0]);
        b.bond(p, op1, BondOrder::Single);
        let system = b.build();

        let (positive, negative) = detect(&system);
        assert!(positive.is_empty());
        assert!(negative.is_empty());
    }

    #[test]
    fn ligand_carboxylate_is_one_group_feature() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("ACT");
        let ch3 = b.atom(r, "C2", Element::C, [0.0, 0.0, 0.0]);
        let c = b.atom(r, "C1", Element::C, [1.5, 0.0, 0.0]);
        let o1 = b.atom(r, "O1", Element::O, [2.2, 1.1, 0.0]);
        let o2 = b.atom(r, "O2", Element::O, [2.2, -1.1, 0.0]);
        b.bond(ch3, c, BondOrder::Single);
        b.bond(c, o1, BondOrder::Double);
        b.bond(c, o2, BondOrder::Single);
        let system = b.build();

        let (positive, negative) = detect(&system);
        assert!(positive.is_empty());
        // The charged O2 is consumed by the group and not added again.
        assert_eq!(negative.len(), 1);
        assert_eq!(negative.group(0), FeatureGroup::Carboxylate);
        assert_eq!(negative.atoms(0), &[o1, o2]);
    }

    #[test]
    fn ligand_amine_becomes_single_atom_feature() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("MAM");
        let c = b.atom(r, "C1", Element::C, [0.0, 0.0, 0.0]);
        let n = b.atom(r, "N1", Element::N, [1.5, 0.0, 0.0]);
        b.bond(c, n, BondOrder::Single);
        let system = b.build();

        let (positive, _) = detect(&system);
        assert_eq!(positive.len(), 1);
        assert_eq!(positive.atoms(0), &[n]);
        assert_eq!(positive.group(0), FeatureGroup::TertiaryAmine);
    }
}
