use super::{FeatureGroup, FeatureSet, FeatureType};
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::AtomGeometry;
use crate::core::utils::identifiers;

// Both ring nitrogens, since the tautomer is rarely known.
fn is_histidine_ring_nitrogen(system: &MolecularSystem, atom: usize) -> bool {
    system.element(atom) == Element::N
        && system.residue_name(atom) == "HIS"
        && system.is_ring_atom(atom)
}

fn group_for(system: &MolecularSystem, atom: usize) -> FeatureGroup {
    if system.is_water(atom) {
        FeatureGroup::Water
    } else if system.is_backbone(atom) {
        FeatureGroup::Backbone
    } else {
        FeatureGroup::None
    }
}

fn is_amino_acid_donor(system: &MolecularSystem, atom: usize) -> bool {
    let name = system.atoms()[atom].name.as_str();
    let residue = system.residue_name(atom);
    (name == "N" && residue != "PRO") || identifiers::is_sidechain_donor(residue, name)
}

fn is_amino_acid_acceptor(system: &MolecularSystem, atom: usize) -> bool {
    let name = system.atoms()[atom].name.as_str();
    matches!(name, "O" | "OXT") || identifiers::is_sidechain_acceptor(system.residue_name(atom), name)
}

/// N, O and S atoms carrying hydrogens; standard amino acids use the residue
/// tables so missing hydrogens in polymer input do not matter.
pub fn add_hydrogen_donors(system: &MolecularSystem, valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        let donor = if is_histidine_ring_nitrogen(system, atom) {
            true
        } else if system.is_protein(atom) {
            is_amino_acid_donor(system, atom)
        } else {
            matches!(system.element(atom), Element::N | Element::O | Element::S)
                && valence.total_h[atom] > 0
        };
        if donor {
            features.add(system, FeatureType::HydrogenDonor, group_for(system, atom), &[atom]);
        }
    }
}

/// Nitrogen with a free lone pair: neutral or negative, with fewer substituents
/// than its ideal geometry allows.
fn nitrogen_has_lone_pair(system: &MolecularSystem, valence: &ValenceModel, atom: usize) -> bool {
    if valence.charge[atom] >= 1 {
        return false;
    }
    let total_bonds = system.bond_count(atom) as i32 + valence.implicit_h[atom] as i32;
    match valence.ideal_geometry[atom] {
        AtomGeometry::Tetrahedral => total_bonds < 4,
        AtomGeometry::Trigonal => total_bonds < 3,
        AtomGeometry::Linear => total_bonds < 2,
        _ => false,
    }
}

pub fn add_hydrogen_acceptors(system: &MolecularSystem, valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        let acceptor = if is_histidine_ring_nitrogen(system, atom) {
            true
        } else if system.is_protein(atom) {
            is_amino_acid_acceptor(system, atom)
        } else {
            match system.element(atom) {
                Element::O => true,
                Element::N => nitrogen_has_lone_pair(system, valence, atom),
                Element::S => system.atoms()[atom].formal_charge == Some(-1),
                _ => false,
            }
        };
        if acceptor {
            features.add(system, FeatureType::HydrogenAcceptor, group_for(system, atom), &[atom]);
        }
    }
}

/// The atom lies in a ring with aromatic bonds that also holds N or O.
fn in_aromatic_ring_with_heteroatom(system: &MolecularSystem, atom: usize) -> bool {
    if !system.has_aromatic_bond(atom) {
        return false;
    }
    system
        .residue_of(atom)
        .rings()
        .iter()
        .filter(|ring| ring.contains(&atom))
        .any(|ring| {
            ring.iter()
                .any(|&a| matches!(system.element(a), Element::N | Element::O))
        })
}

/// C-H donors: carbons with hydrogens next to N or O, or in a heteroaromatic ring.
pub fn add_weak_hydrogen_donors(
    system: &MolecularSystem,
    valence: &ValenceModel,
    features: &mut FeatureSet,
) {
    for atom in 0..system.atom_count() {
        if system.element(atom) != Element::C || valence.total_h[atom] <= 0 {
            continue;
        }
        let polarised = system.bond_to_element_count(atom, Element::N) > 0
            || system.bond_to_element_count(atom, Element::O) > 0
            || in_aromatic_ring_with_heteroatom(system, atom);
        if polarised {
            features.add(
                system,
                FeatureType::WeakHydrogenDonor,
                group_for(system, atom),
                &[atom],
            );
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

    fn run(
        system: &MolecularSystem,
        detector: fn(&MolecularSystem, &ValenceModel, &mut FeatureSet),
    ) -> Vec<usize> {
        let valence = ValenceModel::compute(system, &ValenceParams::default());
        let mut features = FeatureSet::new();
        detector(system, &valence, &mut features);
        (0..features.len()).map(|f| features.first_atom(f)).collect()
    }

    fn dipeptide() -> (MolecularSystem, Vec<usize>) {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let ser = b.residue(chain, 1, "SER");
        let n1 = b.atom(ser, "N", Element::N, [0.0, 0.0, 0.0]);
        let ca1 = b.atom(ser, "CA", Element::C, [1.5, 0.0, 0.0]);
        let c1 = b.atom(ser, "C", Element::C, [2.0, 1.4, 0.0]);
        let o1 = b.atom(ser, "O", Element::O, [1.3, 2.4, 0.0]);
        let og = b.atom(ser, "OG", Element::O, [2.0, -1.4, 0.0]);
        let pro = b.residue(chain, 2, "PRO");
        let n2 = b.atom(pro, "N", Element::N, [3.3, 1.6, 0.0]);
        b.bond(n1, ca1, BondOrder::Single);
        b.bond(ca1, c1, BondOrder::Single);
        b.bond(c1, o1, BondOrder::Double);
        b.bond(c1, n2, BondOrder::Single);
        b.bond(ca1, og, BondOrder::Single);
        (b.build(), vec![n1, ca1, c1, o1, og, n2])
    }

    #[test]
    fn amino_acid_donors_follow_the_residue_table() {
        let (system, atoms) = dipeptide();
        let donors = run(&system, add_hydrogen_donors);
        // Backbone N of SER and the SER hydroxyl; proline N is excluded.
        assert_eq!(donors, vec![atoms[0], atoms[4]]);
    }

    #[test]
    fn amino_acid_acceptors_follow_the_residue_table() {
        let (system, atoms) = dipeptide();
        let acceptors = run(&system, add_hydrogen_acceptors);
        assert_eq!(acceptors, vec![atoms[3], atoms[4]]);
    }

    #[test]
    fn histidine_ring_nitrogens_are_donor_and_acceptor() {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let his = b.residue(chain, 1, "HIS");
        let cg = b.atom(his, "CG", Element::C, [0.0, 0.0, 0.0]);
        let nd1 = b.atom(his, "ND1", Element::N, [1.2, 0.6, 0.0]);
        let ce1 = b.atom(his, "CE1", Element::C, [2.2, -0.2, 0.0]);
        let ne2 = b.atom(his, "NE2", Element::N, [1.7, -1.4, 0.0]);
        let cd2 = b.atom(his, "CD2", Element::C, [0.4, -1.3, 0.0]);
        let ring = [cg, nd1, ce1, ne2, cd2];
        for k in 0..5 {
            b.bond(ring[k], ring[(k + 1) % 5], BondOrder::Aromatic);
        }
        b.ring(his, &ring);
        let system = b.build();

        assert_eq!(run(&system, add_hydrogen_donors), vec![nd1, ne2]);
        assert_eq!(run(&system, add_hydrogen_acceptors), vec![nd1, ne2]);
        // Ring carbons next to N are weak donors once hydrogens are assigned.
        let weak = run(&system, add_weak_hydrogen_donors);
        assert!(weak.contains(&ce1));
        assert!(weak.contains(&cd2));
    }

    #[test]
    fn ligand_rules_use_valence_model() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("LIG");
        let c = b.atom(r, "C1", Element::C, [0.0, 0.0, 0.0]);
        let oh = b.atom(r, "O1", Element::O, [1.4, 0.0, 0.0]);
        let n = b.atom(r, "N1", Element::N, [-1.4, 0.0, 0.0]);
        let c2 = b.atom(r, "C2", Element::C, [-2.0, 1.2, 0.0]);
        let c3 = b.atom(r, "C3", Element::C, [-2.0, -1.2, 0.0]);
        let c4 = b.atom(r, "C4", Element::C, [-3.4, 1.2, 0.0]);
        b.bond(c, oh, BondOrder::Single);
        b.bond(c, n, BondOrder::Single);
        b.bond(n, c2, BondOrder::Single);
        b.bond(n, c3, BondOrder::Single);
        b.bond(c2, c4, BondOrder::Single);
        let system = b.build();

        // Tertiary amine gets protonated, so it donates but does not accept.
        let donors = run(&system, add_hydrogen_donors);
        assert_eq!(donors, vec![oh, n]);
        let acceptors = run(&system, add_hydrogen_acceptors);
        assert_eq!(acceptors, vec![oh]);
        let weak = run(&system, add_weak_hydrogen_donors);
        assert_eq!(weak, vec![c, c2, c3]);
        assert!(!weak.contains(&c4));
    }

    #[test]
    fn pyridine_nitrogen_accepts() {
        let mut b = SystemBuilder::new();
        let r = b.ligand("PYR");
        let n = b.atom(r, "N1", Element::N, [0.0, 0.0, 0.0]);
        let c1 = b.atom(r, "C1", Element::C, [1.2, 0.7, 0.0]);
        let c2 = b.atom(r, "C2", Element::C, [-1.2, 0.7, 0.0]);
        b.bond(n, c1, BondOrder::Aromatic);
        b.bond(n, c2, BondOrder::Aromatic);
        let system = b.build();
        assert_eq!(run(&system, add_hydrogen_acceptors), vec![n]);
        assert!(run(&system, add_hydrogen_donors).is_empty());
    }
}
