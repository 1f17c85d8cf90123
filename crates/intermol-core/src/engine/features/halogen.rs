use super::{FeatureGroup, FeatureSet, FeatureType};
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;

fn is_halogen_bond_donor_element(element: Element) -> bool {
    matches!(element, Element::CL | Element::BR | Element::I | Element::AT)
}

/// Cl, Br, I or At bonded to exactly one carbon. Fluorine never donates.
pub fn add_halogen_donors(system: &MolecularSystem, _valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        if is_halogen_bond_donor_element(system.element(atom))
            && system.bond_to_element_count(atom, Element::C) == 1
        {
            features.add(system, FeatureType::HalogenDonor, FeatureGroup::Halocarbon, &[atom]);
        }
    }
}

/// N, O or S bonded to at least one of C, N, P or S.
pub fn add_halogen_acceptors(system: &MolecularSystem, _valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        if !matches!(system.element(atom), Element::N | Element::O | Element::S) {
            continue;
        }
        let bonded_to_y = system
            .bonded_atoms(atom)
            .any(|a| matches!(system.element(a), Element::C | Element::N | Element::P | Element::S));
        if bonded_to_y {
            features.add(system, FeatureType::HalogenAcceptor, FeatureGroup::None, &[atom]);
        }
    }
}
