use super::{FeatureGroup, FeatureSet, FeatureType};
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;

/// Carbon bonded only to carbon and hydrogen, and fluorine.
pub fn add_hydrophobic_atoms(system: &MolecularSystem, _valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        let hydrophobic = match system.element(atom) {
            Element::C => system
                .bonded_atoms(atom)
                .all(|a| matches!(system.element(a), Element::C | Element::H)),
            Element::F => true,
            _ => false,
        };
        if hydrophobic {
            features.add(system, FeatureType::Hydrophobic, FeatureGroup::None, &[atom]);
        }
    }
}
