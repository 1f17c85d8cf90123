use super::{FeatureGroup, FeatureSet, FeatureType};
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::AtomGeometry;
use crate::core::utils::identifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Binding {
    dative: bool,
    ionic: bool,
}

impl Binding {
    const NONE: Self = Self {
        dative: false,
        ionic: false,
    };
    const DATIVE: Self = Self {
        dative: true,
        ionic: false,
    };
    const BOTH: Self = Self {
        dative: true,
        ionic: true,
    };
}

fn amino_acid_binding(system: &MolecularSystem, atom: usize) -> Binding {
    let residue = system.residue_name(atom);
    match system.element(atom) {
        Element::O if system.is_backbone(atom) => Binding::BOTH,
        Element::O if system.is_sidechain(atom) && identifiers::binds_metal_with_sidechain_oxygen(residue) => {
            Binding::BOTH
        }
        Element::S if residue == "CYS" => Binding::BOTH,
        Element::N if residue == "HIS" && system.is_sidechain(atom) => Binding::DATIVE,
        _ => Binding::NONE,
    }
}

fn nucleotide_binding(system: &MolecularSystem, atom: usize) -> Binding {
    let name = system.atoms()[atom].name.as_str();
    match (system.element(atom), name) {
        (Element::O, _) if system.is_backbone(atom) => Binding::BOTH,
        (_, "N3" | "N4" | "N7") => Binding::DATIVE,
        (_, "O2" | "O4" | "O6") => Binding::BOTH,
        _ => Binding::NONE,
    }
}

/// Local-bonding rules for small molecules and water: any oxygen (water,
/// hydroxyl, carboxylate, phosphoryl, phenolate), thiolate and iron-sulfur
/// sulfur, halide ions, and imidazole/pyrrole-type nitrogen.
fn ligand_binding(system: &MolecularSystem, valence: &ValenceModel, atom: usize) -> Binding {
    let element = system.element(atom);
    match element {
        Element::O => Binding::BOTH,
        Element::S => {
            let degree = system.bond_count(atom);
            let cluster = degree > 0 && system.bonded_atoms(atom).all(|a| system.element(a) == Element::FE);
            if degree <= 1 || cluster {
                Binding::BOTH
            } else {
                Binding::NONE
            }
        }
        e if e.is_halogen() && system.bond_count(atom) == 0 => Binding::BOTH,
        Element::N => {
            let ring_n = system.is_ring_atom(atom) && valence.ideal_geometry[atom] == AtomGeometry::Trigonal;
            if ring_n || system.bond_to_element_count(atom, Element::C) == 2 {
                Binding::DATIVE
            } else {
                Binding::NONE
            }
        }
        _ => Binding::NONE,
    }
}

/// Atoms able to coordinate a metal. An atom may yield two features: one for
/// dative bonds to transition metals and one for ionic-type pairing.
pub fn add_metal_binding(system: &MolecularSystem, valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        let binding = if system.is_protein(atom) {
            amino_acid_binding(system, atom)
        } else if system.is_nucleic(atom) {
            nucleotide_binding(system, atom)
        } else {
            ligand_binding(system, valence, atom)
        };
        if binding.dative {
            features.add(
                system,
                FeatureType::MetalBinding,
                FeatureGroup::DativeBondPartner,
                &[atom],
            );
        }
        if binding.ionic {
            features.add(
                system,
                FeatureType::MetalBinding,
                FeatureGroup::IonicTypePartner,
                &[atom],
            );
        }
    }
}

/// Metal group used for coordination compatibility, or `None` for non-metals.
pub(crate) fn metal_group(element: Element) -> Option<FeatureGroup> {
    if element.is_transition_metal() || element == Element::ZN || element == Element::CD {
        Some(FeatureGroup::TransitionMetal)
    } else if element.is_ionic_type_metal() {
        Some(FeatureGroup::IonicTypeMetal)
    } else {
        None
    }
}

pub fn add_metals(system: &MolecularSystem, _valence: &ValenceModel, features: &mut FeatureSet) {
    for atom in 0..system.atom_count() {
        if let Some(group) = metal_group(system.element(atom)) {
            features.add(system, FeatureType::Metal, group, &[atom]);
        }
    }
}
