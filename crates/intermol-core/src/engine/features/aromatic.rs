use super::{FeatureGroup, FeatureSet, FeatureType};
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::AtomGeometry;
use crate::core::utils::identifiers;

fn is_aromatic_ring(
    system: &MolecularSystem,
    valence: &ValenceModel,
    residue_index: usize,
    ring: &[usize],
) -> bool {
    let Some(residue) = system.residue(residue_index) else {
        return false;
    };
    if system.is_amino_acid_residue(residue_index) {
        return identifiers::is_aromatic_amino_acid(&residue.name);
    }
    if system.is_nucleic_residue(residue_index) {
        return ring
            .iter()
            .all(|&a| !identifiers::is_nucleic_backbone_atom(&system.atoms()[a].name));
    }
    ring.iter().all(|&a| system.has_aromatic_bond(a))
        || ring
            .iter()
            .all(|&a| valence.ideal_geometry[a] == AtomGeometry::Trigonal)
}

/// One feature per aromatic ring of every residue, with atoms in ring order.
///
/// Registered rings are used as given; residues without any are searched
/// for 5- and 6-membered rings.
pub fn add_aromatic_rings(system: &MolecularSystem, valence: &ValenceModel, features: &mut FeatureSet) {
    for (residue_index, residue) in system.residues().iter().enumerate() {
        let perceived;
        let rings = if residue.rings().is_empty() {
            perceived = system.find_rings(residue_index);
            perceived.as_slice()
        } else {
            residue.rings()
        };
        for ring in rings {
            if is_aromatic_ring(system, valence, residue_index, ring) {
                features.add(system, FeatureType::AromaticRing, FeatureGroup::None, ring);
            }
        }
    }
}
