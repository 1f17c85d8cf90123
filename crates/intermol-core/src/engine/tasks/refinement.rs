use crate::core::models::system::MolecularSystem;
use crate::core::spatial::SpatialIndex;
use crate::engine::config::ContactParams;
use crate::engine::contacts::{ContactType, FrozenContacts, invalid_atom_contact};
use nalgebra::{Point3, center};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Contacts cleared by each refinement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefinementStats {
    pub line_of_sight: usize,
    pub hydrophobic: usize,
    pub salt_bridge: usize,
    pub pi_stacking: usize,
    pub metal: usize,
}

impl RefinementStats {
    pub fn total(&self) -> usize {
        self.line_of_sight + self.hydrophobic + self.salt_bridge + self.pi_stacking + self.metal
    }
}

/// Clears contacts that are occluded or explained by a stronger contact.
///
/// Passes only ever clear bits of `contact_set`, so running `refine` twice
/// yields the same survivors as running it once.
#[instrument(skip_all, name = "refinement")]
pub fn refine(system: &MolecularSystem, contacts: &mut FrozenContacts, params: &ContactParams) -> RefinementStats {
    let before = contacts.surviving_count();

    let line_of_sight = line_of_sight(system, contacts, params);
    debug!(cleared = line_of_sight, "Line-of-sight pass finished.");

    let hydrophobic = closest_hydrophobic(system, contacts);
    debug!(cleared = hydrophobic, "Hydrophobic pass finished.");

    let atom_features = contacts.features.atom_feature_map(system.atom_count());
    let salt_bridge = suppress(
        contacts,
        &atom_features,
        ContactType::is_hydrogen_bond,
        ContactType::IonicInteraction,
    );
    debug!(cleared = salt_bridge, "Salt-bridge pass finished.");

    let pi_stacking = suppress(
        contacts,
        &atom_features,
        |t| matches!(t, ContactType::Hydrophobic | ContactType::CationPi),
        ContactType::PiStacking,
    );
    debug!(cleared = pi_stacking, "Pi-stacking pass finished.");

    let metal = suppress(
        contacts,
        &atom_features,
        |t| t == ContactType::IonicInteraction,
        ContactType::MetalCoordination,
    );
    debug!(cleared = metal, "Metal pass finished.");

    let stats = RefinementStats {
        line_of_sight,
        hydrophobic,
        salt_bridge,
        pi_stacking,
        metal,
    };
    info!(
        before,
        after = contacts.surviving_count(),
        cleared = stats.total(),
        "Refinement finished."
    );
    stats
}

/// Clears contacts with a heavy atom sitting between the two features.
///
/// An atom within half the contact distance of the midpoint occludes unless
/// it is a hydrogen, belongs to either feature, cannot form a contact with
/// either endpoint, or lies within its (scaled) van der Waals radius of
/// either feature center.
pub(crate) fn line_of_sight(system: &MolecularSystem, contacts: &mut FrozenContacts, params: &ContactParams) -> usize {
    let atom_index = SpatialIndex::new(system.atoms().iter().map(|a| a.position).collect());
    let factor = params.line_of_sight_dist_factor;

    let occluded: Vec<usize> = contacts
        .surviving()
        .filter(|view| {
            let (c1, c2) = (view.center1, view.center2);
            let (a1, a2) = (view.atoms1[0], view.atoms2[0]);
            let mid: Point3<f64> = center(&c1, &c2);
            let radius = view.distance() / 2.0;
            atom_index.within(&mid, radius).into_iter().any(|k| {
                let atom = &system.atoms()[k];
                if atom.is_hydrogen() || view.atoms1.contains(&k) || view.atoms2.contains(&k) {
                    return false;
                }
                if invalid_atom_contact(system, k, a1, params.master_model_index)
                    || invalid_atom_contact(system, k, a2, params.master_model_index)
                {
                    return false;
                }
                let vdw_sq = (atom.element.vdw_radius() * factor).powi(2);
                (atom.position - c1).norm_squared() > vdw_sq && (atom.position - c2).norm_squared() > vdw_sq
            })
        })
        .map(|view| view.index)
        .collect();

    for &contact in &occluded {
        contacts.contact_set.clear(contact);
    }
    occluded.len()
}

/// Keeps, for every atom and every other residue, only the closest
/// hydrophobic contact between them. Ties keep the earlier contact.
pub(crate) fn closest_hydrophobic(system: &MolecularSystem, contacts: &mut FrozenContacts) -> usize {
    let mut closest: HashMap<(usize, usize), (f64, usize)> = HashMap::new();
    let mut cleared = Vec::new();

    let candidates: Vec<(usize, usize, usize, f64)> = contacts
        .surviving()
        .filter(|view| view.contact_type == ContactType::Hydrophobic)
        .map(|view| (view.index, view.atoms1[0], view.atoms2[0], view.distance()))
        .collect();

    for (contact, a1, a2, distance) in candidates {
        let keys = [
            (a1, system.atoms()[a2].residue_index),
            (a2, system.atoms()[a1].residue_index),
        ];
        for key in keys {
            match closest.get(&key) {
                Some(&(best, _)) if distance >= best => cleared.push(contact),
                Some(&(_, previous)) => {
                    cleared.push(previous);
                    closest.insert(key, (distance, contact));
                }
                None => {
                    closest.insert(key, (distance, contact));
                }
            }
        }
    }

    let mut count = 0;
    for contact in cleared {
        if contacts.contact_set.get(contact) {
            contacts.contact_set.clear(contact);
            count += 1;
        }
    }
    count
}

/// Clears surviving contacts matching `target` whose two features each share
/// an atom with the two features of a surviving `by` contact, in either
/// orientation.
pub(crate) fn suppress(
    contacts: &mut FrozenContacts,
    atom_features: &[Vec<usize>],
    target: impl Fn(ContactType) -> bool,
    by: ContactType,
) -> usize {
    let features = &contacts.features;
    let types = contacts.store.types();

    let explained = |f1: usize, f2: usize| {
        features.atoms(f1).iter().any(|&atom| {
            atom_features[atom].iter().any(|&g1| {
                contacts
                    .adjacency
                    .neighbors(g1)
                    .any(|(g2, edge)| types[edge] == by && contacts.contact_set.get(edge) && features.overlaps(f2, g2))
            })
        })
    };

    let suppressed: Vec<usize> = contacts
        .contact_set
        .iter()
        .filter(|&i| target(types[i]))
        .filter(|&i| {
            let (f1, f2, _) = contacts.store.get(i);
            explained(f1, f2)
        })
        .collect();

    for &contact in &suppressed {
        contacts.contact_set.clear(contact);
    }
    suppressed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;
    use crate::core::models::element::Element;
    use crate::engine::contacts::Contacts;
    use crate::engine::features::{FeatureGroup, FeatureSet, FeatureType};
    use crate::engine::tasks::{charged, hydrogen_bonds, hydrophobic};
    use crate::testing::{SystemBuilder, run_tasks};

    fn surviving_types(contacts: &FrozenContacts) -> Vec<ContactType> {
        contacts.surviving().map(|v| v.contact_type).collect()
    }

    fn carbons(positions: &[[f64; 3]]) -> SystemBuilder {
        let mut b = SystemBuilder::new();
        for (k, xyz) in positions.iter().enumerate() {
            let r = b.ligand(&format!("L{k}"));
            b.atom(r, "C1", Element::C, *xyz);
        }
        b
    }

    #[test]
    fn atom_between_features_blocks_the_contact() {
        let mut b = carbons(&[[0.0, 0.0, 0.0], [3.8, 0.0, 0.0]]);
        let blocker = b.ligand("BLK");
        b.atom(blocker, "O1", Element::O, [1.9, 0.0, 0.0]);
        let system = b.build();
        let params = ContactParams::default();

        let mut frozen = run_tasks(&system, &params, &[hydrophobic::run]).freeze();
        assert_eq!(frozen.surviving_count(), 1);
        assert_eq!(line_of_sight(&system, &mut frozen, &params), 1);
        assert_eq!(frozen.surviving_count(), 0);
    }

    #[test]
    fn hydrogens_and_atoms_near_a_center_do_not_block() {
        let mut b = carbons(&[[0.0, 0.0, 0.0], [3.8, 0.0, 0.0]]);
        let other = b.ligand("BLK");
        b.atom(other, "H1", Element::H, [1.9, 0.0, 0.0]);
        // Inside the van der Waals sphere (1.52 Å) of the second center.
        b.atom(other, "O1", Element::O, [2.5, 0.3, 0.0]);
        let system = b.build();
        let params = ContactParams::default();

        let mut frozen = run_tasks(&system, &params, &[hydrophobic::run]).freeze();
        assert_eq!(line_of_sight(&system, &mut frozen, &params), 0);
        assert_eq!(frozen.surviving_count(), 1);
    }

    #[test]
    fn only_the_closest_hydrophobic_contact_per_residue_survives() {
        let mut b = SystemBuilder::new();
        let r1 = b.ligand("LG1");
        let a = b.atom(r1, "C1", Element::C, [0.0, 0.0, 0.0]);
        let r2 = b.ligand("LG2");
        let near = b.atom(r2, "C1", Element::C, [3.0, 0.0, 0.0]);
        b.atom(r2, "C2", Element::C, [0.0, 3.8, 0.0]);
        let system = b.build();
        let params = ContactParams::default();

        let mut frozen = run_tasks(&system, &params, &[hydrophobic::run]).freeze();
        assert_eq!(frozen.surviving_count(), 2);
        assert_eq!(closest_hydrophobic(&system, &mut frozen), 1);
        let survivor = frozen.surviving().next().unwrap();
        assert_eq!((survivor.atoms1[0], survivor.atoms2[0]), (a, near));
    }

    #[test]
    fn salt_bridge_suppresses_the_parallel_hydrogen_bond() {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let lys = b.residue(chain, 1, "LYS");
        b.atom(lys, "NZ", Element::N, [0.0, 0.0, 0.0]);
        let asp = b.residue(chain, 2, "ASP");
        b.atom(asp, "OD1", Element::O, [2.9, 0.0, 0.0]);
        let system = b.build();
        let params = ContactParams::default();

        let mut frozen = run_tasks(&system, &params, &[charged::run, hydrogen_bonds::run]).freeze();
        assert_eq!(
            surviving_types(&frozen),
            vec![ContactType::IonicInteraction, ContactType::HydrogenBond]
        );
        let stats = refine(&system, &mut frozen, &params);
        assert_eq!(stats.salt_bridge, 1);
        assert_eq!(surviving_types(&frozen), vec![ContactType::IonicInteraction]);
    }

    /// Two three-atom rings, one per residue, with a single-atom feature on
    /// the first atom of each ring and an unrelated atom in a third residue.
    fn ring_fixture() -> (MolecularSystem, FeatureSet) {
        let mut b = SystemBuilder::new();
        let r1 = b.ligand("RG1");
        let r2 = b.ligand("RG2");
        let r3 = b.ligand("OTH");
        let ring1: Vec<usize> = (0..3)
            .map(|k| b.atom(r1, &format!("C{k}"), Element::C, [k as f64, 0.0, 0.0]))
            .collect();
        let ring2: Vec<usize> = (0..3)
            .map(|k| b.atom(r2, &format!("C{k}"), Element::C, [k as f64, 0.0, 3.5]))
            .collect();
        let lone = b.atom(r3, "C1", Element::C, [0.0, 4.0, 3.5]);
        let system = b.build();

        let mut features = FeatureSet::new();
        features.add(&system, FeatureType::AromaticRing, FeatureGroup::None, &ring1);
        features.add(&system, FeatureType::AromaticRing, FeatureGroup::None, &ring2);
        features.add(&system, FeatureType::Hydrophobic, FeatureGroup::None, &[ring1[0]]);
        features.add(&system, FeatureType::Hydrophobic, FeatureGroup::None, &[ring2[0]]);
        features.add(&system, FeatureType::Hydrophobic, FeatureGroup::None, &[lone]);
        (system, features)
    }

    #[test]
    fn pi_stacking_suppresses_overlapping_contacts_in_either_orientation() {
        let (system, features) = ring_fixture();
        let mut contacts = Contacts::new(features);
        contacts.add(0, 1, ContactType::PiStacking);
        contacts.add(2, 3, ContactType::Hydrophobic);
        contacts.add(3, 2, ContactType::Hydrophobic);
        contacts.add(2, 4, ContactType::Hydrophobic);
        let mut frozen = contacts.freeze();
        let map = frozen.features.atom_feature_map(system.atom_count());

        let cleared = suppress(
            &mut frozen,
            &map,
            |t| t == ContactType::Hydrophobic,
            ContactType::PiStacking,
        );
        assert_eq!(cleared, 2);
        assert_eq!(frozen.contact_set.to_vec(), vec![0, 3]);
    }

    #[test]
    fn cleared_suppressors_do_not_suppress() {
        let (system, features) = ring_fixture();
        let mut contacts = Contacts::new(features);
        contacts.add(0, 1, ContactType::PiStacking);
        contacts.add(2, 3, ContactType::Hydrophobic);
        let mut frozen = contacts.freeze();
        frozen.contact_set.clear(0);
        let map = frozen.features.atom_feature_map(system.atom_count());

        let cleared = suppress(
            &mut frozen,
            &map,
            |t| t == ContactType::Hydrophobic,
            ContactType::PiStacking,
        );
        assert_eq!(cleared, 0);
        assert_eq!(frozen.contact_set.to_vec(), vec![1]);
    }

    #[test]
    fn refinement_only_clears_and_is_idempotent() {
        let mut b = SystemBuilder::new();
        let chain = b.chain('A', ChainType::Protein);
        let lys = b.residue(chain, 1, "LYS");
        b.atom(lys, "NZ", Element::N, [0.0, 0.0, 0.0]);
        b.atom(lys, "CE", Element::C, [-1.5, 0.0, 0.0]);
        let asp = b.residue(chain, 2, "ASP");
        b.atom(asp, "OD1", Element::O, [2.9, 0.0, 0.0]);
        let leu = b.residue(chain, 3, "LEU");
        b.atom(leu, "CD1", Element::C, [-1.5, 3.6, 0.0]);
        b.atom(leu, "CD2", Element::C, [-1.5, 3.9, 1.0]);
        b.atom(leu, "CG", Element::C, [-1.5, 1.8, 0.2]);
        let system = b.build();
        let params = ContactParams::default();

        let mut frozen = run_tasks(
            &system,
            &params,
            &[charged::run, hydrogen_bonds::run, hydrophobic::run],
        )
        .freeze();
        let initial = frozen.contact_set.clone();

        refine(&system, &mut frozen, &params);
        let once = frozen.contact_set.clone();
        assert_eq!(once.difference(&initial).size(), 0);
        assert!(once.size() < initial.size());

        let stats = refine(&system, &mut frozen, &params);
        assert_eq!(stats.total(), 0);
        assert_eq!(frozen.contact_set, once);
    }
}
