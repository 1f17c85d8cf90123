use crate::core::models::element::Element;
use crate::core::utils::geometry::{HydrogenLayout, angle_between, assign_geometry};
use crate::engine::contacts::{ContactType, Contacts, invalid_atom_contact};
use crate::engine::context::DetectionContext;
use crate::engine::features::{FeatureGroup, FeatureType};
use crate::engine::progress::Progress;
use nalgebra::Point3;
use tracing::{info, instrument};

/// Donor/acceptor pairing of two features, with the donor first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    Regular { donor: usize, acceptor: usize },
    Weak { donor: usize, acceptor: usize },
}

fn pairing(ti: FeatureType, tj: FeatureType, i: usize, j: usize) -> Option<Pairing> {
    use FeatureType::{HydrogenAcceptor, HydrogenDonor, WeakHydrogenDonor};
    match (ti, tj) {
        (HydrogenDonor, HydrogenAcceptor) => Some(Pairing::Regular { donor: i, acceptor: j }),
        (HydrogenAcceptor, HydrogenDonor) => Some(Pairing::Regular { donor: j, acceptor: i }),
        (WeakHydrogenDonor, HydrogenAcceptor) => Some(Pairing::Weak { donor: i, acceptor: j }),
        (HydrogenAcceptor, WeakHydrogenDonor) => Some(Pairing::Weak { donor: j, acceptor: i }),
        _ => None,
    }
}

/// Whether a hydrogen on `donor` can point at `acceptor` within `max_angle` (radians).
///
/// Explicit hydrogens are used as given. Hydrogens the valence model added are
/// placed from the ideal geometry around the existing substituents; a donor
/// with neither is assumed to carry one hydrogen in the open position.
fn donor_angle_ok(context: &DetectionContext<'_>, donor: usize, acceptor: usize, max_angle: f64) -> bool {
    let system = context.system;
    let center = system.position(donor);
    let to_acceptor = system.position(acceptor) - center;

    let explicit_ok = system
        .bonded_atoms(donor)
        .filter(|&a| system.element(a) == Element::H)
        .filter_map(|h| angle_between(&(system.position(h) - center), &to_acceptor))
        .any(|angle| angle <= max_angle);
    if explicit_ok {
        return true;
    }

    let has_explicit_h = system.bond_to_element_count(donor, Element::H) > 0;
    if has_explicit_h && context.valence.implicit_h[donor] == 0 {
        return false;
    }

    let neighbors: Vec<Point3<f64>> = system.bonded_atoms(donor).map(|a| *system.position(a)).collect();
    let layout = match HydrogenLayout::from_geometry(context.valence.ideal_geometry[donor], center, &neighbors) {
        HydrogenLayout::None if !has_explicit_h => match neighbors.len() {
            0 => HydrogenLayout::Free,
            n => HydrogenLayout::from_geometry(assign_geometry(n as i32 + 1), center, &neighbors),
        },
        layout => layout,
    };
    layout
        .best_angle(&to_acceptor)
        .is_some_and(|angle| angle <= max_angle)
}

/// Hydrogen bonds between donors (or weak C-H donors) and acceptors, classified
/// as weak, water, backbone or regular in that order of precedence.
#[instrument(skip_all, name = "hydrogen_bonds_task")]
pub fn run(context: &DetectionContext<'_>, contacts: &mut Contacts) {
    let params = context.params;
    let system = context.system;
    info!(
        max_distance = params.max_hydrogen_bond_distance,
        max_sulfur_distance = params.max_hydrogen_bond_sulfur_distance,
        max_angle = params.max_hydrogen_bond_angle,
        "Detecting hydrogen bonds."
    );
    context
        .reporter
        .report(Progress::Message("Detecting hydrogen bonds...".to_string()));

    let max_sq = params.max_hydrogen_bond_distance.powi(2);
    let max_sulfur_sq = params.max_hydrogen_bond_sulfur_distance.powi(2);
    let max_angle = params.max_hydrogen_bond_angle.to_radians();
    let before = contacts.store.len();

    let donor_acceptor = |ti: FeatureType, tj: FeatureType| pairing(ti, tj, 0, 1).is_some();
    contacts.each_pair(params.hydrogen_bond_search_radius(), donor_acceptor, |contacts, i, j, d_sq| {
        let features = &contacts.features;
        let Some(pairing) = pairing(features.feature_type(i), features.feature_type(j), i, j) else {
            return;
        };
        let (donor, acceptor, weak) = match pairing {
            Pairing::Regular { donor, acceptor } => (donor, acceptor, false),
            Pairing::Weak { donor, acceptor } => (donor, acceptor, true),
        };
        if weak && !params.weak_hydrogen_bond {
            return;
        }

        let (donor_atom, acceptor_atom) = (features.first_atom(donor), features.first_atom(acceptor));
        if invalid_atom_contact(system, donor_atom, acceptor_atom, params.master_model_index)
            || system.are_bonded(donor_atom, acceptor_atom)
        {
            return;
        }

        let sulfur = system.element(donor_atom) == Element::S || system.element(acceptor_atom) == Element::S;
        let cutoff_sq = if sulfur { max_sulfur_sq } else { max_sq };
        if d_sq > cutoff_sq {
            return;
        }

        let (group_d, group_a) = (features.group(donor), features.group(acceptor));
        let contact_type = if weak {
            ContactType::WeakHydrogenBond
        } else if group_d == FeatureGroup::Water && group_a == FeatureGroup::Water {
            if !params.water_hydrogen_bond {
                return;
            }
            ContactType::WaterHydrogenBond
        } else if group_d == FeatureGroup::Backbone && group_a == FeatureGroup::Backbone {
            if !params.backbone_hydrogen_bond {
                return;
            }
            ContactType::BackboneHydrogenBond
        } else {
            ContactType::HydrogenBond
        };

        if donor_angle_ok(context, donor_atom, acceptor_atom, max_angle) {
            contacts.add(donor, acceptor, contact_type);
        }
    });

    info!(
        contacts = contacts.store.len() - before,
        "Hydrogen bonds detected."
    );
}
