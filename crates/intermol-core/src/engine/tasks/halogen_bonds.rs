use crate::core::utils::geometry::substituent_angles;
use crate::engine::contacts::{ContactType, Contacts, invalid_atom_contact};
use crate::engine::context::DetectionContext;
use crate::engine::features::FeatureType;
use crate::engine::progress::Progress;
use tracing::{info, instrument, trace};

const OPTIMAL_DONOR_ANGLE: f64 = 180.0;
const OPTIMAL_ACCEPTOR_ANGLE: f64 = 120.0;

fn is_halogen_pair(ti: FeatureType, tj: FeatureType) -> bool {
    matches!(
        (ti, tj),
        (FeatureType::HalogenDonor, FeatureType::HalogenAcceptor)
            | (FeatureType::HalogenAcceptor, FeatureType::HalogenDonor)
    )
}

/// C-X...A must be close to linear and X...A-Y not much tighter than trigonal.
fn geometry_ok(context: &DetectionContext<'_>, halogen: usize, acceptor: usize) -> bool {
    let system = context.system;
    let tolerance = context.params.max_halogen_bond_angle;
    let (x, a) = (system.position(halogen), system.position(acceptor));

    let donor_angles = substituent_angles(x, &system.heavy_neighbor_positions(halogen), a);
    let [donor_angle] = donor_angles.as_slice() else {
        return false;
    };
    if OPTIMAL_DONOR_ANGLE - donor_angle.to_degrees() > tolerance {
        return false;
    }

    let acceptor_angles = substituent_angles(a, &system.heavy_neighbor_positions(acceptor), x);
    trace!(halogen, acceptor, ?acceptor_angles, "Halogen bond acceptor angles.");
    !acceptor_angles.is_empty()
        && acceptor_angles
            .iter()
            .all(|angle| OPTIMAL_ACCEPTOR_ANGLE - angle.to_degrees() <= tolerance)
}

#[instrument(skip_all, name = "halogen_bonds_task")]
pub fn run(context: &DetectionContext<'_>, contacts: &mut Contacts) {
    let params = context.params;
    let system = context.system;
    info!(
        max_distance = params.max_halogen_bond_distance,
        geometry = params.halogen_bond_geometry,
        "Detecting halogen bonds."
    );
    context
        .reporter
        .report(Progress::Message("Detecting halogen bonds...".to_string()));

    let max_sq = params.max_halogen_bond_distance.powi(2);
    let before = contacts.store.len();

    contacts.each_pair(params.max_halogen_bond_distance, is_halogen_pair, |contacts, i, j, d_sq| {
        if d_sq > max_sq {
            return;
        }
        let features = &contacts.features;
        let (ai, aj) = (features.first_atom(i), features.first_atom(j));
        if invalid_atom_contact(system, ai, aj, params.master_model_index) {
            return;
        }
        if params.halogen_bond_geometry {
            let (halogen, acceptor) = if features.feature_type(i) == FeatureType::HalogenDonor {
                (ai, aj)
            } else {
                (aj, ai)
            };
            if !geometry_ok(context, halogen, acceptor) {
                return;
            }
        }
        contacts.add(i, j, ContactType::HalogenBond);
    });

    info!(
        contacts = contacts.store.len() - before,
        "Halogen bonds detected."
    );
}
