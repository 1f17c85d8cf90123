use crate::core::utils::geometry::{angle_between, in_plane_offset, plane_normal};
use crate::engine::contacts::{ContactType, Contacts, invalid_atom_contact};
use crate::engine::context::DetectionContext;
use crate::engine::features::{FeatureSet, FeatureType};
use crate::engine::progress::Progress;
use nalgebra::{Unit, Vector3};
use tracing::{info, instrument, trace};

fn is_salt_bridge(ti: FeatureType, tj: FeatureType) -> bool {
    matches!(
        (ti, tj),
        (FeatureType::NegativeCharge, FeatureType::PositiveCharge)
            | (FeatureType::PositiveCharge, FeatureType::NegativeCharge)
    )
}

fn is_pi_stacking(ti: FeatureType, tj: FeatureType) -> bool {
    ti == FeatureType::AromaticRing && tj == FeatureType::AromaticRing
}

fn is_cation_pi(ti: FeatureType, tj: FeatureType) -> bool {
    matches!(
        (ti, tj),
        (FeatureType::AromaticRing, FeatureType::PositiveCharge)
            | (FeatureType::PositiveCharge, FeatureType::AromaticRing)
    )
}

fn is_charged_pair(ti: FeatureType, tj: FeatureType) -> bool {
    is_salt_bridge(ti, tj) || is_pi_stacking(ti, tj) || is_cation_pi(ti, tj)
}

/// Ring normal from the first three ring atoms; `None` for fewer atoms or collinear ones.
fn ring_normal(context: &DetectionContext<'_>, features: &FeatureSet, ring: usize) -> Option<Unit<Vector3<f64>>> {
    let &[a, b, c, ..] = features.atoms(ring) else {
        return None;
    };
    let system = context.system;
    plane_normal(system.position(a), system.position(b), system.position(c))
}

/// Parallel or T-shaped stacking: the smaller of the two in-plane offsets
/// must be within `max_pi_stacking_offset`, and the normals must be within
/// `max_pi_stacking_angle` of parallel (either orientation) or perpendicular.
fn rings_stack(context: &DetectionContext<'_>, features: &FeatureSet, i: usize, j: usize) -> bool {
    let (Some(n1), Some(n2)) = (
        ring_normal(context, features, i),
        ring_normal(context, features, j),
    ) else {
        return false;
    };
    let Some(angle) = angle_between(n1.as_ref(), n2.as_ref()).map(f64::to_degrees) else {
        return false;
    };
    let (ci, cj) = (features.center(i), features.center(j));
    let offset = in_plane_offset(ci, cj, &n2).min(in_plane_offset(cj, ci, &n1));

    let params = context.params;
    if offset > params.max_pi_stacking_offset {
        return false;
    }
    let tilt = angle.min(180.0 - angle);
    let parallel = tilt <= params.max_pi_stacking_angle;
    let t_shaped = (angle - 90.0).abs() <= params.max_pi_stacking_angle;
    trace!(i, j, angle, offset, parallel, t_shaped, "Pi-stacking candidate.");
    parallel || t_shaped
}

fn cation_over_ring(context: &DetectionContext<'_>, features: &FeatureSet, ring: usize, cation: usize) -> bool {
    let Some(normal) = ring_normal(context, features, ring) else {
        return false;
    };
    let offset = in_plane_offset(features.center(cation), features.center(ring), &normal);
    offset <= context.params.max_cation_pi_offset
}

/// Salt bridges, pi-stacking and cation-pi contacts.
#[instrument(skip_all, name = "charged_contacts_task")]
pub fn run(context: &DetectionContext<'_>, contacts: &mut Contacts) {
    let params = context.params;
    info!(
        max_saltbridge_distance = params.max_saltbridge_distance,
        max_pi_stacking_distance = params.max_pi_stacking_distance,
        max_cation_pi_distance = params.max_cation_pi_distance,
        "Detecting ionic and aromatic contacts."
    );
    context
        .reporter
        .report(Progress::Message("Detecting ionic and aromatic contacts...".to_string()));

    let saltbridge_sq = params.max_saltbridge_distance.powi(2);
    let pi_stacking_sq = params.max_pi_stacking_distance.powi(2);
    let cation_pi_sq = params.max_cation_pi_distance.powi(2);
    let before = contacts.store.len();

    contacts.each_pair(params.charged_search_radius(), is_charged_pair, |contacts, i, j, d_sq| {
        let features = &contacts.features;
        if invalid_atom_contact(
            context.system,
            features.first_atom(i),
            features.first_atom(j),
            params.master_model_index,
        ) {
            return;
        }
        let (ti, tj) = (features.feature_type(i), features.feature_type(j));

        if is_salt_bridge(ti, tj) {
            if d_sq <= saltbridge_sq {
                contacts.add(i, j, ContactType::IonicInteraction);
            }
        } else if is_pi_stacking(ti, tj) {
            if d_sq <= pi_stacking_sq && rings_stack(context, features, i, j) {
                contacts.add(i, j, ContactType::PiStacking);
            }
        } else if is_cation_pi(ti, tj) && d_sq <= cation_pi_sq {
            let (ring, cation) = if ti == FeatureType::AromaticRing { (i, j) } else { (j, i) };
            if cation_over_ring(context, features, ring, cation) {
                contacts.add(ring, cation, ContactType::CationPi);
            }
        }
    });

    info!(
        contacts = contacts.store.len() - before,
        "Ionic and aromatic contacts detected."
    );
}
