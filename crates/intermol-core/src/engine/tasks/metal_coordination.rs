use crate::engine::contacts::{ContactType, Contacts, invalid_atom_contact};
use crate::engine::context::DetectionContext;
use crate::engine::features::{FeatureGroup, FeatureType};
use crate::engine::progress::Progress;
use tracing::{info, instrument};

type Feature = (FeatureType, FeatureGroup);

/// Transition metals take dative partners (and other transition metals);
/// ionic-type metals take ionic partners only.
fn coordinates(metal: Feature, partner: Feature) -> bool {
    use FeatureGroup::{DativeBondPartner, IonicTypeMetal, IonicTypePartner, TransitionMetal};
    use FeatureType::{Metal, MetalBinding};
    matches!(
        (metal, partner),
        ((Metal, TransitionMetal), (MetalBinding, DativeBondPartner))
            | ((Metal, TransitionMetal), (Metal, TransitionMetal))
            | ((Metal, IonicTypeMetal), (MetalBinding, IonicTypePartner))
    )
}

/// Type-level prefilter for [`coordinates`]; groups are checked per pair.
fn may_coordinate(ti: FeatureType, tj: FeatureType) -> bool {
    use FeatureType::{Metal, MetalBinding};
    matches!((ti, tj), (Metal, MetalBinding) | (MetalBinding, Metal) | (Metal, Metal))
}

/// Metal complexes, stored metal first.
#[instrument(skip_all, name = "metal_coordination_task")]
pub fn run(context: &DetectionContext<'_>, contacts: &mut Contacts) {
    let params = context.params;
    info!(max_distance = params.max_metal_distance, "Detecting metal coordination.");
    context
        .reporter
        .report(Progress::Message("Detecting metal coordination...".to_string()));

    let max_sq = params.max_metal_distance.powi(2);
    let before = contacts.store.len();

    contacts.each_pair(params.max_metal_distance, may_coordinate, |contacts, i, j, d_sq| {
        if d_sq > max_sq {
            return;
        }
        let features = &contacts.features;
        let fi = (features.feature_type(i), features.group(i));
        let fj = (features.feature_type(j), features.group(j));
        let (metal, partner) = if coordinates(fi, fj) {
            (i, j)
        } else if coordinates(fj, fi) {
            (j, i)
        } else {
            return;
        };
        if invalid_atom_contact(
            context.system,
            features.first_atom(metal),
            features.first_atom(partner),
            params.master_model_index,
        ) {
            return;
        }
        contacts.add(metal, partner, ContactType::MetalCoordination);
    });

    info!(
        contacts = contacts.store.len() - before,
        "Metal coordination detected."
    );
}
