use crate::core::models::element::Element;
use crate::engine::contacts::{ContactType, Contacts, invalid_atom_contact};
use crate::engine::context::DetectionContext;
use crate::engine::features::FeatureType;
use crate::engine::progress::Progress;
use tracing::{info, instrument};

fn both_hydrophobic(ti: FeatureType, tj: FeatureType) -> bool {
    ti == FeatureType::Hydrophobic && tj == FeatureType::Hydrophobic
}

/// Apolar atom pairs within `max_hydrophobic_distance`. Covalently bonded
/// pairs and fluorine-fluorine pairs are skipped.
#[instrument(skip_all, name = "hydrophobic_task")]
pub fn run(context: &DetectionContext<'_>, contacts: &mut Contacts) {
    let params = context.params;
    let system = context.system;
    info!(max_distance = params.max_hydrophobic_distance, "Detecting hydrophobic contacts.");
    context
        .reporter
        .report(Progress::Message("Detecting hydrophobic contacts...".to_string()));

    let max_sq = params.max_hydrophobic_distance.powi(2);
    let before = contacts.store.len();

    contacts.each_pair(params.max_hydrophobic_distance, both_hydrophobic, |contacts, i, j, d_sq| {
        if d_sq > max_sq {
            return;
        }
        let features = &contacts.features;
        let (a, b) = (features.first_atom(i), features.first_atom(j));
        if invalid_atom_contact(system, a, b, params.master_model_index) || system.are_bonded(a, b) {
            return;
        }
        if system.element(a) == Element::F && system.element(b) == Element::F {
            return;
        }
        contacts.add(i, j, ContactType::Hydrophobic);
    });

    info!(
        contacts = contacts.store.len() - before,
        "Hydrophobic contacts detected."
    );
}
