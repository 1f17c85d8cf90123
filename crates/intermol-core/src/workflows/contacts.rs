use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::system::MolecularSystem;
use crate::engine::config::ContactParams;
use crate::engine::contacts::{ContactType, Contacts, FrozenContacts};
use crate::engine::context::DetectionContext;
use crate::engine::error::EngineError;
use crate::engine::features::detect_features;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::{
    charged, halogen_bonds, hydrogen_bonds, hydrophobic, metal_coordination, refinement,
};
use tracing::{debug, info, instrument};

type Task = fn(&DetectionContext<'_>, &mut Contacts);

const TASKS: [(&str, Task); 5] = [
    ("charged", charged::run),
    ("hydrogen_bonds", hydrogen_bonds::run),
    ("metal_coordination", metal_coordination::run),
    ("hydrophobic", hydrophobic::run),
    ("halogen_bonds", halogen_bonds::run),
];

/// Detects and refines every contact in `system`.
pub fn calculate_contacts(
    system: &MolecularSystem,
    params: &ContactParams,
) -> Result<FrozenContacts, EngineError> {
    calculate_contacts_with_reporter(system, params, &ProgressReporter::new())
}

#[instrument(skip_all, name = "contacts_workflow")]
pub fn calculate_contacts_with_reporter(
    system: &MolecularSystem,
    params: &ContactParams,
    reporter: &ProgressReporter,
) -> Result<FrozenContacts, EngineError> {
    let params = params.clone().validate()?;
    check_coordinates(system)?;
    info!(
        atoms = system.atom_count(),
        residues = system.residues().len(),
        "Starting contact detection."
    );

    let valence = reporter.phase("Valence Model", || {
        ValenceModel::compute(system, &params.valence_params())
    });
    let context = DetectionContext::new(system, &valence, &params, reporter)?;

    let features = reporter.phase("Feature Detection", || detect_features(system, &valence));
    let mut contacts = Contacts::new(features);

    reporter.phase("Contact Detection", || {
        reporter.report(Progress::TaskStart {
            total_steps: TASKS.len() as u64,
        });
        for (name, task) in TASKS {
            let before = contacts.store.len();
            task(&context, &mut contacts);
            debug!(task = name, added = contacts.store.len() - before, "Task finished.");
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
    });

    let mut frozen = contacts.freeze();
    if params.refine {
        reporter.phase("Refinement", || {
            refinement::refine(system, &mut frozen, &params)
        });
    }
    frozen.recompute_feature_set();

    info!(
        features = frozen.features.len(),
        detected = frozen.len(),
        surviving = frozen.surviving_count(),
        "Contact detection complete."
    );
    for contact_type in ContactType::ALL {
        let count = frozen.count_of(contact_type);
        if count > 0 {
            debug!(%contact_type, count, "Surviving contacts by type.");
        }
    }
    Ok(frozen)
}

fn check_coordinates(system: &MolecularSystem) -> Result<(), EngineError> {
    match system
        .atoms()
        .iter()
        .position(|atom| !atom.position.coords.iter().all(|c| c.is_finite()))
    {
        Some(index) => Err(EngineError::InvalidStructure(format!(
            "atom {index} ('{}') has non-finite coordinates",
            system.atoms()[index].name
        ))),
        None => Ok(()),
    }
}
