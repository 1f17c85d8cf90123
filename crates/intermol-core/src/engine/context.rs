use super::config::ContactParams;
use super::error::EngineError;
use super::progress::ProgressReporter;
use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::system::MolecularSystem;

/// Everything a detection task reads: the structure, its valence model, the
/// thresholds and the progress sink.
#[derive(Clone, Copy)]
pub struct DetectionContext<'a> {
    pub system: &'a MolecularSystem,
    pub valence: &'a ValenceModel,
    pub params: &'a ContactParams,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> DetectionContext<'a> {
    /// Fails if the valence model was computed for a different structure.
    pub fn new(
        system: &'a MolecularSystem,
        valence: &'a ValenceModel,
        params: &'a ContactParams,
        reporter: &'a ProgressReporter<'a>,
    ) -> Result<Self, EngineError> {
        if valence.len() != system.atom_count() {
            return Err(EngineError::ValenceMismatch {
                model: valence.len(),
                structure: system.atom_count(),
            });
        }
        Ok(Self {
            system,
            valence,
            params,
            reporter,
        })
    }
}
