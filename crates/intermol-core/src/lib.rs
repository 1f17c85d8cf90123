//! # intermol
//!
//! Detection of non-covalent interactions in molecular structures: hydrogen
//! bonds, salt bridges, pi-stacking, cation-pi, halogen bonds, hydrophobic
//! contacts and metal coordination.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that each layer
//! can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data and pure functions: the
//!   `MolecularSystem` model, name tables, vector geometry, the `SpatialIndex`
//!   grid and the valence model that assigns charges and implicit hydrogens.
//!
//! - **[`engine`]: The Logic Core.** Feature perception, the contact store,
//!   one detector per contact family and the refinement passes, all driven by
//!   a shared `DetectionContext`.
//!
//! - **[`workflows`]: The Public API.** `calculate_contacts` runs the whole
//!   pipeline; `ContactData` and the CSV report present the result.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
mod testing;
