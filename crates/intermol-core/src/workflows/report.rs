use crate::core::models::system::MolecularSystem;
use crate::engine::contacts::{ContactView, FrozenContacts};
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ContactRecord<'a> {
    index: usize,
    #[serde(rename = "type")]
    contact_type: &'static str,
    chain1: char,
    residue1: &'a str,
    residue_number1: isize,
    atoms1: String,
    chain2: char,
    residue2: &'a str,
    residue_number2: isize,
    atoms2: String,
    distance: f64,
}

/// Chain id, residue name, residue number and `;`-joined atom names of a feature.
fn feature_label<'a>(system: &'a MolecularSystem, atoms: &[usize]) -> (char, &'a str, isize, String) {
    let first = &system.atoms()[atoms[0]];
    let residue = system.residue_of(atoms[0]);
    let chain = system.chain_of_residue(first.residue_index);
    let names = atoms.iter().map(|&a| system.atoms()[a].name.as_str()).join(";");
    (chain.id, residue.name.as_str(), residue.id, names)
}

fn record<'a>(system: &'a MolecularSystem, view: &ContactView<'_>) -> ContactRecord<'a> {
    let (chain1, residue1, residue_number1, atoms1) = feature_label(system, view.atoms1);
    let (chain2, residue2, residue_number2, atoms2) = feature_label(system, view.atoms2);
    ContactRecord {
        index: view.index,
        contact_type: view.contact_type.name(),
        chain1,
        residue1,
        residue_number1,
        atoms1,
        chain2,
        residue2,
        residue_number2,
        atoms2,
        distance: (view.distance() * 1000.0).round() / 1000.0,
    }
}

/// Writes one CSV row per surviving contact and returns the number of rows.
pub fn write_contacts_csv<W: Write>(
    system: &MolecularSystem,
    contacts: &FrozenContacts,
    writer: W,
) -> Result<usize, ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for view in contacts.surviving() {
        csv_writer.serialize(record(system, &view))?;
        rows += 1;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

#[instrument(skip_all, name = "contact_report")]
pub fn save_contacts_csv(
    system: &MolecularSystem,
    contacts: &FrozenContacts,
    path: &Path,
) -> Result<usize, ReportError> {
    let file = File::create(path).map_err(|e| ReportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let rows = write_contacts_csv(system, contacts, file)?;
    info!(rows, path = %path.display(), "Contact report written.");
    Ok(rows)
}
