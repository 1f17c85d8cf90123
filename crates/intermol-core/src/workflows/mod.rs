//! # Workflows Module
//!
//! High-level entry points that run the complete contact detection pipeline
//! and present its result.
//!
//! ## Overview
//!
//! A workflow takes a `MolecularSystem` and a `ContactParams`, validates both,
//! computes the valence model, perceives features, runs every contact family
//! and the refinement passes, and hands back the frozen contact set. The
//! remaining modules turn that result into something a consumer can draw or
//! store.
//!
//! ## Architecture
//!
//! - **Contact Workflow** ([`contacts`]) - `calculate_contacts`, the full detection pipeline
//! - **Consumer Data** ([`data`]) - Per-type filtering into parallel drawing arrays
//! - **Reporting** ([`report`]) - CSV export of the surviving contacts
//!
//! ## Key Capabilities
//!
//! - **Single-call detection** from structure to refined contacts
//! - **Progress monitoring** through the engine's phase callbacks
//! - **Tabular export** with residue and atom labels for every contact

pub mod contacts;
pub mod data;
pub mod report;
