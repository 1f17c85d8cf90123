//! # Core Module
//!
//! Stateless building blocks of the interaction engine.
//!
//! ## Overview
//!
//! Everything here is plain data plus pure functions over it: the structure the
//! engine reads, the perception derived from that structure, and the small
//! containers the detection pipeline is assembled from.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, bonds and the `MolecularSystem`
//! - **Chemistry Perception** ([`chemistry`]) - Valence model and ionisable functional groups
//! - **Spatial Queries** ([`spatial`]) - Uniform-grid index for fixed-radius neighbour lookup
//! - **Utilities** ([`utils`]) - Name tables, vector geometry, `BitSet` and `AdjacencyList`
//!
//! ## Key Capabilities
//!
//! - **Dense, index-addressed structure storage** so per-atom data lives in parallel arrays
//! - **Ring perception** for residues that arrive without ring annotations
//! - **Rule-based protonation and charge assignment** for H, C, N, O, S, halogens and s-block metals
//! - **Exact neighbour queries** in time proportional to the local density

pub mod chemistry;
pub mod models;
pub mod spatial;
pub mod utils;
