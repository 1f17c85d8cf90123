//! # Engine Module
//!
//! Stateful detection machinery: from a structure and its valence model to a
//! refined set of contacts.
//!
//! ## Overview
//!
//! The engine perceives interaction features on the structure, indexes their
//! centroids, runs one detector per contact family over nearby feature pairs
//! and finally refines the result. Every phase reads the same
//! [`context::DetectionContext`] and appends to, or clears bits in, a single
//! contact store.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Distance and angle thresholds, sub-type toggles, TOML loading
//! - **Features** ([`features`]) - Feature types and groups, the `FeatureSet`, and the detectors
//! - **Contacts** ([`contacts`]) - Contact types, the columnar store and the frozen result
//! - **Tasks** ([`tasks`]) - One detector per contact family plus the refinement passes
//! - **Progress Monitoring** ([`progress`]) - Phase and message callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Key Capabilities
//!
//! - **Grid-accelerated pair search** so each family only sees pairs within its own cutoff
//! - **Hydrogen placement from ideal geometry** when the input carries no hydrogens
//! - **Monotone refinement** that only ever removes contacts
//! - **Optional parallel feature detection** behind the `parallel` cargo feature

pub mod config;
pub mod contacts;
pub mod context;
pub mod error;
pub mod features;
pub mod progress;
pub mod tasks;
