//! Contact detection tasks and the refinement passes run after them.
//!
//! Each detection task walks the candidate feature pairs within its own search
//! radius and appends the contacts it accepts to the shared [`Contacts`] store.
//! Tasks never remove contacts; removal is the job of [`refinement`], which
//! works on the frozen result and only clears bits of the survival mask.
//!
//! [`Contacts`]: crate::engine::contacts::Contacts

pub mod charged;
pub mod halogen_bonds;
pub mod hydrogen_bonds;
pub mod hydrophobic;
pub mod metal_coordination;
pub mod refinement;
