//! Chemistry perception on top of the bonded structure: per-atom charge,
//! protonation and geometry ([`valence`]) and ionisable small-molecule
//! groups ([`functional_groups`]).

pub mod functional_groups;
pub mod valence;
