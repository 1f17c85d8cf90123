pub mod adjacency;
pub mod bitset;
pub mod geometry;
pub mod identifiers;
