pub mod atom;
pub mod chain;
pub mod element;
pub mod residue;
pub mod system;
pub mod topology;
