use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub id: isize,                         // Residue sequence number from source file
    pub name: String,                      // Name of the residue (e.g., "ALA", "HEM")
    pub chain_index: usize,                // Index of the parent chain
    pub(crate) atoms: Vec<usize>,          // Indices of atoms belonging to this residue
    pub(crate) rings: Vec<Vec<usize>>,     // Rings as atom indices in cycle order
    atom_name_map: HashMap<String, usize>, // Map from atom name to atom index
}

impl Residue {
    pub(crate) fn new(id: isize, name: &str, chain_index: usize) -> Self {
        Self {
            id,
            name: name.trim().to_uppercase(),
            chain_index,
            atoms: Vec::new(),
            rings: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_index: usize) {
        self.atoms.push(atom_index);
        self.atom_name_map
            .insert(atom_name.trim().to_string(), atom_index);
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    /// Rings of this residue, each listed in cycle order so that any three
    /// consecutive members span the ring plane.
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    pub fn atom_by_name(&self, name: &str) -> Option<usize> {
        self.atom_name_map.get(name.trim()).copied()
    }
}
