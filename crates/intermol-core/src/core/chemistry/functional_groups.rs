use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;

/// Ionisable functional groups recognised in small molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalGroupKind {
    Guanidine,
    Acetamidine,
    Carboxylate,
    Phosphate,
    Sulfate,
    SulfonicAcid,
}

impl FunctionalGroupKind {
    /// Charge sign the group carries at physiological pH.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Guanidine | Self::Acetamidine)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalGroup {
    pub kind: FunctionalGroupKind,
    /// The central C, P or S atom.
    pub center: usize,
    /// Terminal heteroatoms that carry the delocalised charge.
    pub atoms: Vec<usize>,
}

fn heavy_degree(system: &MolecularSystem, atom: usize) -> usize {
    system
        .bonded_atoms(atom)
        .filter(|&a| !system.element(a).is_hydrogen())
        .count()
}

/// Neighbours of `center` with the given element whose only heavy neighbour is `center`.
fn terminal_neighbors(system: &MolecularSystem, center: usize, element: Element) -> Vec<usize> {
    system
        .bonded_atoms(center)
        .filter(|&a| system.element(a) == element && heavy_degree(system, a) == 1)
        .collect()
}

fn classify(system: &MolecularSystem, atom: usize) -> Option<FunctionalGroup> {
    let element = system.element(atom);
    let n_count = system.bond_to_element_count(atom, Element::N);
    let o_count = system.bond_to_element_count(atom, Element::O);
    let c_count = system.bond_to_element_count(atom, Element::C);
    let degree = system.bond_count(atom);

    let (kind, terminal_element) = match element {
        Element::C if degree == 3 && n_count == 3 => (FunctionalGroupKind::Guanidine, Element::N),
        Element::C if degree == 3 && n_count == 2 && c_count == 1 => {
            (FunctionalGroupKind::Acetamidine, Element::N)
        }
        Element::C if degree == 3 && o_count == 2 => (FunctionalGroupKind::Carboxylate, Element::O),
        Element::P if o_count == 4 || (o_count == 3 && degree == 4) => {
            (FunctionalGroupKind::Phosphate, Element::O)
        }
        Element::S if o_count == 4 => (FunctionalGroupKind::Sulfate, Element::O),
        Element::S if o_count == 3 && c_count == 1 => (FunctionalGroupKind::SulfonicAcid, Element::O),
        _ => return None,
    };

    let mut atoms = terminal_neighbors(system, atom, terminal_element);
    let required = match kind {
        FunctionalGroupKind::Guanidine | FunctionalGroupKind::Acetamidine => 1,
        _ => 2,
    };
    if atoms.len() < required {
        return None;
    }
    atoms.sort_unstable();
    Some(FunctionalGroup {
        kind,
        center: atom,
        atoms,
    })
}

/// Finds ionisable groups among the atoms of one residue, in atom order.
pub fn find_functional_groups(system: &MolecularSystem, residue_index: usize) -> Vec<FunctionalGroup> {
    let Some(residue) = system.residue(residue_index) else {
        return Vec::new();
    };
    residue
        .atoms()
        .iter()
        .filter_map(|&atom| classify(system, atom))
        .collect()
}
