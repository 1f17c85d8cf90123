use super::atom::{Atom, AtomRole};
use super::chain::{Chain, ChainType};
use super::element::Element;
use super::residue::Residue;
use super::topology::{Bond, BondOrder};
use crate::core::utils::identifiers;
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};

const MAX_PERCEIVED_RING_SIZE: usize = 6;
const MIN_PERCEIVED_RING_SIZE: usize = 5;

/// Represents a complete molecular system with atoms, residues, chains, and bonds.
///
/// Atoms, residues and chains are stored densely and addressed by index, so
/// per-atom derived data (valence model, feature membership) can live in plain
/// parallel arrays. The system is append-only: the interaction engine treats it
/// as a read-only snapshot.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Atom storage, indexed by atom index.
    atoms: Vec<Atom>,
    /// Residue storage, indexed by residue index.
    residues: Vec<Residue>,
    /// Chain storage, indexed by chain index.
    chains: Vec<Chain>,
    /// List of all bonds in the system.
    bonds: Vec<Bond>,
    /// Lookup map for finding residues by chain index and residue number.
    residue_id_map: HashMap<(usize, isize), usize>,
    /// Lookup map for finding chains by model and single-character identifier.
    chain_id_map: HashMap<(usize, char), usize>,
    /// Bonded neighbours with bond orders, indexed by atom index.
    bond_adjacency: Vec<Vec<(usize, BondOrder)>>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Finds a chain index by model and single-character identifier.
    pub fn find_chain(&self, model: usize, id: char) -> Option<usize> {
        self.chain_id_map.get(&(model, id)).copied()
    }

    /// Finds a residue index by its chain index and residue number.
    pub fn find_residue(&self, chain_index: usize, residue_number: isize) -> Option<usize> {
        self.residue_id_map
            .get(&(chain_index, residue_number))
            .copied()
    }

    /// Adds a chain to model 0, or returns the existing one.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> usize {
        self.add_chain_in_model(0, id, chain_type)
    }

    /// Adds a chain to the given model, or returns the existing one.
    ///
    /// This method is idempotent; a chain is identified by `(model, id)`.
    pub fn add_chain_in_model(&mut self, model: usize, id: char, chain_type: ChainType) -> usize {
        *self.chain_id_map.entry((model, id)).or_insert_with(|| {
            self.chains.push(Chain::new(id, chain_type, model));
            self.chains.len() - 1
        })
    }

    /// Adds a residue to a chain, or returns the existing one.
    ///
    /// Returns `None` if the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_index: usize,
        residue_number: isize,
        name: &str,
    ) -> Option<usize> {
        let chain = self.chains.get_mut(chain_index)?;
        let residues = &mut self.residues;

        let residue_index = *self
            .residue_id_map
            .entry((chain_index, residue_number))
            .or_insert_with(|| {
                residues.push(Residue::new(residue_number, name, chain_index));
                residues.len() - 1
            });

        if !chain.residues.contains(&residue_index) {
            chain.residues.push(residue_index);
        }

        Some(residue_index)
    }

    /// Adds an atom to a residue and returns its index.
    ///
    /// An atom whose role is [`AtomRole::Other`] gets a role inferred from the
    /// residue and atom names. Returns `None` if the residue does not exist.
    pub fn add_atom(&mut self, residue_index: usize, mut atom: Atom) -> Option<usize> {
        let residue = self.residues.get_mut(residue_index)?;

        if atom.role == AtomRole::Other {
            atom.role = identifiers::infer_atom_role(&residue.name, &atom.name);
        }
        atom.residue_index = residue_index;

        let atom_index = self.atoms.len();
        residue.add_atom(&atom.name, atom_index);
        self.atoms.push(atom);
        self.bond_adjacency.push(Vec::new());

        Some(atom_index)
    }

    /// Adds a bond between two atoms.
    ///
    /// It is idempotent; adding an existing bond succeeds without creating
    /// duplicates. Returns `None` for unknown atoms or a self-bond.
    pub fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> Option<()> {
        if atom1 >= self.atoms.len() || atom2 >= self.atoms.len() || atom1 == atom2 {
            return None;
        }
        if self.are_bonded(atom1, atom2) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1, atom2, order));
        self.bond_adjacency[atom1].push((atom2, order));
        self.bond_adjacency[atom2].push((atom1, order));
        Some(())
    }

    /// Registers a ring on a residue. Atoms must be given in cycle order and
    /// belong to that residue.
    pub fn add_ring(&mut self, residue_index: usize, ring: Vec<usize>) -> Option<()> {
        let residue = self.residues.get(residue_index)?;
        if ring.len() < 3 || !ring.iter().all(|a| residue.atoms.contains(a)) {
            return None;
        }
        let key: HashSet<usize> = ring.iter().copied().collect();
        let residue = &mut self.residues[residue_index];
        let exists = residue
            .rings
            .iter()
            .any(|r| r.len() == key.len() && r.iter().all(|a| key.contains(a)));
        if !exists {
            residue.rings.push(ring);
        }
        Some(())
    }

    /// Every 5- and 6-membered ring formed by the residue's internal bonds,
    /// each in cycle order starting from its lowest atom index.
    pub fn find_rings(&self, residue_index: usize) -> Vec<Vec<usize>> {
        let Some(residue) = self.residues.get(residue_index) else {
            return Vec::new();
        };
        let members: HashSet<usize> = residue.atoms.iter().copied().collect();
        let mut starts: Vec<usize> = members.iter().copied().collect();
        starts.sort_unstable();

        let mut found = Vec::new();
        for &start in &starts {
            let mut path = vec![start];
            self.collect_cycles(start, &members, &mut path, &mut found);
        }
        found
    }

    /// Registers the rings from [`find_rings`](Self::find_rings) on every
    /// residue. Contact detection searches residues without registered rings
    /// on its own, so this is only needed to inspect or edit rings up front.
    pub fn perceive_rings(&mut self) {
        for residue_index in 0..self.residues.len() {
            for ring in self.find_rings(residue_index) {
                let _ = self.add_ring(residue_index, ring);
            }
        }
    }

    fn collect_cycles(
        &self,
        start: usize,
        members: &HashSet<usize>,
        path: &mut Vec<usize>,
        found: &mut Vec<Vec<usize>>,
    ) {
        let Some(&current) = path.last() else {
            return;
        };
        for (next, _) in &self.bond_adjacency[current] {
            let next = *next;
            if !members.contains(&next) {
                continue;
            }
            if next == start {
                // Each cycle is reported once: lowest atom first, then the
                // smaller of its two ring neighbours.
                if path.len() >= MIN_PERCEIVED_RING_SIZE && path[1] < current {
                    found.push(path.clone());
                }
                continue;
            }
            if next < start || path.contains(&next) || path.len() >= MAX_PERCEIVED_RING_SIZE {
                continue;
            }
            path.push(next);
            self.collect_cycles(start, members, path, found);
            path.pop();
        }
    }

    pub fn position(&self, atom: usize) -> &Point3<f64> {
        &self.atoms[atom].position
    }

    pub fn element(&self, atom: usize) -> Element {
        self.atoms[atom].element
    }

    /// Bonded neighbours of an atom together with the bond orders.
    pub fn bonds_of(&self, atom: usize) -> &[(usize, BondOrder)] {
        &self.bond_adjacency[atom]
    }

    pub fn bonded_atoms(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.bond_adjacency[atom].iter().map(|(a, _)| *a)
    }

    pub fn bond_count(&self, atom: usize) -> usize {
        self.bond_adjacency[atom].len()
    }

    pub fn bond_order(&self, atom1: usize, atom2: usize) -> Option<BondOrder> {
        self.bond_adjacency
            .get(atom1)?
            .iter()
            .find(|(a, _)| *a == atom2)
            .map(|(_, order)| *order)
    }

    pub fn are_bonded(&self, atom1: usize, atom2: usize) -> bool {
        self.bond_order(atom1, atom2).is_some()
    }

    pub fn bond_to_element_count(&self, atom: usize, element: Element) -> usize {
        self.bonded_atoms(atom)
            .filter(|&a| self.atoms[a].element == element)
            .count()
    }

    /// Positions of the bonded non-hydrogen neighbours of an atom.
    pub fn heavy_neighbor_positions(&self, atom: usize) -> Vec<Point3<f64>> {
        self.bonded_atoms(atom)
            .filter(|&a| !self.atoms[a].is_hydrogen())
            .map(|a| self.atoms[a].position)
            .collect()
    }

    pub fn residue_of(&self, atom: usize) -> &Residue {
        &self.residues[self.atoms[atom].residue_index]
    }

    pub fn residue_name(&self, atom: usize) -> &str {
        &self.residue_of(atom).name
    }

    pub fn chain_of_residue(&self, residue_index: usize) -> &Chain {
        &self.chains[self.residues[residue_index].chain_index]
    }

    pub fn model_of(&self, atom: usize) -> usize {
        self.chain_of_residue(self.atoms[atom].residue_index).model
    }

    pub fn is_amino_acid_residue(&self, residue_index: usize) -> bool {
        identifiers::is_amino_acid(&self.residues[residue_index].name)
    }

    pub fn is_nucleic_residue(&self, residue_index: usize) -> bool {
        let chain_type = self.chain_of_residue(residue_index).chain_type;
        matches!(chain_type, ChainType::DNA | ChainType::RNA)
            || identifiers::is_nucleic_acid(&self.residues[residue_index].name)
    }

    pub fn is_water_residue(&self, residue_index: usize) -> bool {
        self.chain_of_residue(residue_index).chain_type == ChainType::Water
            || identifiers::is_water(&self.residues[residue_index].name)
    }

    /// Polymer residues are standard amino acids and nucleotides, or any residue of a
    /// protein or nucleic chain.
    pub fn is_polymer_residue(&self, residue_index: usize) -> bool {
        self.chain_of_residue(residue_index).chain_type.is_polymer()
            || self.is_amino_acid_residue(residue_index)
            || self.is_nucleic_residue(residue_index)
    }

    pub fn is_protein(&self, atom: usize) -> bool {
        self.is_amino_acid_residue(self.atoms[atom].residue_index)
    }

    pub fn is_nucleic(&self, atom: usize) -> bool {
        self.is_nucleic_residue(self.atoms[atom].residue_index)
    }

    pub fn is_water(&self, atom: usize) -> bool {
        self.atoms[atom].role == AtomRole::Water
            || self.is_water_residue(self.atoms[atom].residue_index)
    }

    pub fn is_backbone(&self, atom: usize) -> bool {
        self.atoms[atom].role == AtomRole::Backbone
    }

    pub fn is_sidechain(&self, atom: usize) -> bool {
        self.atoms[atom].role == AtomRole::Sidechain
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.residue_of(atom)
            .rings
            .iter()
            .any(|ring| ring.contains(&atom))
    }

    pub fn has_aromatic_bond(&self, atom: usize) -> bool {
        self.bond_adjacency[atom]
            .iter()
            .any(|(_, order)| *order == BondOrder::Aromatic)
    }
}
