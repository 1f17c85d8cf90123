use super::element::Element;
use nalgebra::Point3;
use std::str::FromStr;

/// Represents the role of an atom within its residue.
///
/// Roles drive several perception rules: backbone atoms take part in backbone
/// hydrogen bonds, sidechain atoms carry residue charges, and water atoms form
/// water-mediated contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Main-chain atom of a polymer (N, CA, C, O for proteins; sugar-phosphate for nucleic acids).
    Backbone,
    /// Side-chain or base atom of a polymer residue.
    Sidechain,
    /// Atom of a small molecule.
    Ligand,
    /// Solvent water atom.
    Water,
    /// Unknown or unclassified role.
    #[default]
    Other,
}

/// An atom of a molecular structure.
///
/// Atoms are addressed by their dense index in [`MolecularSystem`](super::system::MolecularSystem);
/// everything the interaction engine derives per atom is stored in parallel arrays keyed by that index.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "NZ", "O1").
    pub name: String,
    pub element: Element,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Formal charge from the input, if one was given.
    pub formal_charge: Option<i8>,
    /// Alternate location indicator, if the atom is disordered.
    pub altloc: Option<char>,
    /// Index of the parent residue.
    pub residue_index: usize,
    pub role: AtomRole,
}

impl Atom {
    /// Creates a new `Atom` with no formal charge, no alternate location and
    /// the default role.
    pub fn new(name: &str, element: Element, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element,
            position,
            formal_charge: None,
            altloc: None,
            residue_index: 0,
            role: AtomRole::default(),
        }
    }

    pub fn with_role(mut self, role: AtomRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_formal_charge(mut self, charge: i8) -> Self {
        self.formal_charge = Some(charge);
        self
    }

    pub fn with_altloc(mut self, altloc: char) -> Self {
        self.altloc = Some(altloc);
        self
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }
}

impl FromStr for AtomRole {
    type Err = ();

    /// Parses a role name case-insensitively, accepting the usual
    /// spellings of "sidechain".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backbone" => Ok(AtomRole::Backbone),
            "sidechain" | "side-chain" | "side_chain" => Ok(AtomRole::Sidechain),
            "ligand" => Ok(AtomRole::Ligand),
            "water" => Ok(AtomRole::Water),
            "other" | "unknown" => Ok(AtomRole::Other),
            _ => Err(()),
        }
    }
}
