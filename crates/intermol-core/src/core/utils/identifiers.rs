use crate::core::models::atom::AtomRole;
use phf::{Map, Set, phf_map, phf_set};

static AMINO_ACIDS: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "SEC", "PYL", "ASX", "GLX", "UNK",
};

static NUCLEIC_ACIDS: Set<&'static str> = phf_set! {
    "A", "C", "G", "T", "U", "I", "N",
    "DA", "DC", "DG", "DT", "DU", "DI", "DN",
};

static WATER_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "SOL", "TIP", "TIP3", "TIP4", "SPC",
};

static AROMATIC_AMINO_ACIDS: Set<&'static str> = phf_set! {
    "PHE", "TYR", "TRP", "HIS",
};

static PROTEIN_BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "HA2", "HA3", "C", "O", "OXT", "H1", "H2", "H3",
};

static NUCLEIC_BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "P", "OP1", "OP2", "OP3", "O1P", "O2P", "O3P",
    "O5'", "C5'", "C4'", "O4'", "C3'", "O3'", "C2'", "O2'", "C1'",
    "O5*", "C5*", "C4*", "O4*", "C3*", "O3*", "C2*", "O2*", "C1*",
};

static POSITIVE_RESIDUES: Set<&'static str> = phf_set! { "ARG", "HIS", "LYS" };

static NEGATIVE_RESIDUES: Set<&'static str> = phf_set! { "GLU", "ASP" };

/// Sidechain hydrogen-bond donor atoms of the standard amino acids.
static SIDECHAIN_DONORS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "ARG" => &["NE", "NH1", "NH2"],
    "ASN" => &["ND2"],
    "GLN" => &["NE2"],
    "HIS" => &["ND1", "NE2"],
    "LYS" => &["NZ"],
    "SER" => &["OG"],
    "THR" => &["OG1"],
    "TRP" => &["NE1"],
    "TYR" => &["OH"],
    "CYS" => &["SG"],
};

/// Sidechain hydrogen-bond acceptor atoms of the standard amino acids.
static SIDECHAIN_ACCEPTORS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "ASN" => &["OD1"],
    "ASP" => &["OD1", "OD2"],
    "GLN" => &["OE1"],
    "GLU" => &["OE1", "OE2"],
    "HIS" => &["ND1", "NE2"],
    "SER" => &["OG"],
    "THR" => &["OG1"],
    "TYR" => &["OH"],
    "MET" => &["SD"],
    "CYS" => &["SG"],
};

static METAL_BINDING_SIDECHAIN_OXYGEN_RESIDUES: Set<&'static str> = phf_set! {
    "ASP", "GLU", "SER", "THR", "TYR", "ASN", "GLN",
};

pub fn is_amino_acid(residue_name: &str) -> bool {
    AMINO_ACIDS.contains(residue_name.trim())
}

pub fn is_nucleic_acid(residue_name: &str) -> bool {
    NUCLEIC_ACIDS.contains(residue_name.trim())
}

pub fn is_water(residue_name: &str) -> bool {
    WATER_NAMES.contains(residue_name.trim())
}

pub fn is_aromatic_amino_acid(residue_name: &str) -> bool {
    AROMATIC_AMINO_ACIDS.contains(residue_name.trim())
}

pub fn is_positive_residue(residue_name: &str) -> bool {
    POSITIVE_RESIDUES.contains(residue_name.trim())
}

pub fn is_negative_residue(residue_name: &str) -> bool {
    NEGATIVE_RESIDUES.contains(residue_name.trim())
}

pub fn is_protein_backbone_atom(atom_name: &str) -> bool {
    PROTEIN_BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

pub fn is_nucleic_backbone_atom(atom_name: &str) -> bool {
    NUCLEIC_BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

pub fn is_sidechain_donor(residue_name: &str, atom_name: &str) -> bool {
    SIDECHAIN_DONORS
        .get(residue_name.trim())
        .is_some_and(|names| names.contains(&atom_name.trim()))
}

pub fn is_sidechain_acceptor(residue_name: &str, atom_name: &str) -> bool {
    SIDECHAIN_ACCEPTORS
        .get(residue_name.trim())
        .is_some_and(|names| names.contains(&atom_name.trim()))
}

pub fn binds_metal_with_sidechain_oxygen(residue_name: &str) -> bool {
    METAL_BINDING_SIDECHAIN_OXYGEN_RESIDUES.contains(residue_name.trim())
}

/// Derives an atom role from residue and atom names when the input left it unset.
pub fn infer_atom_role(residue_name: &str, atom_name: &str) -> AtomRole {
    if is_water(residue_name) {
        AtomRole::Water
    } else if is_amino_acid(residue_name) {
        if is_protein_backbone_atom(atom_name) {
            AtomRole::Backbone
        } else {
            AtomRole::Sidechain
        }
    } else if is_nucleic_acid(residue_name) {
        if is_nucleic_backbone_atom(atom_name) {
            AtomRole::Backbone
        } else {
            AtomRole::Sidechain
        }
    } else {
        AtomRole::Ligand
    }
}
