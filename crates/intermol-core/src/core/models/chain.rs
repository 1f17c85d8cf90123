use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Protein,
    DNA,
    RNA,
    Ligand,
    Water,
    Other,
}

impl ChainType {
    pub fn is_polymer(self) -> bool {
        matches!(self, Self::Protein | Self::DNA | Self::RNA)
    }
}

#[derive(Debug, Error)]
#[error("Invalid chain type string")]
pub struct ParseChainTypeError;

impl FromStr for ChainType {
    type Err = ParseChainTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" => Ok(ChainType::Protein),
            "dna" => Ok(ChainType::DNA),
            "rna" => Ok(ChainType::RNA),
            "ligand" => Ok(ChainType::Ligand),
            "water" => Ok(ChainType::Water),
            _ => Ok(ChainType::Other),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainType::Protein => "Protein",
                ChainType::DNA => "DNA",
                ChainType::RNA => "RNA",
                ChainType::Ligand => "Ligand",
                ChainType::Water => "Water",
                ChainType::Other => "Other",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,                    // Chain identifier (e.g., 'A', 'B')
    pub chain_type: ChainType,       // Type of the chain
    pub model: usize,                // Model (frame) the chain belongs to
    pub(crate) residues: Vec<usize>, // Ordered residue indices
}

impl Chain {
    pub(crate) fn new(id: char, chain_type: ChainType, model: usize) -> Self {
        Self {
            id,
            chain_type,
            model,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[usize] {
        &self.residues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_type_parses_known_names_and_defaults_to_other() {
        assert_eq!("Protein".parse::<ChainType>().unwrap(), ChainType::Protein);
        assert_eq!("dna".parse::<ChainType>().unwrap(), ChainType::DNA);
        assert_eq!("solvent".parse::<ChainType>().unwrap(), ChainType::Other);
    }

    #[test]
    fn polymer_chain_types() {
        assert!(ChainType::Protein.is_polymer());
        assert!(ChainType::RNA.is_polymer());
        assert!(!ChainType::Ligand.is_polymer());
        assert!(!ChainType::Water.is_polymer());
    }

    #[test]
    fn new_chain_is_empty() {
        let chain = Chain::new('A', ChainType::Protein, 0);
        assert_eq!(chain.id, 'A');
        assert!(chain.residues().is_empty());
        assert_eq!(chain.to_owned().chain_type.to_string(), "Protein");
    }
}
