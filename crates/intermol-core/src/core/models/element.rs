use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SYMBOLS: [&str; 104] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
];

/// A chemical element, identified by its atomic number.
///
/// `Element::UNKNOWN` (atomic number 0) stands in for unrecognised symbols so that
/// downstream perception can degrade gracefully instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Element(u8);

impl Element {
    pub const UNKNOWN: Element = Element(0);
    pub const H: Element = Element(1);
    pub const LI: Element = Element(3);
    pub const BE: Element = Element(4);
    pub const B: Element = Element(5);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const NA: Element = Element(11);
    pub const MG: Element = Element(12);
    pub const AL: Element = Element(13);
    pub const SI: Element = Element(14);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const CL: Element = Element(17);
    pub const K: Element = Element(19);
    pub const CA: Element = Element(20);
    pub const SC: Element = Element(21);
    pub const FE: Element = Element(26);
    pub const CU: Element = Element(29);
    pub const ZN: Element = Element(30);
    pub const GA: Element = Element(31);
    pub const SE: Element = Element(34);
    pub const BR: Element = Element(35);
    pub const RB: Element = Element(37);
    pub const SR: Element = Element(38);
    pub const CD: Element = Element(48);
    pub const IN: Element = Element(49);
    pub const SN: Element = Element(50);
    pub const SB: Element = Element(51);
    pub const I: Element = Element(53);
    pub const CS: Element = Element(55);
    pub const BA: Element = Element(56);
    pub const HG: Element = Element(80);
    pub const TL: Element = Element(81);
    pub const PB: Element = Element(82);
    pub const BI: Element = Element(83);
    pub const AT: Element = Element(85);
    pub const FR: Element = Element(87);
    pub const RA: Element = Element(88);

    pub const fn new(atomic_number: u8) -> Self {
        Self(atomic_number)
    }

    pub const fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS.get(self.0 as usize).copied().unwrap_or("X")
    }

    /// Looks up an element by symbol, ignoring case and surrounding whitespace.
    /// Deuterium and tritium (`D`, `T`) map to hydrogen.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let symbol = symbol.trim();
        if symbol.eq_ignore_ascii_case("D") || symbol.eq_ignore_ascii_case("T") {
            return Some(Self::H);
        }
        SYMBOLS
            .iter()
            .skip(1)
            .position(|s| s.eq_ignore_ascii_case(symbol))
            .map(|idx| Self((idx + 1) as u8))
    }

    pub fn is_hydrogen(self) -> bool {
        self == Self::H
    }

    pub fn is_halogen(self) -> bool {
        matches!(self.0, 9 | 17 | 35 | 53 | 85)
    }

    pub fn is_alkali_metal(self) -> bool {
        matches!(self.0, 3 | 11 | 19 | 37 | 55 | 87)
    }

    pub fn is_alkaline_earth_metal(self) -> bool {
        matches!(self.0, 4 | 12 | 20 | 38 | 56 | 88)
    }

    pub fn is_transition_metal(self) -> bool {
        matches!(self.0, 21..=29 | 39..=47 | 72..=79 | 104..=108)
    }

    pub fn is_lanthanide_or_actinide(self) -> bool {
        matches!(self.0, 57..=71 | 89..=103)
    }

    pub fn is_post_transition_metal(self) -> bool {
        matches!(self.0, 13 | 30 | 31 | 48 | 49 | 50 | 80 | 81 | 82 | 83 | 84)
    }

    pub fn is_metal(self) -> bool {
        self.is_alkali_metal()
            || self.is_alkaline_earth_metal()
            || self.is_transition_metal()
            || self.is_lanthanide_or_actinide()
            || self.is_post_transition_metal()
    }

    /// Metals whose coordination is dominated by ionic rather than dative interactions.
    pub fn is_ionic_type_metal(self) -> bool {
        matches!(
            self,
            Self::LI
                | Self::NA
                | Self::K
                | Self::RB
                | Self::CS
                | Self::MG
                | Self::CA
                | Self::SR
                | Self::BA
                | Self::AL
                | Self::GA
                | Self::IN
                | Self::TL
                | Self::SC
                | Self::SN
                | Self::PB
                | Self::BI
                | Self::SB
                | Self::HG
        )
    }

    /// Van der Waals radius in Angstroms (Bondi, with common fallbacks).
    pub fn vdw_radius(self) -> f64 {
        match self.0 {
            1 => 1.1,
            2 => 1.4,
            3 => 1.81,
            5 => 1.92,
            6 => 1.7,
            7 => 1.55,
            8 => 1.52,
            9 => 1.47,
            10 => 1.54,
            11 => 2.27,
            12 => 1.73,
            13 => 1.84,
            14 => 2.1,
            15 => 1.8,
            16 => 1.8,
            17 => 1.75,
            18 => 1.88,
            19 => 2.75,
            20 => 2.31,
            26 => 2.0,
            28 => 1.63,
            29 => 1.4,
            30 => 1.39,
            31 => 1.87,
            33 => 1.85,
            34 => 1.9,
            35 => 1.85,
            36 => 2.02,
            37 => 3.03,
            38 => 2.49,
            46 => 1.63,
            47 => 1.72,
            48 => 1.58,
            49 => 1.93,
            50 => 2.17,
            52 => 2.06,
            53 => 1.98,
            54 => 2.16,
            55 => 3.43,
            56 => 2.68,
            78 => 1.75,
            79 => 1.66,
            80 => 1.55,
            81 => 1.96,
            82 => 2.02,
            83 => 2.07,
            92 => 1.86,
            _ => 2.0,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| ParseElementError(s.to_string()))
    }
}
