use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{AtomGeometry, assign_geometry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// When to overwrite charges or hydrogen counts present in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignPolicy {
    Always,
    /// Assign only where the input value is zero or absent.
    #[default]
    Auto,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValenceParams {
    pub assign_charge: AssignPolicy,
    pub assign_h: AssignPolicy,
}

/// Per-atom charge, hydrogen count and ideal geometry, indexed by atom index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValenceModel {
    pub charge: Vec<i8>,
    pub implicit_h: Vec<i8>,
    pub total_h: Vec<i8>,
    pub ideal_geometry: Vec<AtomGeometry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomValence {
    pub charge: i8,
    pub implicit_h: i8,
    pub total_h: i8,
    pub geometry: AtomGeometry,
}

impl ValenceModel {
    #[instrument(skip_all, name = "valence_model")]
    pub fn compute(system: &MolecularSystem, params: &ValenceParams) -> Self {
        let n = system.atom_count();
        let mut model = Self {
            charge: Vec::with_capacity(n),
            implicit_h: Vec::with_capacity(n),
            total_h: Vec::with_capacity(n),
            ideal_geometry: Vec::with_capacity(n),
        };
        let mut unhandled: BTreeMap<Element, usize> = BTreeMap::new();

        for atom in 0..n {
            let (valence, handled) = atom_valence(system, atom, params);
            if !handled {
                *unhandled.entry(system.element(atom)).or_default() += 1;
            }
            model.charge.push(valence.charge);
            model.implicit_h.push(valence.implicit_h);
            model.total_h.push(valence.total_h);
            model.ideal_geometry.push(valence.geometry);
        }

        for (element, count) in unhandled {
            warn!(
                element = %element,
                atoms = count,
                "No charge/protonation rules for element; keeping neutral defaults."
            );
        }
        debug!(atoms = n, "Valence model computed.");
        model
    }

    pub fn len(&self) -> usize {
        self.charge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charge.is_empty()
    }

    pub fn get(&self, atom: usize) -> AtomValence {
        AtomValence {
            charge: self.charge[atom],
            implicit_h: self.implicit_h[atom],
            total_h: self.total_h[atom],
            geometry: self.ideal_geometry[atom],
        }
    }
}

/// Sum of bond orders, with aromatic bonds counted as 1.5 and the total floored.
pub fn explicit_valence(system: &MolecularSystem, atom: usize) -> i32 {
    let half_units: i32 = system
        .bonds_of(atom)
        .iter()
        .map(|(_, order)| order.half_units() as i32)
        .sum();
    half_units / 2
}

/// Whether the atom takes part in a pi system.
///
/// Any multiple bond qualifies. N and O also qualify when a neighbour carries a
/// multiple bond, unless that neighbour is P or S bonded to O (sulfonamide and
/// phosphonamide N stay sp3). N or O with four bonds is never conjugated.
pub fn is_conjugated(system: &MolecularSystem, atom: usize) -> bool {
    let element = system.element(atom);
    let hetero = element == Element::N || element == Element::O;

    if hetero && system.bond_count(atom) == 4 {
        return false;
    }

    system.bonds_of(atom).iter().any(|&(neighbor, order)| {
        if order.is_multiple() {
            return true;
        }
        if !hetero {
            return false;
        }
        let neighbor_element = system.element(neighbor);
        system.bonds_of(neighbor).iter().any(|&(other, order2)| {
            order2.is_multiple()
                && !((neighbor_element == Element::P || neighbor_element == Element::S)
                    && system.element(other) == Element::O)
        })
    })
}

/// Computes charge, implicit hydrogens and geometry of a single atom.
///
/// The second value is `false` when the element has no rules, in which case
/// the formal charge is kept and the geometry is unknown.
pub fn atom_valence(
    system: &MolecularSystem,
    atom: usize,
    params: &ValenceParams,
) -> (AtomValence, bool) {
    let element = system.element(atom);
    let hydrogen_count = system.bond_to_element_count(atom, Element::H) as i32;
    let mut charge = system
        .atom(atom)
        .and_then(|a| a.formal_charge)
        .unwrap_or(0) as i32;

    let assign_charge = match params.assign_charge {
        AssignPolicy::Always => true,
        AssignPolicy::Auto => charge == 0,
        AssignPolicy::Never => false,
    };
    let assign_h = match params.assign_h {
        AssignPolicy::Always => true,
        AssignPolicy::Auto => hydrogen_count == 0,
        AssignPolicy::Never => false,
    };

    let degree = system.bond_count(atom) as i32;
    let valence = explicit_valence(system, atom);
    let conjugated = is_conjugated(system, atom);
    let multi_bond = valence - degree > 0;

    let mut implicit_h = 0;
    let mut geometry = AtomGeometry::Unknown;
    let mut handled = true;

    match element {
        Element::H => {
            if assign_charge {
                match degree {
                    0 => {
                        charge = 1;
                        geometry = AtomGeometry::Spherical;
                    }
                    1 => {
                        charge = 0;
                        geometry = AtomGeometry::Terminal;
                    }
                    _ => {}
                }
            }
        }
        Element::C => {
            if assign_charge {
                charge = 0;
            }
            if assign_h {
                // Carbocations and carbanions are trivalent.
                implicit_h = (4 - valence - charge.abs()).max(0);
            }
            // Carbocation planar, carbanion tetrahedral.
            geometry = assign_geometry(degree + implicit_h + (-charge).max(0));
        }
        Element::N => {
            if assign_charge {
                charge = if !assign_h {
                    valence - 3
                } else if conjugated && valence < 4 {
                    // Neutral unless the double-bonded N of an amidine/guanidine.
                    if degree - hydrogen_count == 1 && valence - hydrogen_count == 2 {
                        1
                    } else {
                        0
                    }
                } else {
                    let bound_to_s_or_metal = system.bonded_atoms(atom).any(|a| {
                        let e = system.element(a);
                        e == Element::S || e.is_metal()
                    });
                    if bound_to_s_or_metal { 0 } else { 1 }
                };
            }
            if assign_h {
                implicit_h = (3 - valence + charge).max(0);
            }
            geometry = if conjugated && !multi_bond {
                // Amide or anilinic N: the lone pair is part of the pi system.
                assign_geometry(degree + implicit_h - charge)
            } else {
                assign_geometry(degree + implicit_h + 1 - charge)
            };
        }
        Element::O => {
            if assign_charge {
                if !assign_h {
                    charge = valence - 2;
                }
                if valence == 1 && has_sibling_oxo(system, atom) {
                    charge = -1;
                }
            }
            if assign_h {
                implicit_h = (2 - valence + charge).max(0);
            }
            geometry = if conjugated && !multi_bond {
                assign_geometry(degree + implicit_h - charge + 1)
            } else {
                assign_geometry(degree + implicit_h - charge + 2)
            };
        }
        // Thiols, thiolates, thioethers and sulfonium only; oxidised S stays neutral.
        Element::S => {
            if assign_charge && !assign_h {
                charge = if valence <= 3 && system.bond_to_element_count(atom, Element::O) == 0 {
                    valence - 2
                } else {
                    0
                };
            }
            if assign_h && valence < 2 {
                implicit_h = (2 - valence + charge).max(0);
            }
            if valence <= 3 {
                geometry = assign_geometry(degree + implicit_h - charge + 2);
            }
        }
        e if e.is_halogen() => {
            if assign_charge {
                charge = valence - 1;
            }
        }
        e if e.is_alkali_metal() => {
            if assign_charge {
                charge = 1 - valence;
            }
        }
        e if e.is_alkaline_earth_metal() => {
            if assign_charge {
                charge = 2 - valence;
            }
        }
        _ => handled = false,
    }

    let to_i8 = |v: i32| v.clamp(i8::MIN as i32, i8::MAX as i32) as i8;
    (
        AtomValence {
            charge: to_i8(charge),
            implicit_h: to_i8(implicit_h),
            total_h: to_i8(implicit_h + hydrogen_count),
            geometry,
        },
        handled,
    )
}

/// A neighbour of `atom` carries a double bond to another oxygen (carboxylate,
/// nitro, phosphate, sulfate pattern).
fn has_sibling_oxo(system: &MolecularSystem, atom: usize) -> bool {
    system.bonded_atoms(atom).any(|neighbor| {
        system.bonds_of(neighbor).iter().any(|&(other, order)| {
            other != atom
                && system.element(other) == Element::O
                && order == crate::core::models::topology::BondOrder::Double
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    struct Builder {
        system: MolecularSystem,
        residue: usize,
    }

    impl Builder {
        fn new(residue_name: &str) -> Self {
            let mut system = MolecularSystem::new();
            let chain = system.add_chain('A', ChainType::Ligand);
            let residue = system.add_residue(chain, 1, residue_name).unwrap();
            Self { system, residue }
        }

        fn atom(&mut self, name: &str, element: Element) -> usize {
            let n = self.system.atom_count() as f64;
            self.system
                .add_atom(self.residue, Atom::new(name, element, Point3::new(n, 0.0, 0.0)))
                .unwrap()
        }

        fn charged(&mut self, name: &str, element: Element, charge: i8) -> usize {
            self.system
                .add_atom(
                    self.residue,
                    Atom::new(name, element, Point3::origin()).with_formal_charge(charge),
                )
                .unwrap()
        }

        fn bond(&mut self, a: usize, b: usize, order: BondOrder) {
            self.system.add_bond(a, b, order).unwrap();
        }

        fn model(&self) -> ValenceModel {
            ValenceModel::compute(&self.system, &ValenceParams::default())
        }
    }

    #[test]
    fn methane_carbon_is_neutral_tetrahedral_without_implicit_h() {
        let mut b = Builder::new("CH4");
        let c = b.atom("C", Element::C);
        for i in 0..4 {
            let h = b.atom(&format!("H{i}"), Element::H);
            b.bond(c, h, BondOrder::Single);
        }
        let v = b.model().get(c);
        assert_eq!(v.charge, 0);
        assert_eq!(v.implicit_h, 0);
        assert_eq!(v.total_h, 4);
        assert_eq!(v.geometry, AtomGeometry::Tetrahedral);
    }

    #[test]
    fn carboxylate_carbon_is_trigonal_and_oxygen_is_negative() {
        let mut b = Builder::new("ACT");
        let ch3 = b.atom("C2", Element::C);
        let c = b.atom("C1", Element::C);
        let o1 = b.atom("O1", Element::O);
        let o2 = b.atom("O2", Element::O);
        b.bond(ch3, c, BondOrder::Single);
        b.bond(c, o1, BondOrder::Double);
        b.bond(c, o2, BondOrder::Single);

        let model = b.model();
        assert_eq!(model.get(c).geometry, AtomGeometry::Trigonal);
        assert_eq!(model.get(c).implicit_h, 0);
        assert_eq!(model.get(o2).charge, -1);
        assert_eq!(model.get(o2).implicit_h, 0);
        assert_eq!(model.get(o1).charge, 0);
        assert_eq!(model.get(o1).geometry, AtomGeometry::Trigonal);
        assert_eq!(model.get(ch3).implicit_h, 3);
        assert_eq!(model.get(ch3).geometry, AtomGeometry::Tetrahedral);
    }

    #[test]
    fn amine_nitrogen_without_hydrogens_is_protonated() {
        let mut b = Builder::new("MAM");
        let c = b.atom("C", Element::C);
        let n = b.atom("N", Element::N);
        b.bond(c, n, BondOrder::Single);
        let v = b.model().get(n);
        assert_eq!(v.charge, 1);
        assert_eq!(v.implicit_h, 3);
        assert_eq!(v.geometry, AtomGeometry::Tetrahedral);
    }

    #[test]
    fn amide_nitrogen_is_neutral_and_trigonal() {
        let mut b = Builder::new("ACM");
        let c = b.atom("C", Element::C);
        let o = b.atom("O", Element::O);
        let n = b.atom("N", Element::N);
        b.bond(c, o, BondOrder::Double);
        b.bond(c, n, BondOrder::Single);
        let model = b.model();
        assert!(is_conjugated(&b.system, n));
        let v = model.get(n);
        assert_eq!(v.charge, 0);
        assert_eq!(v.implicit_h, 2);
        assert_eq!(v.geometry, AtomGeometry::Trigonal);
    }

    #[test]
    fn sulfonamide_nitrogen_is_not_conjugated() {
        let mut b = Builder::new("SFA");
        let s = b.atom("S", Element::S);
        let o = b.atom("O", Element::O);
        let n = b.atom("N", Element::N);
        b.bond(s, o, BondOrder::Double);
        b.bond(s, n, BondOrder::Single);
        assert!(!is_conjugated(&b.system, n));
        // Bound to sulfur, so not protonated.
        assert_eq!(b.model().get(n).charge, 0);
    }

    #[test]
    fn explicit_hydrogens_drive_nitrogen_charge() {
        let mut b = Builder::new("NH4");
        let n = b.atom("N", Element::N);
        for i in 0..4 {
            let h = b.atom(&format!("H{i}"), Element::H);
            b.bond(n, h, BondOrder::Single);
        }
        let model = b.model();
        let v = model.get(n);
        assert_eq!(v.charge, 1);
        assert_eq!(v.implicit_h, 0);
        assert_eq!(v.total_h, 4);
        assert_eq!(model.get(1).geometry, AtomGeometry::Terminal);
    }

    #[test]
    fn isolated_water_oxygen_gets_two_implicit_hydrogens() {
        let mut b = Builder::new("HOH");
        let o = b.atom("O", Element::O);
        let v = b.model().get(o);
        assert_eq!(v.charge, 0);
        assert_eq!(v.implicit_h, 2);
        assert_eq!(v.geometry, AtomGeometry::Tetrahedral);
    }

    #[test]
    fn ions_take_charge_from_group() {
        let mut b = Builder::new("ION");
        let na = b.atom("NA", Element::NA);
        let mg = b.atom("MG", Element::MG);
        let cl = b.atom("CL", Element::CL);
        let model = b.model();
        assert_eq!(model.get(na).charge, 1);
        assert_eq!(model.get(mg).charge, 2);
        assert_eq!(model.get(cl).charge, -1);
        assert_eq!(model.get(na).implicit_h, 0);
    }

    #[test]
    fn thiol_sulfur_without_hydrogens_gets_one_implicit_h() {
        let mut b = Builder::new("MSH");
        let c = b.atom("C", Element::C);
        let s = b.atom("S", Element::S);
        let h = b.atom("HC", Element::H);
        b.bond(c, s, BondOrder::Single);
        b.bond(c, h, BondOrder::Single);
        let v = b.model().get(s);
        // No H on S: assign hydrogens, so charge stays neutral.
        assert_eq!(v.charge, 0);
        assert_eq!(v.implicit_h, 1);
        assert_eq!(v.geometry, AtomGeometry::Tetrahedral);
    }

    #[test]
    fn unhandled_elements_keep_neutral_defaults() {
        let mut b = Builder::new("FE");
        let fe = b.atom("FE", Element::FE);
        let (v, handled) = atom_valence(&b.system, fe, &ValenceParams::default());
        assert!(!handled);
        assert_eq!(v.charge, 0);
        assert_eq!(v.implicit_h, 0);
        assert_eq!(v.geometry, AtomGeometry::Unknown);
        assert_eq!(b.model().get(fe), v);
    }

    #[test]
    fn never_policy_preserves_formal_charge() {
        let mut b = Builder::new("LIG");
        let c = b.atom("C", Element::C);
        let n = b.charged("N", Element::N, -1);
        b.bond(c, n, BondOrder::Single);
        let params = ValenceParams {
            assign_charge: AssignPolicy::Never,
            assign_h: AssignPolicy::Never,
        };
        let (v, _) = atom_valence(&b.system, n, &params);
        assert_eq!(v.charge, -1);
        assert_eq!(v.implicit_h, 0);

        // Auto keeps a non-zero input charge as well.
        let (auto, _) = atom_valence(&b.system, n, &ValenceParams::default());
        assert_eq!(auto.charge, -1);
    }

    #[test]
    fn aromatic_bonds_count_one_and_a_half() {
        let mut b = Builder::new("PYR");
        let n = b.atom("N1", Element::N);
        let c1 = b.atom("C1", Element::C);
        let c2 = b.atom("C2", Element::C);
        b.bond(n, c1, BondOrder::Aromatic);
        b.bond(n, c2, BondOrder::Aromatic);
        assert_eq!(explicit_valence(&b.system, n), 3);
        let v = b.model().get(n);
        // Pyridine-type N: neutral, no hydrogens, trigonal lone pair.
        assert_eq!(v.charge, 0);
        assert_eq!(v.implicit_h, 0);
        assert_eq!(v.geometry, AtomGeometry::Trigonal);
    }
}
