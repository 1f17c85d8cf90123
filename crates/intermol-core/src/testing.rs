use crate::core::chemistry::valence::ValenceModel;
use crate::core::models::atom::Atom;
use crate::core::models::chain::ChainType;
use crate::core::models::element::Element;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use crate::engine::config::ContactParams;
use crate::engine::contacts::{ContactType, Contacts};
use crate::engine::context::DetectionContext;
use crate::engine::features::detect_features;
use crate::engine::progress::ProgressReporter;
use nalgebra::Point3;

/// Terse construction of small test systems.
pub(crate) struct SystemBuilder {
    system: MolecularSystem,
    next_residue_number: isize,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self {
            system: MolecularSystem::new(),
            next_residue_number: 1,
        }
    }

    pub fn chain(&mut self, id: char, chain_type: ChainType) -> usize {
        self.system.add_chain(id, chain_type)
    }

    pub fn chain_in_model(&mut self, model: usize, id: char, chain_type: ChainType) -> usize {
        self.system.add_chain_in_model(model, id, chain_type)
    }

    pub fn residue(&mut self, chain: usize, number: isize, name: &str) -> usize {
        self.system.add_residue(chain, number, name).unwrap()
    }

    /// New residue on the ligand chain `L` of model 0.
    pub fn ligand(&mut self, name: &str) -> usize {
        let chain = self.system.add_chain('L', ChainType::Ligand);
        let number = self.next_residue_number;
        self.next_residue_number += 1;
        self.residue(chain, number, name)
    }

    pub fn atom(&mut self, residue: usize, name: &str, element: Element, xyz: [f64; 3]) -> usize {
        self.push(residue, Atom::new(name, element, Point3::from(xyz)))
    }

    pub fn push(&mut self, residue: usize, atom: Atom) -> usize {
        self.system.add_atom(residue, atom).unwrap()
    }

    pub fn bond(&mut self, a: usize, b: usize, order: BondOrder) {
        self.system.add_bond(a, b, order).unwrap();
    }

    pub fn ring(&mut self, residue: usize, atoms: &[usize]) {
        self.system.add_ring(residue, atoms.to_vec()).unwrap();
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}

/// Regular hexagon of radius 1.39 Å in the plane through `center` spanned by `u` and `v`.
pub(crate) fn hexagon(center: [f64; 3], u: [f64; 3], v: [f64; 3]) -> Vec<[f64; 3]> {
    (0..6)
        .map(|k| {
            let angle = (k as f64) * std::f64::consts::PI / 3.0;
            let (s, c) = angle.sin_cos();
            [
                center[0] + 1.39 * (c * u[0] + s * v[0]),
                center[1] + 1.39 * (c * u[1] + s * v[1]),
                center[2] + 1.39 * (c * u[2] + s * v[2]),
            ]
        })
        .collect()
}

/// Adds a benzene ring (carbons only, aromatic bonds, ring registered) and
/// returns the ring atoms in cycle order.
pub(crate) fn add_benzene(
    builder: &mut SystemBuilder,
    residue: usize,
    center: [f64; 3],
    u: [f64; 3],
    v: [f64; 3],
) -> Vec<usize> {
    let atoms: Vec<usize> = hexagon(center, u, v)
        .into_iter()
        .enumerate()
        .map(|(k, xyz)| builder.atom(residue, &format!("C{}", k + 1), Element::C, xyz))
        .collect();
    for k in 0..6 {
        builder.bond(atoms[k], atoms[(k + 1) % 6], BondOrder::Aromatic);
    }
    builder.ring(residue, &atoms);
    atoms
}

/// Detects features on `system` and runs one contact task over them.
pub(crate) fn run_task(
    system: &MolecularSystem,
    params: &ContactParams,
    task: fn(&DetectionContext<'_>, &mut Contacts),
) -> Contacts {
    run_tasks(system, params, &[task])
}

/// Like [`run_task`], running several tasks in order over one contact store.
pub(crate) fn run_tasks(
    system: &MolecularSystem,
    params: &ContactParams,
    tasks: &[fn(&DetectionContext<'_>, &mut Contacts)],
) -> Contacts {
    let valence = ValenceModel::compute(system, &params.valence_params());
    let features = detect_features(system, &valence);
    let reporter = ProgressReporter::new();
    let context = DetectionContext::new(system, &valence, params, &reporter).unwrap();
    let mut contacts = Contacts::new(features);
    for task in tasks {
        task(&context, &mut contacts);
    }
    contacts
}

/// Contacts of one type as `(first atom of feature 1, first atom of feature 2)`.
pub(crate) fn atom_pairs(contacts: &Contacts, contact_type: ContactType) -> Vec<(usize, usize)> {
    (0..contacts.store.len())
        .map(|i| contacts.store.get(i))
        .filter(|&(_, _, t)| t == contact_type)
        .map(|(f1, f2, _)| {
            (
                contacts.features.first_atom(f1),
                contacts.features.first_atom(f2),
            )
        })
        .collect()
}
