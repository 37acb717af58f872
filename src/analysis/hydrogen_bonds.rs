//! Geometric detection of backbone hydrogen bonds
//!
//! Donors are amide nitrogens (`N`), hydrogens are atoms named `H` close
//! enough to a donor to be bonded to it, and acceptors are carbonyl oxygens
//! (`O`). A donor-hydrogen-acceptor triple counts when the donor-acceptor
//! distance and the D-H-A angle both pass [`HydrogenBondCriteria`].
//! Structures deposited without hydrogens therefore report no bonds.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::dihedrals::calculate_bond_angle_at_vertex;
use crate::config::HydrogenBondCriteria;
use crate::protein::Structure;

const DONOR_ATOM_NAME: &str = "N";
const HYDROGEN_ATOM_NAME: &str = "H";
const ACCEPTOR_ATOM_NAME: &str = "O";

/// Represents a detected hydrogen bond; indices follow `Structure::atoms()` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrogenBond {
    pub donor_atom_index: usize,
    pub hydrogen_atom_index: usize,
    pub acceptor_atom_index: usize,
    pub donor_acceptor_distance: f32,
    pub donor_hydrogen_acceptor_angle: f32,
}

/// Identifies hydrogen bonds based on distance and angle criteria
pub fn detect_hydrogen_bonds(structure: &Structure, criteria: &HydrogenBondCriteria) -> Vec<HydrogenBond> {
    let atom_info_list: Vec<(usize, Vec3, &str)> = structure
        .atoms()
        .enumerate()
        .map(|(atom_index, atom)| (atom_index, atom.position, atom.name.as_str()))
        .collect();

    let select_by_name = |target_name: &str| -> Vec<(usize, Vec3)> {
        atom_info_list
            .iter()
            .filter(|(_, _, atom_name)| *atom_name == target_name)
            .map(|&(atom_index, position, _)| (atom_index, position))
            .collect()
    };
    let donors = select_by_name(DONOR_ATOM_NAME);
    let hydrogens = select_by_name(HYDROGEN_ATOM_NAME);
    let acceptors = select_by_name(ACCEPTOR_ATOM_NAME);

    let donor_hydrogen_cutoff_squared = criteria.donor_hydrogen_cutoff * criteria.donor_hydrogen_cutoff;
    let donor_hydrogen_pairs: Vec<((usize, Vec3), (usize, Vec3))> = donors
        .iter()
        .flat_map(|&donor| {
            hydrogens
                .iter()
                .filter(move |&&(_, hydrogen_position)| {
                    donor.1.distance_squared(hydrogen_position) <= donor_hydrogen_cutoff_squared
                })
                .map(move |&hydrogen| (donor, hydrogen))
        })
        .collect();

    let donor_acceptor_cutoff_squared = criteria.donor_acceptor_cutoff * criteria.donor_acceptor_cutoff;
    let acceptor_slice = acceptors.as_slice();

    let identified_hydrogen_bonds: Vec<HydrogenBond> = donor_hydrogen_pairs
        .par_iter()
        .flat_map_iter(|&((donor_atom_index, donor_position), (hydrogen_atom_index, hydrogen_position))| {
            acceptor_slice
                .iter()
                .filter_map(move |&(acceptor_atom_index, acceptor_position)| {
                    let distance_squared = donor_position.distance_squared(acceptor_position);
                    if distance_squared > donor_acceptor_cutoff_squared {
                        return None;
                    }
                    let angle_degrees =
                        calculate_bond_angle_at_vertex(donor_position, hydrogen_position, acceptor_position);
                    (angle_degrees >= criteria.angle_cutoff_degrees).then(|| HydrogenBond {
                        donor_atom_index,
                        hydrogen_atom_index,
                        acceptor_atom_index,
                        donor_acceptor_distance: distance_squared.sqrt(),
                        donor_hydrogen_acceptor_angle: angle_degrees,
                    })
                })
        })
        .collect();

    log::debug!(
        "{}: {} donor-hydrogen pairs, {} acceptors, {} hydrogen bonds",
        structure.name,
        donor_hydrogen_pairs.len(),
        acceptors.len(),
        identified_hydrogen_bonds.len()
    );
    identified_hydrogen_bonds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protein::{Atom, Residue};

    fn donor_residue(hydrogen_position: Vec3) -> Residue {
        Residue::new("GLY", "A", 1, false)
            .with_atom(Atom::new("N", Vec3::ZERO))
            .with_atom(Atom::new("H", hydrogen_position))
            .with_atom(Atom::new("CA", Vec3::new(-1.0, 1.0, 0.0)))
    }

    fn acceptor_residue(oxygen_position: Vec3) -> Residue {
        Residue::new("ALA", "B", 7, false)
            .with_atom(Atom::new("C", oxygen_position + Vec3::new(1.2, 0.0, 0.0)))
            .with_atom(Atom::new("O", oxygen_position))
    }

    #[test]
    fn linear_contact_is_a_hydrogen_bond() {
        let structure = Structure::new(
            "linear",
            vec![
                donor_residue(Vec3::new(1.0, 0.0, 0.0)),
                acceptor_residue(Vec3::new(2.9, 0.0, 0.0)),
            ],
        );

        let bonds = detect_hydrogen_bonds(&structure, &HydrogenBondCriteria::default());
        assert_eq!(bonds.len(), 1);
        let bond = bonds[0];
        assert_eq!(bond.donor_atom_index, 0);
        assert_eq!(bond.hydrogen_atom_index, 1);
        assert_eq!(bond.acceptor_atom_index, 4);
        assert!((bond.donor_acceptor_distance - 2.9).abs() < 1e-4);
        assert!((bond.donor_hydrogen_acceptor_angle - 180.0).abs() < 1e-2);
    }

    #[test]
    fn distant_acceptor_is_rejected() {
        let structure = Structure::new(
            "far",
            vec![
                donor_residue(Vec3::new(1.0, 0.0, 0.0)),
                acceptor_residue(Vec3::new(3.8, 0.0, 0.0)),
            ],
        );
        assert!(detect_hydrogen_bonds(&structure, &HydrogenBondCriteria::default()).is_empty());
    }

    #[test]
    fn bent_geometry_is_rejected() {
        let structure = Structure::new(
            "bent",
            vec![
                donor_residue(Vec3::new(1.0, 0.0, 0.0)),
                acceptor_residue(Vec3::new(0.5, 2.5, 0.0)),
            ],
        );
        assert!(detect_hydrogen_bonds(&structure, &HydrogenBondCriteria::default()).is_empty());

        let permissive = HydrogenBondCriteria {
            angle_cutoff_degrees: 60.0,
            ..HydrogenBondCriteria::default()
        };
        assert_eq!(detect_hydrogen_bonds(&structure, &permissive).len(), 1);
    }

    #[test]
    fn hydrogen_too_far_from_donor_is_not_bonded() {
        let structure = Structure::new(
            "loose_hydrogen",
            vec![
                donor_residue(Vec3::new(1.5, 0.0, 0.0)),
                acceptor_residue(Vec3::new(2.9, 0.0, 0.0)),
            ],
        );
        assert!(detect_hydrogen_bonds(&structure, &HydrogenBondCriteria::default()).is_empty());
    }

    #[test]
    fn structures_without_hydrogens_have_no_bonds() {
        let structure = Structure::new(
            "heavy_atoms_only",
            vec![
                Residue::new("GLY", "A", 1, false).with_atom(Atom::new("N", Vec3::ZERO)),
                acceptor_residue(Vec3::new(2.9, 0.0, 0.0)),
            ],
        );
        assert!(detect_hydrogen_bonds(&structure, &HydrogenBondCriteria::default()).is_empty());
    }
}
