//! Calculation of Phi/Psi angles for Ramachandran plots

use serde::{Deserialize, Serialize};

use super::dihedrals::{calculate_dihedral_angle_between_points, BackboneDihedralAngles};
use crate::protein::{Residue, Structure};

/// Represents a point on a Ramachandran plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamachandranPoint {
    pub phi_angle: f32,
    pub psi_angle: f32,
    pub residue_name: String,
    pub residue_number: isize,
    pub chain_identifier: String,
}

/// Calculates Ramachandran (Phi/Psi) angles for all residues in a structure
///
/// Neighbours are taken from consecutive residues of the same chain; chain
/// termini and residues missing backbone atoms produce no point.
pub fn calculate_ramachandran_angles(structure: &Structure) -> Vec<RamachandranPoint> {
    let mut calculated_ramachandran_points = Vec::new();

    for (chain_identifier, residues_in_chain) in structure.chains() {
        for residue_index in 0..residues_in_chain.len() {
            let current_residue = residues_in_chain[residue_index];
            let previous_residue = residue_index
                .checked_sub(1)
                .map(|previous_index| residues_in_chain[previous_index]);
            let next_residue = residues_in_chain.get(residue_index + 1).copied();

            let backbone_dihedral_angles =
                calculate_backbone_dihedrals(previous_residue, current_residue, next_residue);

            if let (Some(phi_angle_value), Some(psi_angle_value)) =
                (backbone_dihedral_angles.phi_angle, backbone_dihedral_angles.psi_angle)
            {
                calculated_ramachandran_points.push(RamachandranPoint {
                    phi_angle: phi_angle_value,
                    psi_angle: psi_angle_value,
                    residue_name: current_residue.name.clone(),
                    residue_number: current_residue.serial_number,
                    chain_identifier: chain_identifier.to_string(),
                });
            }
        }
    }

    calculated_ramachandran_points
}

/// Phi: C(i-1) - N(i) - CA(i) - C(i); Psi: N(i) - CA(i) - C(i) - N(i+1)
pub fn calculate_backbone_dihedrals(
    previous_residue: Option<&Residue>,
    current_residue: &Residue,
    next_residue: Option<&Residue>,
) -> BackboneDihedralAngles {
    let mut backbone_dihedral_angles = BackboneDihedralAngles::default();

    let (Some(position_n), Some(position_ca), Some(position_c)) = (
        find_atom_position_within_residue(current_residue, "N"),
        find_atom_position_within_residue(current_residue, "CA"),
        find_atom_position_within_residue(current_residue, "C"),
    ) else {
        return backbone_dihedral_angles;
    };

    if let Some(previous_carbonyl_carbon_position) =
        previous_residue.and_then(|residue| find_atom_position_within_residue(residue, "C"))
    {
        backbone_dihedral_angles.phi_angle = Some(calculate_dihedral_angle_between_points(
            previous_carbonyl_carbon_position,
            position_n,
            position_ca,
            position_c,
        ));
    }

    if let Some(next_nitrogen_atom_position) =
        next_residue.and_then(|residue| find_atom_position_within_residue(residue, "N"))
    {
        backbone_dihedral_angles.psi_angle = Some(calculate_dihedral_angle_between_points(
            position_n,
            position_ca,
            position_c,
            next_nitrogen_atom_position,
        ));
    }

    backbone_dihedral_angles
}

fn find_atom_position_within_residue(residue: &Residue, target_atom_name: &str) -> Option<glam::Vec3> {
    residue.find_atom(target_atom_name).map(|atom| atom.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protein::Atom;
    use glam::Vec3;

    fn backbone_residue(name: &str, serial_number: isize, n: Vec3, ca: Vec3, c: Vec3) -> Residue {
        Residue::new(name, "A", serial_number, false)
            .with_atom(Atom::new("N", n))
            .with_atom(Atom::new("CA", ca))
            .with_atom(Atom::new("C", c))
    }

    fn tripeptide() -> Structure {
        Structure::new(
            "tripeptide",
            vec![
                backbone_residue(
                    "ALA",
                    1,
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                ),
                backbone_residue(
                    "GLY",
                    2,
                    Vec3::new(1.0, 0.0, 1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(2.0, 1.0, 1.0),
                ),
                backbone_residue(
                    "SER",
                    3,
                    Vec3::new(2.0, 1.0, 2.0),
                    Vec3::new(2.0, 2.0, 2.0),
                    Vec3::new(3.0, 2.0, 2.0),
                ),
            ],
        )
    }

    #[test]
    fn only_interior_residues_get_points() {
        let points = calculate_ramachandran_angles(&tripeptide());
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].residue_name, "GLY");
        assert_eq!(points[0].residue_number, 2);
        assert_eq!(points[0].chain_identifier, "A");
    }

    #[test]
    fn angles_match_direct_dihedral_computation() {
        let structure = tripeptide();
        let points = calculate_ramachandran_angles(&structure);
        let expected_phi = calculate_dihedral_angle_between_points(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 1.0, 1.0),
        );
        let expected_psi = calculate_dihedral_angle_between_points(
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 1.0, 1.0),
            Vec3::new(2.0, 1.0, 2.0),
        );
        assert!((points[0].phi_angle - expected_phi).abs() < 1e-4);
        assert!((points[0].psi_angle - expected_psi).abs() < 1e-4);
    }

    #[test]
    fn chain_breaks_stop_neighbour_lookup() {
        let mut residues: Vec<Residue> = tripeptide().residues().cloned().collect();
        residues[2].chain_id = "B".to_string();
        let structure = Structure::new("split", residues);
        assert!(calculate_ramachandran_angles(&structure).is_empty());
    }

    #[test]
    fn residues_missing_backbone_atoms_are_skipped() {
        let dihedrals = calculate_backbone_dihedrals(None, &Residue::new("HOH", "A", 1, false), None);
        assert_eq!(dihedrals, BackboneDihedralAngles::default());
    }
}
