//! Calculation of protein dihedral angles (phi, psi)

use glam::Vec3;

/// Calculates the dihedral angle (torsion angle) between four points in degrees
pub fn calculate_dihedral_angle_between_points(
    first_point: Vec3,
    second_point: Vec3,
    third_point: Vec3,
    fourth_point: Vec3,
) -> f32 {
    let vector_from_first_to_second = second_point - first_point;
    let vector_from_second_to_third = third_point - second_point;
    let vector_from_third_to_fourth = fourth_point - third_point;

    let normal_vector_of_first_plane = vector_from_first_to_second.cross(vector_from_second_to_third);
    let normal_vector_of_second_plane = vector_from_second_to_third.cross(vector_from_third_to_fourth);

    let orthogonal_component_vector = normal_vector_of_first_plane.cross(normal_vector_of_second_plane);

    let sine_of_dihedral_angle = orthogonal_component_vector.dot(vector_from_second_to_third.normalize());
    let cosine_of_dihedral_angle = normal_vector_of_first_plane.dot(normal_vector_of_second_plane);

    sine_of_dihedral_angle.atan2(cosine_of_dihedral_angle).to_degrees()
}

/// Angle at `vertex` between the rays to `first_point` and `second_point`, in degrees
pub fn calculate_bond_angle_at_vertex(first_point: Vec3, vertex: Vec3, second_point: Vec3) -> f32 {
    (first_point - vertex).angle_between(second_point - vertex).to_degrees()
}

/// Backbone dihedral angles for a single residue; termini lack one of them
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BackboneDihedralAngles {
    pub phi_angle: Option<f32>,
    pub psi_angle: Option<f32>,
}
