use nalgebra::{Point3, Rotation3, Unit, Vector3};
use std::f64::consts::PI;

/// Ideal tetrahedral angle in degrees.
pub const TETRAHEDRAL_ANGLE: f64 = 109.471_220_634_490_7;

const PARALLEL_EPSILON: f64 = 1e-12;

/// Returns the rotation that maps the direction of `from` onto the direction of `to`.
///
/// Unlike [`Rotation3::rotation_between`], antiparallel inputs are handled by a half
/// turn about an axis perpendicular to `from`. Returns `None` only for zero-length input.
pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Rotation3<f64>> {
    let from = from.try_normalize(PARALLEL_EPSILON)?;
    let to = to.try_normalize(PARALLEL_EPSILON)?;

    let half_turn = || {
        let axis = Unit::new_normalize(any_perpendicular(&from));
        Rotation3::from_axis_angle(&axis, PI)
    };
    if from.dot(&to) < -1.0 + 1e-9 {
        return Some(half_turn());
    }
    Some(Rotation3::rotation_between(&from, &to).unwrap_or_else(half_turn))
}

/// Some unit vector perpendicular to `v` (which must be non-zero).
pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let helper = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&helper).normalize()
}

/// Squared distance between two points projected onto the xy plane.
pub fn planar_distance_squared(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Places the missing hydrogens of an sp3 centre bonded to 1, 2 or 3 heavy neighbors.
///
/// Returns `None` for any other neighbor count or for degenerate (coincident or
/// collinear) neighbor geometry.
pub fn generate_sp3_hydrogens(
    base_pos: &Point3<f64>,
    neighbors: &[Point3<f64>],
    bond_length: f64,
) -> Option<Vec<Point3<f64>>> {
    let neighbor_vecs = neighbors
        .iter()
        .map(|p| (p - base_pos).try_normalize(PARALLEL_EPSILON))
        .collect::<Option<Vec<_>>>()?;

    match neighbor_vecs.as_slice() {
        [n1] => {
            let tilt_axis = Unit::new_normalize(any_perpendicular(n1));
            let spin = Rotation3::from_axis_angle(&Unit::new_normalize(*n1), 120f64.to_radians());

            let h1_dir =
                Rotation3::from_axis_angle(&tilt_axis, TETRAHEDRAL_ANGLE.to_radians()) * n1;
            let h2_dir = spin * h1_dir;
            let h3_dir = spin * h2_dir;
            Some(
                [h1_dir, h2_dir, h3_dir]
                    .iter()
                    .map(|d| base_pos + d * bond_length)
                    .collect(),
            )
        }
        [n1, n2] => {
            let bisector = (n1 + n2).try_normalize(PARALLEL_EPSILON)?;
            let normal = n1.cross(n2).try_normalize(PARALLEL_EPSILON)?;
            let half = (TETRAHEDRAL_ANGLE / 2.0).to_radians();

            let h1_dir = -bisector * half.cos() + normal * half.sin();
            let h2_dir = -bisector * half.cos() - normal * half.sin();
            Some(vec![
                base_pos + h1_dir * bond_length,
                base_pos + h2_dir * bond_length,
            ])
        }
        [n1, n2, n3] => {
            let h_dir = -(n1 + n2 + n3).try_normalize(PARALLEL_EPSILON)?;
            Some(vec![base_pos + h_dir * bond_length])
        }
        _ => None,
    }
}
