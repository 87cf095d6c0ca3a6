//! Geometric predicates shared by the spatial index and the link matcher.
//!
//! Both helpers operate on Cartesian [`Point`]s in ångströms and are kept free of any
//! structure context so they can be applied to symmetry-transformed positions directly.

use super::types::Point;

/// Squared Euclidean distance between two positions.
///
/// Never negative, and zero exactly when the positions coincide. Cutoff checks compare
/// against squared radii to avoid the square root.
pub fn squared_distance(a: &Point, b: &Point) -> f64 {
    nalgebra::distance_squared(a, b)
}

/// Signed volume of the tetrahedron spanned at a stereocenter.
///
/// Computes the scalar triple product `(p2 - p1) · ((p3 - p1) × (p4 - p1))`, where `p1` is
/// the chiral center and `p2..p4` are its three ranked substituents. The sign encodes the
/// handedness; a (near) zero value means the four points are coplanar.
///
/// # Arguments
///
/// * `center` - Position of the chiral center.
/// * `p2`, `p3`, `p4` - Positions of the substituents in dictionary order.
pub fn chiral_volume(center: &Point, p2: &Point, p3: &Point, p4: &Point) -> f64 {
    let a = p2 - center;
    let b = p3 - center;
    let c = p4 - center;
    a.dot(&b.cross(&c))
}
