//! Crystallographic unit cell and the symmetry operations that generate its images.
//!
//! The orthogonalization convention is the PDB one: `a` lies along x and `b` in the xy
//! plane. Symmetry operations act on fractional coordinates and are parsed from the usual
//! coordinate triplets (`-x+1/2,y,-z`).

use super::types::Point;
use nalgebra::{Matrix3, Vector3};
use std::str::FromStr;

/// Fractional coordinates relative to the cell axes.
pub type Fractional = Vector3<f64>;

/// Symmetry operation in fractional space: `x' = rot · x + tran`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymOp {
    pub rot: Matrix3<f64>,
    pub tran: Vector3<f64>,
}

impl SymOp {
    pub fn new(rot: Matrix3<f64>, tran: Vector3<f64>) -> Self {
        Self { rot, tran }
    }

    pub fn identity() -> Self {
        Self {
            rot: Matrix3::identity(),
            tran: Vector3::zeros(),
        }
    }

    /// True when the operation leaves every point in place.
    ///
    /// Pure lattice translations are not treated as identities.
    pub fn is_identity(&self) -> bool {
        (self.rot - Matrix3::identity()).abs().max() < 1e-9 && self.tran.abs().max() < 1e-9
    }

    pub fn apply(&self, frac: &Fractional) -> Fractional {
        self.rot * frac + self.tran
    }
}

impl Default for SymOp {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromStr for SymOp {
    type Err = String;

    /// Parses a coordinate triplet such as `-y,x-y,z+1/3` or `X+0.5,-Y,Z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(format!("Invalid symmetry operation: {}", s));
        }

        let mut rot = Matrix3::zeros();
        let mut tran = Vector3::zeros();
        for (row, part) in parts.iter().enumerate() {
            let (coeffs, shift) = parse_triplet_component(part)
                .map_err(|e| format!("Invalid symmetry operation '{}': {}", s, e))?;
            for (col, coeff) in coeffs.iter().enumerate() {
                rot[(row, col)] = *coeff;
            }
            tran[row] = shift;
        }

        Ok(Self { rot, tran })
    }
}

fn axis_index(c: char) -> Option<usize> {
    match c.to_ascii_lowercase() {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        _ => None,
    }
}

fn parse_number(text: &str) -> Result<f64, String> {
    match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().map_err(|_| format!("bad number '{}'", text))?;
            let den: f64 = den.parse().map_err(|_| format!("bad number '{}'", text))?;
            if den == 0.0 {
                return Err(format!("zero denominator in '{}'", text));
            }
            Ok(num / den)
        }
        None => text.parse().map_err(|_| format!("bad number '{}'", text)),
    }
}

/// Parses one row of a triplet into axis coefficients and a translation.
fn parse_triplet_component(expr: &str) -> Result<([f64; 3], f64), String> {
    let mut coeffs = [0.0; 3];
    let mut tran = 0.0;
    let mut sign = 1.0;
    let mut seen_term = false;
    let mut chars = expr.chars().filter(|c| !c.is_whitespace()).peekable();

    while let Some(c) = chars.next() {
        match c {
            '+' => sign = 1.0,
            '-' => sign = -1.0,
            _ if axis_index(c).is_some() => {
                if let Some(axis) = axis_index(c) {
                    coeffs[axis] += sign;
                }
                sign = 1.0;
                seen_term = true;
            }
            '0'..='9' | '.' => {
                let mut number = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' || next == '/' {
                        number.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = parse_number(&number)?;
                match chars.peek().copied().and_then(axis_index) {
                    Some(axis) => {
                        chars.next();
                        coeffs[axis] += sign * value;
                    }
                    None => tran += sign * value,
                }
                sign = 1.0;
                seen_term = true;
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    if !seen_term {
        return Err(format!("empty component '{}'", expr));
    }
    Ok((coeffs, tran))
}

/// Periodic unit cell with its orthogonalization matrices and symmetry images.
///
/// A cell built from missing or degenerate parameters (including the `1 1 1 90 90 90`
/// placeholder written for NMR and EM models) is kept but reports `is_crystal() == false`;
/// its matrices are the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    volume: f64,
    orth: Matrix3<f64>,
    frac: Matrix3<f64>,
    images: Vec<SymOp>,
    crystal: bool,
}

impl Default for UnitCell {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: 90.0,
            beta: 90.0,
            gamma: 90.0,
            volume: 1.0,
            orth: Matrix3::identity(),
            frac: Matrix3::identity(),
            images: Vec::new(),
            crystal: false,
        }
    }
}

impl UnitCell {
    /// Creates a cell from edge lengths (Å) and angles (degrees).
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let mut cell = Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            ..Self::default()
        };

        let finite = [a, b, c, alpha, beta, gamma].iter().all(|v| v.is_finite());
        let placeholder = a == 1.0 && b == 1.0 && c == 1.0;
        let angles_ok = [alpha, beta, gamma].iter().all(|&x| x > 0.0 && x < 180.0);
        if !finite || placeholder || !angles_ok || a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return cell;
        }

        let (ca, cb, cg) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let (sb, sg) = (beta.to_radians().sin(), gamma.to_radians().sin());
        let volume_factor = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
        if volume_factor <= 1e-12 {
            return cell;
        }

        // cos(alpha*) of the reciprocal cell
        let ca_star = (cb * cg - ca) / (sb * sg);
        let sa_star = (1.0 - ca_star * ca_star).max(0.0).sqrt();

        let orth = Matrix3::new(
            a,
            b * cg,
            c * cb,
            0.0,
            b * sg,
            -c * sb * ca_star,
            0.0,
            0.0,
            c * sb * sa_star,
        );
        let Some(frac) = orth.try_inverse() else {
            return cell;
        };

        cell.volume = a * b * c * volume_factor.sqrt();
        cell.orth = orth;
        cell.frac = frac;
        cell.crystal = true;
        cell
    }

    /// Returns the cell with the given symmetry operations installed as images.
    pub fn with_images(mut self, ops: impl IntoIterator<Item = SymOp>) -> Self {
        self.set_images(ops);
        self
    }

    /// Replaces the symmetry images of the cell.
    ///
    /// Identity operations and duplicates are dropped, so image `i` of the spatial index
    /// always refers to `images()[i - 1]` and index 0 is reserved for the asymmetric unit.
    pub fn set_images(&mut self, ops: impl IntoIterator<Item = SymOp>) {
        self.images.clear();
        for op in ops {
            if op.is_identity() || self.images.iter().any(|known| *known == op) {
                continue;
            }
            self.images.push(op);
        }
    }

    pub fn images(&self) -> &[SymOp] {
        &self.images
    }

    pub fn is_crystal(&self) -> bool {
        self.crystal
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn orthogonalization_matrix(&self) -> &Matrix3<f64> {
        &self.orth
    }

    pub fn fractionalization_matrix(&self) -> &Matrix3<f64> {
        &self.frac
    }

    pub fn fractionalize(&self, pos: &Point) -> Fractional {
        self.frac * pos.coords
    }

    pub fn orthogonalize(&self, frac: &Fractional) -> Point {
        Point::from(self.orth * frac)
    }

    /// Converts a fractional displacement (e.g. a lattice translation) to Å.
    pub fn orthogonalize_difference(&self, delta: &Fractional) -> Vector3<f64> {
        self.orth * delta
    }

    /// Distance between adjacent lattice planes perpendicular to the given axis (0 = a*).
    ///
    /// This is the width of the cell along that reciprocal direction and bounds how far a
    /// fractional step along the axis moves a point.
    pub fn plane_spacing(&self, axis: usize) -> f64 {
        1.0 / self.frac.row(axis).norm()
    }

    /// Applies a symmetry operation to an orthogonal position.
    pub fn apply_op(&self, op: &SymOp, pos: &Point) -> Point {
        self.orthogonalize(&op.apply(&self.fractionalize(pos)))
    }
}
