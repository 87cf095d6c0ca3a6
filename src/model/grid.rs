//! Periodic spatial index over a model and its crystallographic images.
//!
//! [`CellList`] bins every atom of a model, together with each symmetry image of it, into
//! buckets laid out in fractional space. Queries walk the block of buckets around the query
//! point and wrap across cell faces, so a partner on the far side of the unit cell (or in a
//! neighbouring cell) is found at its lattice-translated position.
//!
//! For structures without a usable unit cell the index falls back to a padded bounding box
//! and does not wrap at all.

use super::address::AtomRef;
use super::cell::{Fractional, SymOp, UnitCell};
use super::geometry::squared_distance;
use super::structure::Model;
use super::types::Point;
use nalgebra::{Matrix3, Vector3};

/// Sentinel value indicating the end of a linked list.
const SENTINEL: u32 = u32::MAX;

/// Upper bound on buckets along one axis.
const MAX_BUCKETS_PER_AXIS: usize = 200;

/// One indexed copy of an atom.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialMark {
    /// Position of this copy, wrapped into the reference cell.
    pub pos: Point,
    pub atom: AtomRef,
    /// 0 for the asymmetric unit, `i` for `UnitCell::images()[i - 1]`.
    pub image_idx: usize,
    pub altloc: Option<char>,
    /// Lattice translation that was subtracted to wrap the image into the reference cell.
    wrap: [i32; 3],
}

/// A mark found within the query radius.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    pub mark: &'a SpatialMark,
    /// Position of the partner copy next to the query point.
    pub pos: Point,
    /// Lattice translation relative to the unwrapped image `image_idx`.
    pub shift: [i32; 3],
    pub dist_sq: f64,
}

impl Neighbor<'_> {
    /// True when the partner is the untranslated asymmetric unit copy.
    pub fn is_same_asu(&self) -> bool {
        self.mark.image_idx == 0 && self.shift == [0, 0, 0]
    }

    pub fn distance(&self) -> f64 {
        self.dist_sq.sqrt()
    }
}

/// Cell list indexing a model with all its symmetry images.
///
/// Buckets are stored as linked lists (`head`/`next`) over a flat mark array.
#[derive(Debug, Clone)]
pub struct CellList {
    origin: Point,
    orth: Matrix3<f64>,
    frac: Matrix3<f64>,
    periodic: bool,
    images: Vec<SymOp>,
    /// Number of buckets along each fractional axis.
    dims: [usize; 3],
    /// Distance between the bounding lattice planes along each axis.
    spacing: [f64; 3],
    head: Vec<u32>,
    next: Vec<u32>,
    marks: Vec<SpatialMark>,
}

impl CellList {
    /// Indexes every atom of `model` and its images under `cell`.
    ///
    /// Buckets are at least `cutoff` wide in every direction, so a query with a radius up
    /// to `cutoff` visits the 3×3×3 block around the query point; larger radii widen the
    /// block as needed.
    ///
    /// # Arguments
    ///
    /// * `model` - Atoms to index.
    /// * `cell` - Unit cell and symmetry images. A non-crystal cell selects the bounding-box
    ///   fallback.
    /// * `cutoff` - Minimum bucket width in Å.
    ///
    /// # Panics
    ///
    /// Panics if `cutoff` is not positive.
    pub fn new(model: &Model, cell: &UnitCell, cutoff: f64) -> Self {
        assert!(cutoff > 0.0, "Cell list cutoff must be positive");

        let mut list = if cell.is_crystal() {
            Self::for_crystal(cell)
        } else {
            Self::for_bounding_box(model, cutoff)
        };

        for axis in 0..3 {
            let n = (list.spacing[axis] / cutoff).floor() as usize;
            list.dims[axis] = n.clamp(1, MAX_BUCKETS_PER_AXIS);
        }

        let image_count = list.images.len() + 1;
        let capacity = model.atom_count() * image_count;
        list.marks.reserve(capacity);
        list.next.reserve(capacity);
        list.head = vec![SENTINEL; list.dims.iter().product()];

        for (atom_ref, atom) in model.iter_atoms_with_refs() {
            let base = list.fractionalize(&atom.pos);
            for image_idx in 0..image_count {
                let (frac, exact) = match image_idx {
                    0 => (base, Some(atom.pos)),
                    i => (list.images[i - 1].apply(&base), None),
                };
                list.insert(atom_ref, atom.altloc, image_idx, frac, exact);
            }
        }

        list
    }

    fn for_crystal(cell: &UnitCell) -> Self {
        Self {
            origin: Point::origin(),
            orth: *cell.orthogonalization_matrix(),
            frac: *cell.fractionalization_matrix(),
            periodic: true,
            images: cell.images().to_vec(),
            dims: [1; 3],
            spacing: [0usize, 1, 2].map(|axis| cell.plane_spacing(axis)),
            head: Vec::new(),
            next: Vec::new(),
            marks: Vec::new(),
        }
    }

    fn for_bounding_box(model: &Model, padding: f64) -> Self {
        let mut min = Point::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point::new(f64::MIN, f64::MIN, f64::MIN);
        for (_, atom) in model.iter_atoms_with_refs() {
            if atom.pos.coords.iter().all(|c| c.is_finite()) {
                min = min.inf(&atom.pos);
                max = max.sup(&atom.pos);
            }
        }
        if min.x > max.x {
            min = Point::origin();
            max = Point::origin();
        }

        let pad = Vector3::new(padding, padding, padding);
        let origin = min - pad;
        let size = (max - min) + 2.0 * pad;

        Self {
            origin,
            orth: Matrix3::from_diagonal(&size),
            frac: Matrix3::from_diagonal(&size.map(|s| 1.0 / s)),
            periodic: false,
            images: Vec::new(),
            dims: [1; 3],
            spacing: [size.x, size.y, size.z],
            head: Vec::new(),
            next: Vec::new(),
            marks: Vec::new(),
        }
    }

    fn fractionalize(&self, pos: &Point) -> Fractional {
        self.frac * (pos - self.origin)
    }

    fn orthogonalize(&self, frac: &Fractional) -> Point {
        self.origin + self.orth * frac
    }

    fn lattice_vector(&self, shift: [i32; 3]) -> Vector3<f64> {
        self.orth * Vector3::new(shift[0] as f64, shift[1] as f64, shift[2] as f64)
    }

    fn bucket_coord(&self, frac: f64, axis: usize) -> isize {
        (frac * self.dims[axis] as f64).floor() as isize
    }

    /// Files one copy of an atom. `exact` is the original position of an asymmetric-unit
    /// copy, kept so that untranslated distances avoid a fractional round trip.
    fn insert(
        &mut self,
        atom: AtomRef,
        altloc: Option<char>,
        image_idx: usize,
        frac: Fractional,
        exact: Option<Point>,
    ) {
        let mut wrapped = frac;
        let mut wrap = [0i32; 3];
        if self.periodic {
            for axis in 0..3 {
                let w = frac[axis].floor();
                wrap[axis] = w as i32;
                wrapped[axis] = frac[axis] - w;
            }
        }

        let mut cell_idx = 0;
        for axis in (0..3).rev() {
            let n = self.dims[axis];
            let coord = self.bucket_coord(wrapped[axis], axis).clamp(0, n as isize - 1) as usize;
            cell_idx = cell_idx * n + coord;
        }

        let pos = match exact {
            Some(p) if wrap == [0, 0, 0] => p,
            Some(p) => p - self.lattice_vector(wrap),
            None => self.orthogonalize(&wrapped),
        };

        let idx = self.marks.len();
        self.marks.push(SpatialMark {
            pos,
            atom,
            image_idx,
            altloc,
            wrap,
        });
        self.next.push(self.head[cell_idx]);
        self.head[cell_idx] = idx as u32;
    }

    /// Maps a possibly out-of-range bucket coordinate to a stored bucket.
    ///
    /// Returns the bucket index and the lattice translation crossed to reach it, or `None`
    /// when the index does not wrap and the coordinate lies outside the box.
    fn resolve_bucket(&self, raw: [isize; 3]) -> Option<(usize, [i32; 3])> {
        let mut cell_idx = 0;
        let mut shift = [0i32; 3];
        for axis in (0..3).rev() {
            let n = self.dims[axis] as isize;
            let coord = if self.periodic {
                shift[axis] = raw[axis].div_euclid(n) as i32;
                raw[axis].rem_euclid(n)
            } else if (0..n).contains(&raw[axis]) {
                raw[axis]
            } else {
                return None;
            };
            cell_idx = cell_idx * n as usize + coord as usize;
        }
        Some((cell_idx, shift))
    }

    /// Iterates over the marks within `radius` of `center`.
    ///
    /// Marks whose altloc differs from a non-empty `altloc` are skipped; marks without an
    /// altloc, or queries without one, always pass.
    pub fn neighbors(&self, center: &Point, altloc: Option<char>, radius: f64) -> Neighbors<'_> {
        let frac = self.fractionalize(center);
        let mut home = [0isize; 3];
        let mut steps = [0isize; 3];
        let mut base_shift = [0i32; 3];

        for axis in 0..3 {
            let mut f = frac[axis];
            if self.periodic {
                let w = f.floor();
                base_shift[axis] = w as i32;
                f -= w;
            }
            home[axis] = self.bucket_coord(f, axis);
            let n = self.dims[axis] as f64;
            let mut k = (radius.max(0.0) * n / self.spacing[axis]).ceil().max(1.0);
            if !self.periodic {
                k = k.min(n);
            }
            steps[axis] = k as isize;
        }

        Neighbors {
            list: self,
            center: *center,
            altloc,
            radius_sq: radius * radius,
            home,
            steps,
            base_shift,
            offset: [-steps[0], -steps[1], -steps[2]],
            done: self.marks.is_empty() || !radius.is_finite(),
            shift: [0; 3],
            curr: SENTINEL,
        }
    }

    /// Calls `visit` for every mark within `radius` of `center`, with its squared distance.
    ///
    /// Same filtering as [`neighbors`](Self::neighbors).
    pub fn for_each_neighbor<F>(&self, center: &Point, altloc: Option<char>, radius: f64, mut visit: F)
    where
        F: FnMut(&SpatialMark, f64),
    {
        for neighbor in self.neighbors(center, altloc, radius) {
            visit(neighbor.mark, neighbor.dist_sq);
        }
    }

    /// Moves an asymmetric-unit position to the given image and lattice translation.
    ///
    /// With the `image_idx` and `shift` of a [`Neighbor`], this places any atom of the
    /// partner's residue next to the query the same way the partner itself was placed.
    pub fn image_position(&self, pos: &Point, image_idx: usize, shift: [i32; 3]) -> Point {
        if image_idx == 0 && shift == [0, 0, 0] {
            return *pos;
        }
        let mut frac = self.fractionalize(pos);
        if let Some(op) = image_idx.checked_sub(1).and_then(|i| self.images.get(i)) {
            frac = op.apply(&frac);
        }
        self.orthogonalize(&frac) + self.lattice_vector(shift)
    }

    pub fn marks(&self) -> &[SpatialMark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Number of symmetry images indexed besides the asymmetric unit.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// Iterator over the marks near a query point.
///
/// Walks the bucket block around the query in x-fastest order and, within each bucket,
/// its linked list of marks.
pub struct Neighbors<'a> {
    list: &'a CellList,
    center: Point,
    altloc: Option<char>,
    radius_sq: f64,
    home: [isize; 3],
    steps: [isize; 3],
    base_shift: [i32; 3],
    offset: [isize; 3],
    done: bool,
    shift: [i32; 3],
    curr: u32,
}

impl Neighbors<'_> {
    fn advance_offset(&mut self) {
        for axis in 0..3 {
            self.offset[axis] += 1;
            if self.offset[axis] <= self.steps[axis] {
                return;
            }
            self.offset[axis] = -self.steps[axis];
        }
        self.done = true;
    }
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = Neighbor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.curr != SENTINEL {
                let list = self.list;
                let mark = &list.marks[self.curr as usize];
                self.curr = list.next[self.curr as usize];

                if let (Some(a), Some(b)) = (self.altloc, mark.altloc) {
                    if a != b {
                        continue;
                    }
                }

                let pos = mark.pos + list.lattice_vector(self.shift);
                let dist_sq = squared_distance(&pos, &self.center);
                if dist_sq <= self.radius_sq {
                    return Some(Neighbor {
                        mark,
                        pos,
                        shift: [0usize, 1, 2].map(|axis| self.shift[axis] - mark.wrap[axis]),
                        dist_sq,
                    });
                }
                continue;
            }

            if self.done {
                return None;
            }

            let raw = [0usize, 1, 2].map(|axis| self.home[axis] + self.offset[axis]);
            self.advance_offset();

            if let Some((cell_idx, crossed)) = self.list.resolve_bucket(raw) {
                self.curr = self.list.head[cell_idx];
                self.shift = [0usize, 1, 2].map(|axis| crossed[axis] + self.base_shift[axis]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::chain::Chain;
    use crate::model::residue::Residue;
    use crate::model::types::Element;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn model_from_points(points: &[Point]) -> Model {
        let mut chain = Chain::new("A");
        for (i, p) in points.iter().enumerate() {
            let mut residue = Residue::new("HOH", i as i32 + 1, None);
            residue.add_atom(Atom::new("O", Element::O, *p));
            chain.add_residue(residue);
        }
        let mut model = Model::new("1");
        model.add_chain(chain);
        model
    }

    fn cubic(edge: f64) -> UnitCell {
        UnitCell::new(edge, edge, edge, 90.0, 90.0, 90.0)
    }

    #[test]
    fn finds_partner_across_cell_face() {
        let model = model_from_points(&[Point::new(0.5, 5.0, 5.0), Point::new(9.5, 5.0, 5.0)]);
        let list = CellList::new(&model, &cubic(10.0), 2.5);

        let found: Vec<_> = list
            .neighbors(&Point::new(0.5, 5.0, 5.0), None, 2.0)
            .filter(|n| n.mark.atom.residue == 1)
            .collect();

        assert_eq!(found.len(), 1);
        assert!((found[0].distance() - 1.0).abs() < 1e-9);
        assert_eq!(found[0].shift, [-1, 0, 0]);
        assert!(!found[0].is_same_asu());
        assert!(nalgebra::distance(&found[0].pos, &Point::new(-0.5, 5.0, 5.0)) < 1e-9);
    }

    #[test]
    fn partner_inside_cell_is_same_asu() {
        let model = model_from_points(&[Point::new(2.0, 2.0, 2.0), Point::new(3.5, 2.0, 2.0)]);
        let list = CellList::new(&model, &cubic(20.0), 5.0);

        let found: Vec<_> = list
            .neighbors(&Point::new(2.0, 2.0, 2.0), None, 2.0)
            .filter(|n| n.mark.atom.residue == 1)
            .collect();

        assert_eq!(found.len(), 1);
        assert!(found[0].is_same_asu());
    }

    #[test]
    fn query_outside_reference_cell_reports_real_shift() {
        let model = model_from_points(&[Point::new(12.0, 1.0, 1.0), Point::new(13.0, 1.0, 1.0)]);
        let list = CellList::new(&model, &cubic(10.0), 5.0);

        let found: Vec<_> = list
            .neighbors(&Point::new(12.0, 1.0, 1.0), None, 1.5)
            .filter(|n| n.mark.atom.residue == 1)
            .collect();

        assert_eq!(found.len(), 1);
        assert!(found[0].is_same_asu());
        assert!(nalgebra::distance(&found[0].pos, &Point::new(13.0, 1.0, 1.0)) < 1e-9);
    }

    #[test]
    fn symmetry_image_of_same_atom_is_found() {
        let op: SymOp = "-x,-y,z".parse().unwrap();
        let cell = cubic(10.0).with_images([op]);
        let atom = Point::new(0.5, 0.5, 5.0);
        let model = model_from_points(&[atom]);
        let list = CellList::new(&model, &cell, 5.0);

        assert_eq!(list.len(), 2);
        let images: Vec<_> = list
            .neighbors(&atom, None, 2.0)
            .filter(|n| n.mark.image_idx == 1)
            .collect();

        assert_eq!(images.len(), 1);
        let image = &images[0];
        assert!((image.distance() - 2.0_f64.sqrt()).abs() < 1e-9);
        assert!(!image.is_same_asu());

        let placed = list.image_position(&atom, image.mark.image_idx, image.shift);
        assert!(nalgebra::distance(&placed, &image.pos) < 1e-9);
    }

    #[test]
    fn radius_larger_than_cell_visits_several_lattice_copies() {
        let model = model_from_points(&[Point::new(1.0, 1.0, 1.0)]);
        let list = CellList::new(&model, &cubic(3.0), 3.5);

        assert_eq!(list.dims(), [1, 1, 1]);
        let count = list.neighbors(&Point::new(1.0, 1.0, 1.0), None, 3.5).count();
        assert_eq!(count, 7);
    }

    #[test]
    fn altloc_filter_skips_other_conformers() {
        let mut residue = Residue::new("SER", 1, None);
        residue.add_atom(Atom::new("OG", Element::O, Point::new(1.0, 0.0, 0.0)).with_altloc('A', 0.5));
        residue.add_atom(Atom::new("OG", Element::O, Point::new(1.2, 0.0, 0.0)).with_altloc('B', 0.5));
        residue.add_atom(Atom::new("CB", Element::C, Point::new(0.0, 0.0, 0.0)));
        let mut chain = Chain::new("A");
        chain.add_residue(residue);
        let mut model = Model::new("1");
        model.add_chain(chain);
        let list = CellList::new(&model, &UnitCell::default(), 5.0);

        let center = Point::new(1.1, 0.0, 0.0);
        assert_eq!(list.neighbors(&center, None, 3.0).count(), 3);
        let with_a: Vec<usize> = list
            .neighbors(&center, Some('A'), 3.0)
            .map(|n| n.mark.atom.atom)
            .collect();
        assert_eq!(with_a.len(), 2);
        assert!(!with_a.contains(&1));
    }

    #[test]
    fn bounding_box_fallback_never_wraps() {
        let model = model_from_points(&[
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.5, 0.0, 0.0),
            Point::new(30.0, 0.0, 0.0),
        ]);
        let list = CellList::new(&model, &UnitCell::default(), 5.0);

        assert!(!list.is_periodic());
        let found: Vec<_> = list.neighbors(&Point::origin(), None, 2.0).collect();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|n| n.is_same_asu()));

        let far = list.neighbors(&Point::new(100.0, 0.0, 0.0), None, 2.0).count();
        assert_eq!(far, 0);
    }

    #[test]
    fn empty_model_yields_no_neighbors() {
        let model = Model::new("1");
        let list = CellList::new(&model, &cubic(10.0), 5.0);

        assert!(list.is_empty());
        assert_eq!(list.neighbors(&Point::origin(), None, 5.0).count(), 0);
    }

    #[test]
    fn for_each_neighbor_reports_squared_distances() {
        let model = model_from_points(&[Point::new(0.0, 0.0, 0.0), Point::new(0.0, 2.0, 0.0)]);
        let list = CellList::new(&model, &UnitCell::default(), 5.0);

        let mut seen = Vec::new();
        list.for_each_neighbor(&Point::origin(), None, 3.0, |mark, d2| {
            seen.push((mark.atom.residue, d2));
        });
        seen.sort_by_key(|(residue, _)| *residue);

        assert_eq!(seen.len(), 2);
        assert!(seen[0].1.abs() < 1e-12);
        assert!((seen[1].1 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn partner_exactly_at_radius_is_found() {
        let model = model_from_points(&[
            Point::new(-1.8, 0.0, 0.0),
            Point::origin(),
            Point::new(2.3, 0.0, 0.0),
        ]);
        let list = CellList::new(&model, &UnitCell::default(), 5.0);

        let found: Vec<_> = list
            .neighbors(&Point::origin(), None, 2.3)
            .filter(|n| n.mark.atom.residue == 2)
            .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].dist_sq, 2.3 * 2.3);
    }

    #[test]
    fn image_position_places_atoms_like_the_neighbor() {
        let op: SymOp = "-x,-y,z".parse().unwrap();
        let atom_pos = Point::new(2.0, 1.0, 5.0);
        let model = model_from_points(&[atom_pos]);
        let list = CellList::new(&model, &cubic(30.0).with_images([op]), 5.0);

        let found: Vec<_> = list
            .neighbors(&Point::new(28.0, 0.4, 5.0), None, 1.5)
            .collect();

        assert_eq!(found.len(), 1);
        let n = &found[0];
        assert_eq!(n.mark.image_idx, 1);
        assert_eq!(n.shift, [1, 0, 0]);
        assert!(nalgebra::distance(&n.pos, &Point::new(28.0, -1.0, 5.0)) < 1e-9);

        let placed = list.image_position(&atom_pos, n.mark.image_idx, n.shift);
        assert!(nalgebra::distance(&placed, &n.pos) < 1e-9);
    }

    #[test]
    fn matches_brute_force_in_monoclinic_cell() {
        let cell = UnitCell::new(12.0, 14.0, 11.0, 90.0, 105.0, 90.0);
        let mut rng = StdRng::seed_from_u64(12345);
        let points: Vec<Point> = (0..40)
            .map(|_| {
                let frac = Vector3::new(rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>());
                cell.orthogonalize(&frac)
            })
            .collect();
        let model = model_from_points(&points);
        let radius = 4.0;
        let list = CellList::new(&model, &cell, radius);

        let mut expected = 0;
        for p in &points {
            for q in &points {
                for i in -2..=2 {
                    for j in -2..=2 {
                        for k in -2..=2 {
                            let t = cell.orthogonalize_difference(&Vector3::new(
                                i as f64, j as f64, k as f64,
                            ));
                            if nalgebra::distance(p, &(q + t)) <= radius {
                                expected += 1;
                            }
                        }
                    }
                }
            }
        }

        let found: usize = points
            .iter()
            .map(|p| list.neighbors(p, None, radius).count())
            .sum();
        assert_eq!(found, expected);
    }
}
