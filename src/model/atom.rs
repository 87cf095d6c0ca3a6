//! Atom record carrying the fields the link search reads: name, element, position,
//! occupancy and alternate-location code.
//!
//! Atoms are owned by their [`Residue`](super::residue::Residue) and are never mutated by
//! the search; identity within a model is expressed through
//! [`AtomRef`](super::address::AtomRef) index triples rather than references.

use super::types::{Element, Point};
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with element identity, Cartesian position and disorder metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in crystallographic files (e.g. `SG`, `O3'`).
    pub name: SmolStr,
    /// Chemical element derived from the type symbol.
    pub element: Element,
    /// Orthogonal coordinates in ångströms.
    pub pos: Point,
    /// Fractional occupancy in `[0, 1]`.
    pub occupancy: f64,
    /// Isotropic displacement parameter.
    pub b_iso: f64,
    /// Alternate location code; `None` when the atom is not disordered.
    pub altloc: Option<char>,
}

impl Atom {
    /// Creates a fully occupied, ordered atom.
    ///
    /// # Arguments
    ///
    /// * `name` - Atom label such as `"CA"` or `"ZN"`.
    /// * `element` - Chemical element of the atom.
    /// * `pos` - Orthogonal position in ångströms.
    pub fn new(name: &str, element: Element, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name),
            element,
            pos,
            occupancy: 1.0,
            b_iso: 0.0,
            altloc: None,
        }
    }

    /// Returns the atom with the given alternate location code and occupancy.
    pub fn with_altloc(mut self, altloc: char, occupancy: f64) -> Self {
        self.altloc = Some(altloc);
        self.occupancy = occupancy;
        self
    }

    pub fn has_altloc(&self) -> bool {
        self.altloc.is_some()
    }

    /// Whether this atom can coexist with a conformer labeled `altloc`.
    ///
    /// Two atoms are compatible unless both carry an alternate location code and the codes
    /// differ.
    pub fn altloc_compatible(&self, altloc: Option<char>) -> bool {
        match (self.altloc, altloc) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }

    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.altloc {
            Some(alt) => write!(
                f,
                "Atom {{ name: \"{}\", altloc: {}, element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
                self.name, alt, self.element, self.pos.x, self.pos.y, self.pos.z
            ),
            None => write!(
                f,
                "Atom {{ name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
                self.name, self.element, self.pos.x, self.pos.y, self.pos.z
            ),
        }
    }
}
