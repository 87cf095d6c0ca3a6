//! Structure model consumed by the link search.
//!
//! Atoms, residues, chains and models carry only what the search needs, next to the unit
//! cell with its symmetry images, recorded connections, and the periodic spatial index
//! built over a model.

pub mod address;
pub mod atom;
pub mod cell;
pub mod chain;
pub mod connection;
pub mod geometry;
pub mod grid;
pub mod residue;
pub mod structure;
pub mod types;
