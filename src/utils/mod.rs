//! Utility modules providing cross-cutting functionality.
//!
//! Currently this is the switch between Rayon-backed and serial iteration used by the
//! link search.

pub mod parallel;
