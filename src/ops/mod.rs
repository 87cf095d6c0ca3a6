//! Link discovery over a prepared structure.
//!
//! [`LinkIndex`] turns a [`MonomerLibrary`](crate::db::MonomerLibrary) into lookup tables
//! once; [`LinkHunt`] then searches any number of structures against it and reports
//! [`LinkMatch`] records. Both share the [`Error`] type of this module.

mod error;
mod link_hunt;
mod link_index;

pub use link_hunt::{LinkHunt, LinkHuntConfig, LinkMatch};

pub use link_index::{DEFAULT_GLOBAL_MAX_DIST, LinkIndex};

pub use error::Error;
