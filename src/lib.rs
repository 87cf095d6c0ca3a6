//! # bio-links
//!
//! **bio-links** finds atom pairs in a macromolecular model that are close enough to be
//! chemically bonded, classifies them against a dictionary of known link geometries, and
//! reports them together with any connection the model already records. The search
//! honours the crystal: partners across unit-cell faces and in symmetry images are found at
//! their real distance.
//!
//! ## Features
//!
//! - **Periodic spatial index** – A cell list over the unit cell and all symmetry images,
//!   with a padded bounding-box fallback for models without a crystal cell.
//! - **Link dictionary** – Rules with residue or chemical-group sides, ideal bond lengths
//!   and chirality restraints, loaded from TOML or taken from the embedded standard set.
//! - **Rule matching** – Distance, side, and chirality checks per candidate pair, with a
//!   covalent-radius fallback for pairs no rule explains.
//! - **Parallel search** – The outer atom loop runs on Rayon when the `parallel` feature is
//!   enabled, with identical output order.
//!
//! ```ignore
//! use bio_links::{LinkHunt, LinkIndex, standard_library};
//!
//! let index = LinkIndex::new(standard_library());
//! for m in LinkHunt::new(&index).find_possible_links(&structure)? {
//!     println!("{}", m.describe(&structure.models()[0]));
//! }
//! ```

pub mod db;
pub mod model;
pub mod ops;

mod utils;

pub use db::{ChemLink, MonomerLibrary, standard_library};
pub use model::address::{AtomAddress, AtomRef, Cra};
pub use model::atom::Atom;
pub use model::cell::{SymOp, UnitCell};
pub use model::chain::Chain;
pub use model::connection::{Connection, ConnectionKind};
pub use model::residue::Residue;
pub use model::structure::{Model, Structure};
pub use model::types::{Element, Point};
pub use ops::{LinkHunt, LinkHuntConfig, LinkIndex, LinkMatch};
