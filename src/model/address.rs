//! Ways of pointing at an atom inside a [`Model`](super::structure::Model).
//!
//! - [`AtomRef`] is a chain/residue/atom index triple. It is `Copy`, totally ordered in
//!   scan order, and stays valid as long as the model is not restructured.
//! - [`Cra`] is the borrowed chain/residue/atom view resolved from an [`AtomRef`].
//! - [`AtomAddress`] names an atom the way connection records do (chain name, sequence
//!   number, residue and atom names), independent of storage order.

use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use std::fmt;

/// Index triple locating an atom within a model.
///
/// The derived ordering compares chain, then residue, then atom index, which is exactly
/// the order in which the link search scans atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomRef {
    pub chain: usize,
    pub residue: usize,
    pub atom: usize,
}

impl AtomRef {
    pub fn new(chain: usize, residue: usize, atom: usize) -> Self {
        Self {
            chain,
            residue,
            atom,
        }
    }

    pub fn same_residue(&self, other: &AtomRef) -> bool {
        self.chain == other.chain && self.residue == other.residue
    }
}

impl fmt::Display for AtomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}/{}]", self.chain, self.residue, self.atom)
    }
}

/// Borrowed chain, residue and atom of a single atom.
#[derive(Debug, Clone, Copy)]
pub struct Cra<'a> {
    pub chain: &'a Chain,
    pub residue: &'a Residue,
    pub atom: &'a Atom,
}

impl fmt::Display for Cra<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.chain.name, self.residue.name, self.residue.seq_num)?;
        if let Some(icode) = self.residue.icode {
            write!(f, "{}", icode)?;
        }
        write!(f, "/{}", self.atom.name)?;
        if let Some(alt) = self.atom.altloc {
            write!(f, ":{}", alt)?;
        }
        Ok(())
    }
}

/// Name-based atom identifier used by recorded connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomAddress {
    pub chain_name: String,
    pub seq_num: i32,
    pub icode: Option<char>,
    pub res_name: String,
    pub atom_name: String,
    pub altloc: Option<char>,
}

impl AtomAddress {
    pub fn new(chain_name: &str, seq_num: i32, res_name: &str, atom_name: &str) -> Self {
        Self {
            chain_name: chain_name.to_string(),
            seq_num,
            icode: None,
            res_name: res_name.to_string(),
            atom_name: atom_name.to_string(),
            altloc: None,
        }
    }

    /// Builds the address that identifies the atom behind `cra`.
    pub fn from_cra(cra: &Cra<'_>) -> Self {
        Self {
            chain_name: cra.chain.name.clone(),
            seq_num: cra.residue.seq_num,
            icode: cra.residue.icode,
            res_name: cra.residue.name.clone(),
            atom_name: cra.atom.name.to_string(),
            altloc: cra.atom.altloc,
        }
    }

    /// Whether this address names the atom behind `cra`.
    ///
    /// Every component must agree, including the alternate location code.
    pub fn matches(&self, cra: &Cra<'_>) -> bool {
        self.chain_name == cra.chain.name
            && self.seq_num == cra.residue.seq_num
            && self.icode == cra.residue.icode
            && self.res_name == cra.residue.name
            && self.atom_name == cra.atom.name
            && self.altloc == cra.atom.altloc
    }
}

impl fmt::Display for AtomAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.chain_name, self.res_name, self.seq_num)?;
        if let Some(icode) = self.icode {
            write!(f, "{}", icode)?;
        }
        write!(f, "/{}", self.atom_name)?;
        if let Some(alt) = self.altloc {
            write!(f, ":{}", alt)?;
        }
        Ok(())
    }
}
