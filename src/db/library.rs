use super::error::Error;
use super::link::ChemLink;
use super::residues::{ResidueInfo, builtin_residue_infos};
use std::collections::BTreeMap;

/// Link rules and residue classifications consumed by the link search.
///
/// Both tables are ordered by key so that anything derived from them is reproducible.
#[derive(Debug, Clone)]
pub struct MonomerLibrary {
    links: BTreeMap<String, ChemLink>,
    residue_infos: BTreeMap<String, ResidueInfo>,
}

impl Default for MonomerLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MonomerLibrary {
    /// Creates a library without links, seeded with the built-in residue table.
    pub fn new() -> Self {
        Self {
            links: BTreeMap::new(),
            residue_infos: builtin_residue_infos().clone(),
        }
    }

    /// Parses a TOML link dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when the document is malformed or a rule fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        super::loader::parse_library(content)
    }

    /// Adds a link rule after validating its bonds.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateLink`] if a rule with the same id exists, or
    /// [`Error::InvalidBondLength`] for a bond whose ideal length is not a positive number.
    pub fn add_link(&mut self, link: ChemLink) -> Result<(), Error> {
        for bond in &link.rt.bonds {
            if !bond.value.is_finite() || bond.value <= 0.0 {
                return Err(Error::invalid_bond_length(
                    link.id.as_str(),
                    bond.id1.atom.as_str(),
                    bond.id2.atom.as_str(),
                    bond.value,
                ));
            }
        }
        if self.links.contains_key(&link.id) {
            return Err(Error::DuplicateLink(link.id));
        }
        self.links.insert(link.id.clone(), link);
        Ok(())
    }

    pub fn set_residue_info(&mut self, name: &str, info: ResidueInfo) {
        self.residue_infos.insert(name.to_string(), info);
    }

    pub fn link(&self, id: &str) -> Option<&ChemLink> {
        self.links.get(id)
    }

    pub fn links(&self) -> &BTreeMap<String, ChemLink> {
        &self.links
    }

    pub fn residue_info(&self, name: &str) -> Option<&ResidueInfo> {
        self.residue_infos.get(name)
    }

    pub fn residue_infos(&self) -> &BTreeMap<String, ResidueInfo> {
        &self.residue_infos
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
